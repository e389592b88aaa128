use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocId(pub u64);

impl DocId {
    pub fn new(id: u64) -> Self {
        DocId(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for DocId {
    fn from(id: u64) -> Self {
        DocId(id)
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out monotonically increasing document ids.
///
/// Owned by a `Database`, so two stores never share a sequence.
#[derive(Debug, Default)]
pub struct IdGenerator {
    next: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    pub fn starting_at(first: u64) -> Self {
        IdGenerator {
            next: AtomicU64::new(first),
        }
    }

    pub fn next_id(&self) -> DocId {
        DocId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Id the next call to `next_id` will return
    pub fn peek(&self) -> DocId {
        DocId(self.next.load(Ordering::Relaxed))
    }

    /// Make sure `id` is never handed out again
    pub fn observe(&self, id: DocId) {
        self.next.fetch_max(id.0.saturating_add(1), Ordering::Relaxed);
    }
}
