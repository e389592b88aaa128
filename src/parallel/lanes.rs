use std::ops::Range;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;
use crate::core::error::Result;

/// Splits a document list into contiguous partitions and scans them on a
/// private rayon pool, one partition per lane.
///
/// A sequential pool runs everything on the caller's thread. Both modes
/// return results in document order.
pub struct LanePool {
    lanes: usize,
    pool: Option<ThreadPool>,
}

impl LanePool {
    pub fn sequential() -> Self {
        LanePool { lanes: 1, pool: None }
    }

    pub fn new(lanes: usize) -> Result<Self> {
        let lanes = lanes.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(lanes)
            .thread_name(|i| format!("jsondb-lane-{}", i))
            .build()?;
        debug!(target: "jsondb::parallel", lanes, "lane pool started");
        Ok(LanePool { lanes, pool: Some(pool) })
    }

    pub fn lanes(&self) -> usize {
        self.lanes
    }

    pub fn is_parallel(&self) -> bool {
        self.pool.is_some()
    }

    /// References to every item satisfying `pred`, in input order
    pub fn collect_matches<'a, T, F>(&self, items: &'a [T], pred: F) -> Vec<&'a T>
    where
        T: Sync,
        F: Fn(&T) -> bool + Sync,
    {
        let Some(pool) = &self.pool else {
            return items.iter().filter(|item| pred(item)).collect();
        };

        let bounds = partition_bounds(items.len(), self.lanes);
        debug!(target: "jsondb::parallel", items = items.len(), partitions = bounds.len(), "scanning");
        let per_lane: Vec<Vec<&'a T>> = pool.install(|| {
            bounds
                .into_par_iter()
                .map(|range| items[range].iter().filter(|item| pred(item)).collect())
                .collect()
        });
        per_lane.into_iter().flatten().collect()
    }

    /// Keep only the items that do not satisfy `pred`, preserving order
    pub fn retain_unmatched<T, F>(&self, items: Vec<T>, pred: F) -> Vec<T>
    where
        T: Send,
        F: Fn(&T) -> bool + Sync,
    {
        let Some(pool) = &self.pool else {
            return items.into_iter().filter(|item| !pred(item)).collect();
        };

        let bounds = partition_bounds(items.len(), self.lanes);
        let mut partitions: Vec<Vec<T>> = Vec::with_capacity(bounds.len());
        let mut rest = items;
        for range in bounds.iter().rev() {
            partitions.push(rest.split_off(range.start));
        }
        partitions.reverse();

        let kept: Vec<Vec<T>> = pool.install(|| {
            partitions
                .into_par_iter()
                .map(|part| part.into_iter().filter(|item| !pred(item)).collect())
                .collect()
        });
        kept.into_iter().flatten().collect()
    }
}

/// Contiguous ranges covering `0..len`, at most `lanes` of them.
///
/// Every lane gets `len / lanes` items and the first `len % lanes` lanes get
/// one more; empty ranges are left out.
pub fn partition_bounds(len: usize, lanes: usize) -> Vec<Range<usize>> {
    let lanes = lanes.max(1);
    let base = len / lanes;
    let extra = len % lanes;

    let mut bounds = Vec::with_capacity(lanes.min(len));
    let mut start = 0;
    for lane in 0..lanes {
        let size = base + usize::from(lane < extra);
        if size == 0 {
            break;
        }
        bounds.push(start..start + size);
        start += size;
    }
    bounds
}
