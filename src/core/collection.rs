use std::path::{Path, PathBuf};
use tracing::debug;
use crate::core::document::Document;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{DocId, IdGenerator};
use crate::json::normalize::de_whitespace;
use crate::json::validator::validate_patch;
use crate::parallel::LanePool;
use crate::query::pattern::Pattern;

/// How a bulk pattern operation walks the documents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    Sequential,
    Parallel,
}

/// A named, id-ordered list of documents.
///
/// Documents are only ever appended with fresh ids or re-inserted at their
/// sorted position, so lookups by id are binary searches.
#[derive(Debug, Clone)]
pub struct Collection {
    name: String,
    load_file: Option<PathBuf>,     // read on first activation, then cleared
    documents: Vec<Document>,
}

impl Collection {
    pub fn new(name: impl Into<String>) -> Self {
        Collection {
            name: name.into(),
            load_file: None,
            documents: Vec::new(),
        }
    }

    /// A collection whose documents come from `path` when it is first made current
    pub fn from_file(name: impl Into<String>, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::new(
                ErrorKind::NotFound,
                format!("filepath: {} does not exist", path.display()),
            ));
        }
        let mut collection = Collection::new(name);
        collection.load_file = Some(path.to_path_buf());
        Ok(collection)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn ids(&self) -> Vec<DocId> {
        self.documents.iter().map(Document::id).collect()
    }

    /// File still waiting to be read on first activation
    pub fn load_file(&self) -> Option<&Path> {
        self.load_file.as_deref()
    }

    pub(crate) fn clear_load_file(&mut self) {
        self.load_file = None;
    }

    pub(crate) fn take_documents(&mut self) -> Vec<Document> {
        std::mem::take(&mut self.documents)
    }

    /// Install documents read back from disk, in id order
    pub(crate) fn replace_documents(&mut self, mut documents: Vec<Document>) {
        documents.sort_by_key(Document::id);
        self.documents = documents;
    }

    /// Put a document at its id position; fails if the id is taken
    pub fn insert_document(&mut self, doc: Document) -> Result<()> {
        match self.position(doc.id()) {
            Ok(_) => Err(Error::new(
                ErrorKind::AlreadyExists,
                format!("document with id {} already exists in {}", doc.id(), self.name),
            )),
            Err(at) => {
                self.documents.insert(at, doc);
                Ok(())
            }
        }
    }

    pub fn add_document(&mut self, json: &str, ids: &IdGenerator) -> Result<DocId> {
        let doc = Document::parse(json, ids)?;
        let id = doc.id();
        self.insert_document(doc)?;
        Ok(id)
    }

    pub fn get_document(&self, id: DocId) -> Result<&Document> {
        let at = self.position(id).map_err(|_| not_found(id))?;
        Ok(&self.documents[at])
    }

    pub fn get_documents(&self, pattern: &str, lanes: &LanePool) -> Result<Vec<Document>> {
        self.require_documents()?;
        let pattern = Pattern::parse(pattern)?;
        let found = lanes.collect_matches(&self.documents, |doc| pattern.matches(doc));
        Ok(found.into_iter().cloned().collect())
    }

    pub fn update_document(&mut self, id: DocId, patch: &str) -> Result<()> {
        let at = self.position(id).map_err(|_| not_found(id))?;
        self.documents[at].apply_patch(patch)
    }

    /// Patch every matching document; either all of them change or none does
    pub fn update_documents(&mut self, pattern: &str, patch: &str, lanes: &LanePool) -> Result<usize> {
        self.require_documents()?;
        let pattern = Pattern::parse(pattern)?;
        let patch = de_whitespace(patch);
        validate_patch(&patch)?;

        let ids: Vec<DocId> = lanes
            .collect_matches(&self.documents, |doc| pattern.matches(doc))
            .into_iter()
            .map(Document::id)
            .collect();

        let mut staged = Vec::with_capacity(ids.len());
        for id in ids {
            let at = self.position(id).map_err(|_| not_found(id))?;
            let merged = self.documents[at]
                .merged(&patch)
                .map_err(|e| e.within(&format!("document {}", id)))?;
            staged.push((at, merged));
        }

        let count = staged.len();
        for (at, merged) in staged {
            self.documents[at].replace_data(merged);
        }
        debug!(target: "jsondb::collection", collection = %self.name, count, "updated documents");
        Ok(count)
    }

    pub fn remove_document(&mut self, id: DocId) -> Result<Document> {
        let at = self.position(id).map_err(|_| not_found(id))?;
        Ok(self.documents.remove(at))
    }

    pub fn remove_documents(&mut self, pattern: &str, lanes: &LanePool) -> Result<usize> {
        self.require_documents()?;
        let pattern = Pattern::parse(pattern)?;

        let before = self.documents.len();
        let all = self.take_documents();
        self.documents = lanes.retain_unmatched(all, |doc| pattern.matches(doc));
        let count = before - self.documents.len();
        debug!(target: "jsondb::collection", collection = %self.name, count, "removed documents");
        Ok(count)
    }

    fn position(&self, id: DocId) -> std::result::Result<usize, usize> {
        self.documents.binary_search_by_key(&id, Document::id)
    }

    fn require_documents(&self) -> Result<()> {
        if self.documents.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidState,
                format!("no documents exist in collection {}", self.name),
            ));
        }
        Ok(())
    }
}

fn not_found(id: DocId) -> Error {
    Error::new(ErrorKind::NotFound, format!("could not find document with id {}", id))
}
