use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};
use crate::core::collection::{Collection, ScanMode};
use crate::core::config::Config;
use crate::core::document::Document;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{DocId, IdGenerator};
use crate::parallel::LanePool;
use crate::storage::cache::{read_cache, write_cache};
use crate::storage::collection_file::{read_collection, write_collection};
use crate::storage::StorageLayout;

/// Named collections with exactly one materialized at a time.
///
/// Every other collection is either untouched (maybe with a pending load
/// file) or spilled to `<cache dir>/<name>.<extension>`. Id generation is
/// shared by all collections of one store.
pub struct Database {
    config: Config,
    layout: StorageLayout,
    collections: Vec<Collection>,
    current: Option<usize>,         // index into `collections`
    ids: IdGenerator,
    lanes: LanePool,
    sequential: LanePool,
}

impl Database {
    pub fn open(config: Config) -> Result<Self> {
        let layout = StorageLayout::new(&config)?;
        let lanes = LanePool::new(config.resolved_lanes())?;
        info!(
            target: "jsondb::store",
            cache_dir = %layout.cache_dir().display(),
            lanes = lanes.lanes(),
            "store opened"
        );

        Ok(Database {
            ids: IdGenerator::starting_at(config.first_id),
            layout,
            collections: Vec::new(),
            current: None,
            lanes,
            sequential: LanePool::sequential(),
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn collection_names(&self) -> Vec<&str> {
        self.collections.iter().map(Collection::name).collect()
    }

    pub fn add_collection(&mut self, name: &str) -> Result<()> {
        self.ensure_name_free(name)?;
        self.collections.push(Collection::new(name));
        info!(target: "jsondb::store", collection = name, "collection added");
        Ok(())
    }

    pub fn add_collection_from_file(&mut self, name: &str, path: impl AsRef<Path>) -> Result<()> {
        self.ensure_name_free(name)?;
        self.collections.push(Collection::from_file(name, path)?);
        info!(target: "jsondb::store", collection = name, "collection added from file");
        Ok(())
    }

    pub fn remove_collection(&mut self, name: &str) -> Result<()> {
        let at = self.index_of(name)?;
        self.collections.remove(at);
        self.current = match self.current {
            Some(cur) if cur == at => None,
            Some(cur) if cur > at => Some(cur - 1),
            other => other,
        };
        self.remove_cache_file(name);
        info!(target: "jsondb::store", collection = name, "collection removed");
        Ok(())
    }

    pub fn rename_collection(&mut self, old: &str, new: &str) -> Result<()> {
        let at = self.index_of(old)?;
        if old == new {
            return Ok(());
        }
        self.ensure_name_free(new)?;

        let cache = self.layout.cache_path(old);
        if cache.exists() {
            fs::rename(&cache, self.layout.cache_path(new))?;
        }
        self.collections[at].rename(new);
        info!(target: "jsondb::store", from = old, to = new, "collection renamed");
        Ok(())
    }

    /// Make `name` the materialized collection.
    ///
    /// The incoming documents are read before the outgoing collection is
    /// spilled, so a broken file leaves the current selection as it was.
    pub fn set_current_collection(&mut self, name: &str) -> Result<()> {
        let target = self.index_of(name)?;
        if self.current == Some(target) {
            return Ok(());
        }

        let (incoming, from_load_file) = self.read_incoming(target)?;

        if let Some(cur) = self.current {
            let outgoing = &mut self.collections[cur];
            let path = self.layout.cache_path(outgoing.name());
            write_cache(&path, outgoing.documents())?;
            debug!(
                target: "jsondb::store",
                collection = outgoing.name(),
                documents = outgoing.len(),
                "collection spilled to cache"
            );
            outgoing.take_documents();
        }

        for doc in &incoming {
            self.ids.observe(doc.id());
        }
        let collection = &mut self.collections[target];
        if from_load_file {
            collection.clear_load_file();
        }
        collection.replace_documents(incoming);
        self.current = Some(target);
        info!(target: "jsondb::store", collection = name, documents = collection.len(), "current collection set");
        Ok(())
    }

    pub fn current_collection_name(&self) -> Option<&str> {
        self.current.map(|at| self.collections[at].name())
    }

    pub fn current_collection(&self) -> Result<&Collection> {
        let at = self.current_index()?;
        Ok(&self.collections[at])
    }

    pub fn add_document(&mut self, json: &str) -> Result<DocId> {
        let at = self.current_index()?;
        self.collections[at].add_document(json, &self.ids)
    }

    pub fn get_document(&self, id: DocId) -> Result<&Document> {
        self.current_collection()?.get_document(id)
    }

    pub fn get_documents(&self, pattern: &str) -> Result<Vec<Document>> {
        self.get_documents_with(pattern, self.default_mode())
    }

    pub fn get_documents_with(&self, pattern: &str, mode: ScanMode) -> Result<Vec<Document>> {
        self.current_collection()?.get_documents(pattern, self.lanes_for(mode))
    }

    pub fn update_document(&mut self, id: DocId, patch: &str) -> Result<()> {
        let at = self.current_index()?;
        self.collections[at].update_document(id, patch)
    }

    pub fn update_documents(&mut self, pattern: &str, patch: &str) -> Result<usize> {
        self.update_documents_with(pattern, patch, self.default_mode())
    }

    pub fn update_documents_with(&mut self, pattern: &str, patch: &str, mode: ScanMode) -> Result<usize> {
        let at = self.current_index()?;
        let lanes = match mode {
            ScanMode::Sequential => &self.sequential,
            ScanMode::Parallel => &self.lanes,
        };
        self.collections[at].update_documents(pattern, patch, lanes)
    }

    pub fn remove_document(&mut self, id: DocId) -> Result<Document> {
        let at = self.current_index()?;
        self.collections[at].remove_document(id)
    }

    pub fn remove_documents(&mut self, pattern: &str) -> Result<usize> {
        self.remove_documents_with(pattern, self.default_mode())
    }

    pub fn remove_documents_with(&mut self, pattern: &str, mode: ScanMode) -> Result<usize> {
        let at = self.current_index()?;
        let lanes = match mode {
            ScanMode::Sequential => &self.sequential,
            ScanMode::Parallel => &self.lanes,
        };
        self.collections[at].remove_documents(pattern, lanes)
    }

    pub fn get_ids(&self) -> Result<Vec<DocId>> {
        Ok(self.current_collection()?.ids())
    }

    pub fn documents(&self) -> Result<&[Document]> {
        Ok(self.current_collection()?.documents())
    }

    /// Write the current collection as a document array
    pub fn save_current_collection(&self, path: impl AsRef<Path>) -> Result<()> {
        let collection = self.current_collection()?;
        write_collection(path.as_ref(), collection.documents())?;
        info!(
            target: "jsondb::store",
            collection = collection.name(),
            path = %path.as_ref().display(),
            "collection saved"
        );
        Ok(())
    }

    /// Append every document of a collection file with fresh ids.
    ///
    /// Nothing is added unless every entry is a valid document.
    pub fn load_current_collection(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let at = self.current_index()?;
        let mut documents = Vec::new();
        for text in read_collection(path.as_ref())? {
            documents.push(Document::parse(&text, &self.ids)?);
        }

        let count = documents.len();
        let collection = &mut self.collections[at];
        for doc in documents {
            collection.insert_document(doc)?;
        }
        Ok(count)
    }

    fn read_incoming(&self, target: usize) -> Result<(Vec<Document>, bool)> {
        let collection = &self.collections[target];

        if let Some(file) = collection.load_file() {
            let mut documents = Vec::new();
            for text in read_collection(file)? {
                documents.push(Document::parse(&text, &self.ids)?);
            }
            debug!(target: "jsondb::store", collection = collection.name(), file = %file.display(), "read load file");
            return Ok((documents, true));
        }

        let cache = self.layout.cache_path(collection.name());
        if cache.exists() {
            let documents = read_cache(&cache)?;
            debug!(target: "jsondb::store", collection = collection.name(), "read cache file");
            return Ok((documents, false));
        }
        Ok((Vec::new(), false))
    }

    fn default_mode(&self) -> ScanMode {
        if self.config.parallel_scans {
            ScanMode::Parallel
        } else {
            ScanMode::Sequential
        }
    }

    fn lanes_for(&self, mode: ScanMode) -> &LanePool {
        match mode {
            ScanMode::Sequential => &self.sequential,
            ScanMode::Parallel => &self.lanes,
        }
    }

    fn current_index(&self) -> Result<usize> {
        if self.collections.is_empty() {
            return Err(Error::new(ErrorKind::InvalidState, "no collections".to_string()));
        }
        self.current
            .ok_or_else(|| Error::new(ErrorKind::InvalidState, "no current collection".to_string()))
    }

    fn index_of(&self, name: &str) -> Result<usize> {
        self.collections
            .iter()
            .position(|c| c.name() == name)
            .ok_or_else(|| Error::new(ErrorKind::NotFound, format!("collection {} does not exist", name)))
    }

    fn ensure_name_free(&self, name: &str) -> Result<()> {
        if self.collections.iter().any(|c| c.name() == name) {
            return Err(Error::new(
                ErrorKind::AlreadyExists,
                format!("collection {} already exists", name),
            ));
        }
        Ok(())
    }

    fn remove_cache_file(&self, name: &str) {
        let path = self.layout.cache_path(name);
        if let Err(e) = fs::remove_file(&path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(target: "jsondb::store", path = %path.display(), error = %e, "failed to remove cache file");
            }
        }
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        for collection in &self.collections {
            self.remove_cache_file(collection.name());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(dir: &Path) -> Database {
        Database::open(Config::default().with_temp_dir(dir).with_scan_lanes(2)).unwrap()
    }

    #[test]
    fn test_preconditions() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = open(dir.path());
        assert_eq!(db.add_document("{}").unwrap_err().context, "no collections");

        db.add_collection("a").unwrap();
        assert_eq!(db.add_document("{}").unwrap_err().context, "no current collection");
        assert_eq!(db.add_collection("a").unwrap_err().kind, ErrorKind::AlreadyExists);
        assert_eq!(db.set_current_collection("b").unwrap_err().kind, ErrorKind::NotFound);
    }

    #[test]
    fn test_switch_spills_and_restores() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = open(dir.path());
        db.add_collection("a").unwrap();
        db.add_collection("b").unwrap();

        db.set_current_collection("a").unwrap();
        let id = db.add_document(r#"{"x":1}"#).unwrap();

        db.set_current_collection("b").unwrap();
        assert!(dir.path().join("a.json.tmp").exists());
        assert_eq!(db.get_ids().unwrap(), Vec::<DocId>::new());
        let other = db.add_document(r#"{"y":2}"#).unwrap();
        assert!(other > id);

        db.set_current_collection("a").unwrap();
        assert_eq!(db.get_document(id).unwrap().as_str(), r#"{"x":1}"#);
        assert_eq!(db.get_document(other).unwrap_err().kind, ErrorKind::NotFound);
    }

    #[test]
    fn test_remove_collection_adjusts_current() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = open(dir.path());
        for name in ["a", "b", "c"] {
            db.add_collection(name).unwrap();
        }
        db.set_current_collection("c").unwrap();
        db.remove_collection("a").unwrap();
        assert_eq!(db.current_collection_name(), Some("c"));

        db.remove_collection("c").unwrap();
        assert_eq!(db.current_collection_name(), None);
        assert_eq!(db.collection_names(), vec!["b"]);
        assert_eq!(db.remove_collection("zzz").unwrap_err().kind, ErrorKind::NotFound);
    }

    #[test]
    fn test_drop_removes_cache_files() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut db = open(dir.path());
            db.add_collection("a").unwrap();
            db.add_collection("b").unwrap();
            db.set_current_collection("a").unwrap();
            db.set_current_collection("b").unwrap();
            assert!(dir.path().join("a.json.tmp").exists());
        }
        assert!(!dir.path().join("a.json.tmp").exists());
    }
}
