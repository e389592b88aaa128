use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use crate::core::config::Config;
use crate::core::error::Result;

/// Where inactive collections are spilled.
///
/// Without a configured directory the layout owns a `TempDir` that is
/// removed together with the layout.
#[derive(Debug)]
pub struct StorageLayout {
    pub cache_dir: PathBuf,     // <cache_dir>/<collection>.<extension>
    pub extension: String,
    _owned: Option<TempDir>,
}

impl StorageLayout {
    pub fn new(config: &Config) -> Result<Self> {
        let (cache_dir, owned) = match &config.temp_dir {
            Some(dir) => {
                fs::create_dir_all(dir)?;
                (dir.clone(), None)
            }
            None => {
                let dir = tempfile::Builder::new().prefix("jsondb-").tempdir()?;
                (dir.path().to_path_buf(), Some(dir))
            }
        };

        Ok(StorageLayout {
            cache_dir,
            extension: config.cache_extension.clone(),
            _owned: owned,
        })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn cache_path(&self, collection: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.{}", collection, self.extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_dir_is_created() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("nested").join("cache");
        let layout = StorageLayout::new(&Config::default().with_temp_dir(&dir)).unwrap();

        assert!(dir.is_dir());
        assert_eq!(layout.cache_path("users"), dir.join("users.json.tmp"));
    }

    #[test]
    fn test_private_dir_removed_on_drop() {
        let layout = StorageLayout::new(&Config::default()).unwrap();
        let dir = layout.cache_dir().to_path_buf();
        assert!(dir.is_dir());
        drop(layout);
        assert!(!dir.exists());
    }
}
