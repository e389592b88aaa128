use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::core::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub temp_dir: Option<PathBuf>,      // None: private TempDir, removed on drop
    pub cache_extension: String,        // <temp_dir>/<collection>.<ext>
    pub scan_lanes: usize,              // 0: one lane per hardware thread
    pub first_id: u64,
    pub parallel_scans: bool,           // default mode for bulk operations
}

impl Default for Config {
    fn default() -> Self {
        Config {
            temp_dir: None,
            cache_extension: "json.tmp".to_string(),
            scan_lanes: 0,
            first_id: 0,
            parallel_scans: true,
        }
    }
}

impl Config {
    /// Read a config from a JSON file; missing fields fall back to defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    pub fn with_scan_lanes(mut self, lanes: usize) -> Self {
        self.scan_lanes = lanes;
        self
    }

    pub fn resolved_lanes(&self) -> usize {
        if self.scan_lanes == 0 {
            num_cpus::get().max(1)
        } else {
            self.scan_lanes
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"scan_lanes": 3, "first_id": 100}"#).unwrap();

        let config = Config::from_json_file(&path).unwrap();
        assert_eq!(config.scan_lanes, 3);
        assert_eq!(config.first_id, 100);
        assert_eq!(config.cache_extension, "json.tmp");
        assert!(config.parallel_scans);
        assert!(config.temp_dir.is_none());
    }

    #[test]
    fn test_zero_lanes_resolves_to_hardware() {
        let config = Config::default();
        assert!(config.resolved_lanes() >= 1);
        assert_eq!(config.with_scan_lanes(2).resolved_lanes(), 2);
    }
}
