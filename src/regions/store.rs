//! Persisted per-map scan-line artifact
//!
//! Ray casting the whole map is the single most expensive step of the
//! analysis, so its raw output is saved per map and reloaded at startup.
//! Regions are rebuilt from the restored lines, which keeps the round trip
//! exact: the same map yields identical regions whether the lines were
//! freshly cast or loaded.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::Result;
use crate::regions::chokes::VisionLine;

pub struct ScanLineStore {
    directory: PathBuf,
}

impl ScanLineStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self { directory: directory.into() }
    }

    fn file_for(&self, map_name: &str) -> PathBuf {
        let sanitized: String = map_name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        self.directory.join(format!("{sanitized}_scan_lines.json"))
    }

    /// Load persisted scan lines for a map. Ok(None) when nothing was saved.
    pub fn load(&self, map_name: &str) -> Result<Option<Vec<VisionLine>>> {
        let path = self.file_for(map_name);
        if !Path::new(&path).exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)?;
        let lines: Vec<VisionLine> = serde_json::from_str(&contents)?;
        tracing::info!(map = map_name, lines = lines.len(), "scan lines loaded");
        Ok(Some(lines))
    }

    /// Persist scan lines for a map, creating the directory if needed.
    pub fn save(&self, map_name: &str, lines: &[VisionLine]) -> Result<()> {
        fs::create_dir_all(&self.directory)?;
        let contents = serde_json::to_string(lines)?;
        fs::write(self.file_for(map_name), contents)?;
        tracing::info!(map = map_name, lines = lines.len(), "scan lines saved");
        Ok(())
    }
}
