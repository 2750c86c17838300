pub mod json_store;
pub mod memory_store;
pub mod schema;

use std::path::PathBuf;

use anyhow::Result;

use crate::session::result::TestResult;

pub use json_store::JsonStore;
pub use memory_store::MemoryStore;

/// Where finished results are kept between runs.
pub trait ResultStore {
    /// Every stored result, oldest first.
    fn load_results(&self) -> Result<Vec<TestResult>>;

    fn save_result(&self, result: &TestResult) -> Result<()>;
}

/// Opens the history store, or a throwaway in-memory one for a dry run.
/// A dry run never touches `history_dir`.
pub fn open(history_dir: PathBuf, history_cap: usize, dry_run: bool) -> Result<Box<dyn ResultStore>> {
    if dry_run {
        return Ok(Box::new(MemoryStore::new()));
    }
    Ok(Box::new(JsonStore::with_base_dir(history_dir, history_cap)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_dry_run_does_not_create_history_dir() {
        let dir = TempDir::new().unwrap();
        let history_dir = dir.path().join("history");
        let store = open(history_dir.clone(), 10, true).unwrap();
        assert!(store.load_results().unwrap().is_empty());
        assert!(!history_dir.exists());
    }

    #[test]
    fn test_open_creates_history_dir() {
        let dir = TempDir::new().unwrap();
        let history_dir = dir.path().join("history");
        let store = open(history_dir.clone(), 10, false).unwrap();
        assert!(history_dir.exists());
        assert!(store.load_results().unwrap().is_empty());
    }
}
