use std::sync::Mutex;

use anyhow::{Result, anyhow};

use crate::session::result::TestResult;
use crate::store::ResultStore;

/// Volatile store for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    results: Mutex<Vec<TestResult>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_results(results: Vec<TestResult>) -> Self {
        Self {
            results: Mutex::new(results),
        }
    }
}

impl ResultStore for MemoryStore {
    fn load_results(&self) -> Result<Vec<TestResult>> {
        let results = self
            .results
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        Ok(results.clone())
    }

    fn save_result(&self, result: &TestResult) -> Result<()> {
        self.results
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))?
            .push(result.clone());
        Ok(())
    }
}
