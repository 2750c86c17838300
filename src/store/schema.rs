use serde::{Deserialize, Serialize};

use crate::session::result::TestResult;

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryData {
    pub schema_version: u32,
    #[serde(default)]
    pub results: Vec<TestResult>,
}

impl Default for HistoryData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            results: Vec::new(),
        }
    }
}

impl HistoryData {
    /// Check if loaded data has a stale schema version and needs reset.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }

    /// Drops the oldest results until at most `cap` remain.
    pub fn enforce_cap(&mut self, cap: usize) {
        if self.results.len() > cap {
            let excess = self.results.len() - cap;
            self.results.drain(..excess);
        }
    }
}
