use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::session::result::TestResult;
use crate::store::ResultStore;
use crate::store::schema::HistoryData;

const HISTORY_FILE: &str = "history.json";

pub struct JsonStore {
    base_dir: PathBuf,
    history_cap: usize,
}

impl JsonStore {
    pub fn with_base_dir(base_dir: PathBuf, history_cap: usize) -> Result<Self> {
        fs::create_dir_all(&base_dir)
            .with_context(|| format!("creating history directory {}", base_dir.display()))?;
        Ok(Self {
            base_dir,
            history_cap,
        })
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// Loads the history file. A missing, unreadable, corrupt or stale file
    /// yields an empty history rather than an error.
    pub fn load_history(&self) -> HistoryData {
        let path = self.file_path(HISTORY_FILE);
        if !path.exists() {
            return HistoryData::default();
        }

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "unreadable history, starting empty");
                return HistoryData::default();
            }
        };

        match serde_json::from_str::<HistoryData>(&content) {
            Ok(data) if data.needs_reset() => {
                tracing::warn!(
                    path = %path.display(),
                    version = data.schema_version,
                    "stale history schema, starting empty"
                );
                HistoryData::default()
            }
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "corrupt history, starting empty");
                HistoryData::default()
            }
        }
    }

    pub fn save_history(&self, data: &HistoryData) -> Result<()> {
        self.save(HISTORY_FILE, data)
            .with_context(|| format!("writing {}", self.file_path(HISTORY_FILE).display()))
    }
}

impl ResultStore for JsonStore {
    fn load_results(&self) -> Result<Vec<TestResult>> {
        Ok(self.load_history().results)
    }

    fn save_result(&self, result: &TestResult) -> Result<()> {
        let mut history = self.load_history();
        history.results.push(result.clone());
        history.enforce_cap(self.history_cap);
        self.save_history(&history)?;
        tracing::debug!(
            id = %result.id,
            stored = history.results.len(),
            "saved result"
        );
        Ok(())
    }
}
