use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A file discovery could not turn into an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Statistics about one `load_from_folder` run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    /// Paths with the configured extension, including unreadable ones
    pub files_found: usize,

    /// Entries appended to the registry
    pub entries_loaded: usize,

    /// Time taken in milliseconds
    pub time_ms: u64,

    /// Files skipped, with the reason
    pub failures: Vec<LoadFailure>,
}

impl LoadReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entry(&mut self) {
        self.entries_loaded += 1;
    }

    pub fn add_failure(&mut self, path: impl Into<PathBuf>, reason: impl ToString) {
        self.failures.push(LoadFailure {
            path: path.into(),
            reason: reason.to_string(),
        });
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
