use std::collections::BTreeMap;

use simtab_store::{Entry, SimtabConfig};
use simtab_table::ColumnPair;

use crate::error::{QueryError, Result};

/// Source of the scalar results placed in a derived slice table
pub trait ScalarResultLoader {
    fn load(&self, entry: &mut Entry) -> Result<BTreeMap<String, String>>;
}

/// Reads scalar results from name/value column pairs, first non-empty pair wins
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPairLoader {
    pairs: Vec<ColumnPair>,
}

impl ColumnPairLoader {
    pub fn new(pairs: Vec<ColumnPair>) -> Self {
        Self { pairs }
    }

    pub fn from_config(config: &SimtabConfig) -> Self {
        Self::new(config.result_columns.clone())
    }

    #[must_use]
    pub fn pairs(&self) -> &[ColumnPair] {
        &self.pairs
    }
}

impl Default for ColumnPairLoader {
    fn default() -> Self {
        Self::from_config(&SimtabConfig::default())
    }
}

impl ScalarResultLoader for ColumnPairLoader {
    fn load(&self, entry: &mut Entry) -> Result<BTreeMap<String, String>> {
        let path = entry.filepath().to_path_buf();
        entry
            .scalar_results(&self.pairs)
            .cloned()
            .map_err(|e| QueryError::load(path, e))
    }
}
