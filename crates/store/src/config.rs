use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use simtab_naming::{NameCodec, DEFAULT_EXTENSION, DEFAULT_SEPARATOR};
use simtab_table::ColumnPair;

use crate::error::{Result, StoreError};

/// File looked up by [`SimtabConfig::discover`]
pub const CONFIG_FILE_NAME: &str = "simtab.toml";

/// Settings shared by discovery, entries and slicing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimtabConfig {
    /// Separator between base name and `key=value` tokens in file names
    pub name_separator: String,

    /// Cell delimiter inside result files
    pub delimiter: char,

    /// Extension of result files (without the dot)
    pub extension: String,

    /// Columns holding parameters inside the file itself. When set, every
    /// file is read at discovery and these parameters override the ones in
    /// its name.
    pub parameter_columns: Option<ColumnPair>,

    /// Candidate columns for scalar results, in priority order
    pub result_columns: Vec<ColumnPair>,

    /// Walk dot-files and dot-directories during discovery
    pub include_hidden: bool,
}

impl Default for SimtabConfig {
    fn default() -> Self {
        Self {
            name_separator: DEFAULT_SEPARATOR.to_string(),
            delimiter: ' ',
            extension: DEFAULT_EXTENSION.to_string(),
            parameter_columns: None,
            result_columns: vec![
                ColumnPair::new("result_name", "result_value"),
                ColumnPair::new("name", "value"),
            ],
            include_hidden: true,
        }
    }
}

impl SimtabConfig {
    /// Comma-delimited files; everything else keeps its default
    pub fn comma_separated() -> Self {
        Self {
            delimiter: ',',
            ..Default::default()
        }
    }

    /// Load a TOML file; missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| StoreError::IoError {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&raw)
            .map_err(|e| StoreError::config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load `dir/simtab.toml` when present, defaults otherwise.
    pub fn discover(dir: &Path) -> Result<Self> {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name_separator.is_empty() {
            return Err(StoreError::config("name_separator must not be empty"));
        }
        if self.name_separator.contains('=') {
            return Err(StoreError::config(format!(
                "name_separator '{}' must not contain '='",
                self.name_separator
            )));
        }
        if matches!(self.delimiter, '"' | '\n' | '\r') {
            return Err(StoreError::config(format!(
                "delimiter {:?} is not allowed",
                self.delimiter
            )));
        }
        if let Some(pair) = &self.parameter_columns {
            if pair.name.is_empty() || pair.value.is_empty() {
                return Err(StoreError::config("parameter_columns need two column names"));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn codec(&self) -> NameCodec {
        NameCodec::new(self.name_separator.clone(), self.extension.clone())
    }
}
