use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use once_cell::unsync::OnceCell;
use serde::{Deserialize, Serialize};
use simtab_naming::{DataType, ParameterMap, Value};
use simtab_table::{extract_scalars, read_table, write_table, ColumnPair, Table, TableError};

use crate::config::SimtabConfig;
use crate::error::{Result, StoreError};

/// One result file: decoded identity plus lazily loaded content.
///
/// `base_name` and `parameters` are fixed at construction. The table is read
/// on first access and cached; scalar results are cached together with the
/// column pairs that produced them.
#[derive(Debug)]
pub struct Entry {
    filepath: PathBuf,
    base_name: String,
    parameters: ParameterMap,
    unique_parameters: ParameterMap,
    delimiter: char,
    table: OnceCell<Table>,
    scalars: Option<(Vec<ColumnPair>, BTreeMap<String, String>)>,
    dirty: bool,
}

/// Serializable view of an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySummary {
    pub path: PathBuf,
    pub base_name: String,
    pub parameters: ParameterMap,
    pub unique_parameters: ParameterMap,
}

impl Entry {
    /// Decode `path` with the configured codec.
    ///
    /// With `parameter_columns` configured the file is read right away and
    /// the parameters found in those columns override the decoded ones.
    pub fn open(path: impl Into<PathBuf>, config: &SimtabConfig) -> Result<Self> {
        let filepath = path.into();
        let decoded = config
            .codec()
            .decode_path(&filepath)
            .map_err(|source| StoreError::Decode {
                path: filepath.clone(),
                source,
            })?;

        let mut entry = Self {
            unique_parameters: decoded.parameters.clone(),
            filepath,
            base_name: decoded.base_name,
            parameters: decoded.parameters,
            delimiter: config.delimiter,
            table: OnceCell::new(),
            scalars: None,
            dirty: false,
        };

        if let Some(pair) = &config.parameter_columns {
            let from_file = entry.table()?.scalar_pairs(&pair.name, &pair.value);
            match from_file {
                Ok(found) => {
                    log::debug!(
                        "{} parameters read from {}",
                        found.len(),
                        entry.filepath.display()
                    );
                    entry.parameters.extend(found);
                    entry.unique_parameters = entry.parameters.clone();
                }
                Err(TableError::UnknownColumn(_)) => {}
                Err(e) => return Err(StoreError::table(&entry.filepath, e)),
            }
        }

        Ok(entry)
    }

    /// Entry built in memory; dirty until saved.
    pub fn synthesized(
        filepath: impl Into<PathBuf>,
        base_name: impl Into<String>,
        parameters: ParameterMap,
        table: Table,
        delimiter: char,
    ) -> Self {
        Self {
            filepath: filepath.into(),
            base_name: base_name.into(),
            unique_parameters: parameters.clone(),
            parameters,
            delimiter,
            table: OnceCell::with_value(table),
            scalars: None,
            dirty: true,
        }
    }

    #[must_use]
    pub fn filepath(&self) -> &Path {
        &self.filepath
    }

    #[must_use]
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    #[must_use]
    pub fn parameters(&self) -> &ParameterMap {
        &self.parameters
    }

    pub fn parameter(&self, key: &str) -> Result<&str> {
        self.parameters
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| StoreError::UnknownParameter {
                path: self.filepath.clone(),
                key: key.to_string(),
            })
    }

    #[must_use]
    pub fn unique_parameters(&self) -> &ParameterMap {
        &self.unique_parameters
    }

    /// Keep the parameters for which `is_unique` holds.
    pub fn compute_unique_with<F>(&mut self, mut is_unique: F)
    where
        F: FnMut(&str, &str) -> bool,
    {
        self.unique_parameters = self
            .parameters
            .iter()
            .filter(|(key, value)| is_unique(key, value))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
    }

    /// Every parameter counts as unique again.
    pub fn reset_unique(&mut self) {
        self.unique_parameters = self.parameters.clone();
    }

    #[must_use]
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.table.get().is_some()
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The file content, read on first call.
    pub fn table(&self) -> Result<&Table> {
        self.table.get_or_try_init(|| self.load_table())
    }

    pub fn column_names(&self) -> Result<&[String]> {
        Ok(self.table()?.column_names())
    }

    pub fn column(&self, name: &str) -> Result<&[String]> {
        self.table()?
            .column(name)
            .map_err(|e| StoreError::table(&self.filepath, e))
    }

    /// A column by name or index, or an expression over column names.
    pub fn get(&self, selector: &str, data_type: DataType) -> Result<Vec<Value>> {
        self.table()?
            .get(selector, data_type)
            .map_err(|e| StoreError::table(&self.filepath, e))
    }

    /// Scalar results from the first of `pairs` that yields any.
    pub fn scalar_results(&mut self, pairs: &[ColumnPair]) -> Result<&BTreeMap<String, String>> {
        let cached = matches!(&self.scalars, Some((used, _)) if used.as_slice() == pairs);
        if !cached {
            let found = extract_scalars(self.table()?, pairs);
            self.scalars = Some((pairs.to_vec(), found));
        }
        let (_, found) = self
            .scalars
            .get_or_insert_with(|| (pairs.to_vec(), BTreeMap::new()));
        Ok(found)
    }

    pub fn set_column(&mut self, name: &str, values: Vec<String>) -> Result<()> {
        self.modify_table(|table| table.set_column(name, values))
    }

    /// Add a column, renaming on collision; returns the name used.
    pub fn append_column(&mut self, name: &str, values: Vec<String>) -> Result<String> {
        self.modify_table(|table| table.append_column(name, values))
    }

    /// Write the table back to `filepath` when it was modified.
    pub fn save(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        if let Some(table) = self.table.get() {
            write_table(table, &self.filepath, self.delimiter)
                .map_err(|e| StoreError::table(&self.filepath, e))?;
            log::debug!("Saved {}", self.filepath.display());
        }
        self.dirty = false;
        Ok(())
    }

    #[must_use]
    pub fn summary(&self) -> EntrySummary {
        EntrySummary {
            path: self.filepath.clone(),
            base_name: self.base_name.clone(),
            parameters: self.parameters.clone(),
            unique_parameters: self.unique_parameters.clone(),
        }
    }

    fn load_table(&self) -> Result<Table> {
        read_table(&self.filepath, self.delimiter).map_err(|e| StoreError::table(&self.filepath, e))
    }

    fn modify_table<R, F>(&mut self, edit: F) -> Result<R>
    where
        F: FnOnce(&mut Table) -> simtab_table::Result<R>,
    {
        let mut table = match self.table.take() {
            Some(table) => table,
            None => self.load_table()?,
        };
        let outcome = edit(&mut table);
        self.table = OnceCell::with_value(table);

        let value = outcome.map_err(|e| StoreError::table(&self.filepath, e))?;
        self.dirty = true;
        self.scalars = None;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn params(pairs: &[(&str, &str)]) -> ParameterMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn open_decodes_without_reading() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run|a=1|b=2.csv");
        fs::write(&path, "t x\n0 1\n").unwrap();

        let entry = Entry::open(&path, &SimtabConfig::default()).unwrap();
        assert_eq!(entry.base_name(), "run");
        assert_eq!(entry.parameters(), &params(&[("a", "1"), ("b", "2")]));
        assert_eq!(entry.unique_parameters(), entry.parameters());
        assert!(!entry.is_loaded());

        assert_eq!(entry.column("x").unwrap(), &["1".to_string()]);
        assert!(entry.is_loaded());
        assert!(matches!(
            entry.parameter("missing"),
            Err(StoreError::UnknownParameter { .. })
        ));
    }

    #[test]
    fn malformed_name_is_a_decode_error() {
        let config = SimtabConfig::default();
        let err = Entry::open("/tmp/run|oops.csv", &config).unwrap_err();
        assert!(matches!(err, StoreError::Decode { .. }));
    }

    #[test]
    fn parameter_columns_override_name() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run|a=1.csv");
        fs::write(&path, "param value\na 5\nc 7\n").unwrap();

        let config = SimtabConfig {
            parameter_columns: Some(ColumnPair::new("param", "value")),
            ..Default::default()
        };
        let entry = Entry::open(&path, &config).unwrap();
        assert_eq!(entry.parameters(), &params(&[("a", "5"), ("c", "7")]));
        assert!(entry.is_loaded());
    }

    #[test]
    fn scalar_results_are_cached_per_pairs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run|a=1.csv");
        fs::write(&path, "name value key val\nenergy 1.5 other 2\n").unwrap();
        let mut entry = Entry::open(&path, &SimtabConfig::default()).unwrap();

        let first = entry
            .scalar_results(&[ColumnPair::new("name", "value")])
            .unwrap()
            .clone();
        assert_eq!(first.get("energy").map(String::as_str), Some("1.5"));

        let second = entry
            .scalar_results(&[ColumnPair::new("key", "val")])
            .unwrap();
        assert_eq!(second.get("other").map(String::as_str), Some("2"));
        assert!(!second.contains_key("energy"));
    }

    #[test]
    fn modification_marks_dirty_and_save_writes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run|a=1.csv");
        fs::write(&path, "t\n0\n1\n").unwrap();
        let mut entry = Entry::open(&path, &SimtabConfig::default()).unwrap();

        let name = entry
            .append_column("t", vec!["5".into(), "6".into()])
            .unwrap();
        assert_eq!(name, "t_b");
        assert!(entry.is_dirty());
        assert!(entry.set_column("t", vec!["1".into()]).is_err());

        entry.save().unwrap();
        assert!(!entry.is_dirty());
        assert_eq!(fs::read_to_string(&path).unwrap(), "t t_b\n0 5\n1 6\n");
    }

    #[test]
    fn synthesized_entries_start_dirty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out/s|a=1.csv");
        let table = Table::from_columns([("x", vec!["1".to_string()])]);
        let mut entry = Entry::synthesized(&path, "s", params(&[("a", "1")]), table, ',');
        assert!(entry.is_dirty());
        assert!(!path.exists());

        entry.save().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "x\n1\n");
    }

    #[test]
    fn unique_parameters_stay_a_subset() {
        let table = Table::new();
        let mut entry =
            Entry::synthesized("s.csv", "s", params(&[("a", "1"), ("b", "2")]), table, ' ');
        entry.compute_unique_with(|key, _| key == "b");
        assert_eq!(entry.unique_parameters(), &params(&[("b", "2")]));
        entry.reset_unique();
        assert_eq!(entry.unique_parameters().len(), 2);
    }
}
