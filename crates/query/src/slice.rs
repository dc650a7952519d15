use std::borrow::{Borrow, BorrowMut};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use simtab_naming::{NameCodec, ParameterMap};
use simtab_store::{Entry, SimtabConfig};
use simtab_table::Table;

use crate::error::{QueryError, Result};
use crate::loader::{ColumnPairLoader, ScalarResultLoader};

/// Joins the shared base name and the pivot key of a derived entry
pub const PIVOT_INFIX: &str = "_vs_";

/// What to slice along
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliceOptions {
    pub pivot_key: String,
    /// Only group entries sharing a base name
    #[serde(default)]
    pub match_base_name: bool,
}

impl SliceOptions {
    pub fn new(pivot_key: impl Into<String>) -> Self {
        Self {
            pivot_key: pivot_key.into(),
            match_base_name: false,
        }
    }

    #[must_use]
    pub fn match_base_name(mut self, enabled: bool) -> Self {
        self.match_base_name = enabled;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.pivot_key.is_empty() {
            return Err(QueryError::InvalidOptions("pivot key must not be empty".into()));
        }
        Ok(())
    }
}

/// Entries that differ only in the pivot parameter
type ClassKey = (Option<String>, ParameterMap);

/// Group `entries` into pivot classes and build one derived entry per class.
///
/// Classes follow first appearance in `entries`, members keep input order.
/// Entries lacking `pivot_key` take no part; single-member classes are
/// dropped. Derived entries are dirty and nothing is written.
pub fn slice<E: BorrowMut<Entry>>(
    pivot_key: &str,
    match_base_name: bool,
    entries: &mut [E],
    loader: &dyn ScalarResultLoader,
) -> Result<Vec<Entry>> {
    slice_with_codec(&NameCodec::default(), pivot_key, match_base_name, entries, loader)
}

fn slice_with_codec<E: BorrowMut<Entry>>(
    codec: &NameCodec,
    pivot_key: &str,
    match_base_name: bool,
    entries: &mut [E],
    loader: &dyn ScalarResultLoader,
) -> Result<Vec<Entry>> {
    let classes = partition(pivot_key, match_base_name, entries);
    log::debug!(
        "Pivot '{pivot_key}': {} classes with at least two members",
        classes.len()
    );

    let mut derived = Vec::with_capacity(classes.len());
    for (shared, members) in classes {
        derived.push(build_slice(codec, pivot_key, shared, &members, entries, loader)?);
    }
    Ok(derived)
}

/// Index-ordered pivot classes of size two or more, as `(shared parameters, member indices)`.
fn partition<E: Borrow<Entry>>(
    pivot_key: &str,
    match_base_name: bool,
    entries: &[E],
) -> Vec<(ParameterMap, Vec<usize>)> {
    let mut classes: Vec<(ParameterMap, Vec<usize>)> = Vec::new();
    let mut lookup: HashMap<ClassKey, usize> = HashMap::new();

    for (idx, entry) in entries.iter().enumerate() {
        let entry = Borrow::<Entry>::borrow(entry);
        if !entry.parameters().contains_key(pivot_key) {
            continue;
        }
        let mut shared = entry.parameters().clone();
        shared.remove(pivot_key);
        let base = match_base_name.then(|| entry.base_name().to_string());

        match lookup.get(&(base.clone(), shared.clone())) {
            Some(&class) => classes[class].1.push(idx),
            None => {
                lookup.insert((base, shared.clone()), classes.len());
                classes.push((shared, vec![idx]));
            }
        }
    }

    classes.retain(|(_, members)| members.len() >= 2);
    classes
}

fn build_slice<E: BorrowMut<Entry>>(
    codec: &NameCodec,
    pivot_key: &str,
    shared: ParameterMap,
    members: &[usize],
    entries: &mut [E],
    loader: &dyn ScalarResultLoader,
) -> Result<Entry> {
    let mut columns: Vec<String> = Vec::new();
    let mut rows: Vec<(String, BTreeMap<String, String>)> = Vec::with_capacity(members.len());
    for &idx in members {
        let entry = BorrowMut::<Entry>::borrow_mut(&mut entries[idx]);
        let results = loader.load(entry)?;
        for name in results.keys() {
            if !columns.contains(name) {
                columns.push(name.clone());
            }
        }
        let pivot_value = entry.parameter(pivot_key)?.to_string();
        rows.push((pivot_value, results));
    }
    if !columns.iter().any(|name| name == pivot_key) {
        columns.push(pivot_key.to_string());
    }

    let table = Table::from_columns(columns.iter().map(|name| {
        let cells = rows
            .iter()
            .map(|(pivot_value, results)| {
                if name == pivot_key {
                    pivot_value.clone()
                } else {
                    results.get(name).cloned().unwrap_or_default()
                }
            })
            .collect::<Vec<_>>();
        (name.as_str(), cells)
    }));

    let first = Borrow::<Entry>::borrow(&entries[members[0]]);
    let base_name = format!("{}{PIVOT_INFIX}{pivot_key}", first.base_name());
    let directory = first
        .filepath()
        .parent()
        .map(PathBuf::from)
        .unwrap_or_default();
    let filepath = directory.join(codec.file_name(&base_name, &shared));
    log::debug!(
        "Slice {} from {} members, columns {:?}",
        filepath.display(),
        members.len(),
        columns
    );

    Ok(Entry::synthesized(
        filepath,
        base_name,
        shared,
        table,
        first.delimiter(),
    ))
}

/// Slicing bound to a configuration: codec, delimiter and result columns
pub struct Slicer {
    codec: NameCodec,
    loader: Box<dyn ScalarResultLoader>,
}

impl Slicer {
    pub fn new(config: &SimtabConfig) -> Self {
        Self {
            codec: config.codec(),
            loader: Box::new(ColumnPairLoader::from_config(config)),
        }
    }

    #[must_use]
    pub fn with_loader(mut self, loader: Box<dyn ScalarResultLoader>) -> Self {
        self.loader = loader;
        self
    }

    pub fn slice<E: BorrowMut<Entry>>(
        &self,
        options: &SliceOptions,
        entries: &mut [E],
    ) -> Result<Vec<Entry>> {
        options.validate()?;
        slice_with_codec(
            &self.codec,
            &options.pivot_key,
            options.match_base_name,
            entries,
            self.loader.as_ref(),
        )
    }

    /// [`Slicer::slice`], then write every derived entry next to its class.
    pub fn slice_and_save<E: BorrowMut<Entry>>(
        &self,
        options: &SliceOptions,
        entries: &mut [E],
    ) -> Result<Vec<Entry>> {
        let mut derived = self.slice(options, entries)?;
        for entry in &mut derived {
            entry.save()?;
        }
        log::info!(
            "Saved {} slices along '{}'",
            derived.len(),
            options.pivot_key
        );
        Ok(derived)
    }
}
