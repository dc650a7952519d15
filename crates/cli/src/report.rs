use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;
use simtab_naming::ParameterMap;
use simtab_query::Label;
use simtab_store::{Entry, LoadReport};

/// JSON view of a derived slice
#[derive(Debug, Serialize)]
pub(crate) struct SliceSummary {
    pub path: PathBuf,
    pub base_name: String,
    pub parameters: ParameterMap,
    pub columns: Vec<String>,
    pub rows: usize,
    pub saved: bool,
}

impl SliceSummary {
    pub(crate) fn from_entry(entry: &Entry) -> Result<Self> {
        let table = entry.table()?;
        Ok(Self {
            path: entry.filepath().to_path_buf(),
            base_name: entry.base_name().to_string(),
            parameters: entry.parameters().clone(),
            columns: table.column_names().to_vec(),
            rows: table.row_count(),
            saved: !entry.is_dirty(),
        })
    }
}

pub(crate) fn render_load_report(report: &LoadReport) -> String {
    let mut out = format!(
        "Loaded {} of {} files in {} ms",
        report.entries_loaded, report.files_found, report.time_ms
    );
    for failure in &report.failures {
        out.push_str(&format!(
            "\n  skipped {}: {}",
            failure.path.display(),
            failure.reason
        ));
    }
    out
}

pub(crate) fn render_labels<E: Borrow<Entry>>(entries: &[E]) -> String {
    entries
        .iter()
        .map(|entry| Label::new(Borrow::<Entry>::borrow(entry)).to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn render_slices(slices: &[SliceSummary]) -> String {
    let mut out = String::new();
    for (idx, slice) in slices.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        out.push_str(&format!(
            "{}{}\n  columns: {} ({} rows)",
            slice.path.display(),
            if slice.saved { "" } else { " (not saved)" },
            slice.columns.join(", "),
            slice.rows
        ));
    }
    out
}

pub(crate) fn render_scalars(results: &BTreeMap<String, String>) -> String {
    let width = results.keys().map(|name| name.chars().count()).max().unwrap_or(0);
    results
        .iter()
        .map(|(name, value)| format!("{name:<width$}  {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}
