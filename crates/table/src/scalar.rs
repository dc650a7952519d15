use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::table::Table;

/// A `(name column, value column)` pair holding key/value rows
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnPair {
    pub name: String,
    pub value: String,
}

impl ColumnPair {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Scalar results of `table`, trying `pairs` in priority order.
///
/// A pair whose columns are missing is skipped; the first pair yielding a
/// non-empty mapping wins. No match gives an empty mapping.
#[must_use]
pub fn extract_scalars(table: &Table, pairs: &[ColumnPair]) -> BTreeMap<String, String> {
    for pair in pairs {
        match table.scalar_pairs(&pair.name, &pair.value) {
            Ok(found) if !found.is_empty() => return found,
            Ok(_) => log::debug!("Columns {}/{} hold no scalars", pair.name, pair.value),
            Err(_) => {}
        }
    }
    BTreeMap::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(header: &[&str], rows: &[&[&str]]) -> Table {
        let rows: Vec<Vec<String>> = rows
            .iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect();
        Table::from_rows(header, &rows)
    }

    #[test]
    fn first_non_empty_pair_wins() {
        let t = table(
            &["result_name", "result_value", "name", "value"],
            &[&["", "", "energy", "1.5"]],
        );
        let pairs = [
            ColumnPair::new("missing", "columns"),
            ColumnPair::new("result_name", "result_value"),
            ColumnPair::new("name", "value"),
        ];
        let scalars = extract_scalars(&t, &pairs);
        assert_eq!(scalars.get("energy").map(String::as_str), Some("1.5"));
        assert_eq!(scalars.len(), 1);
    }

    #[test]
    fn no_pair_matches() {
        let t = table(&["a"], &[&["1"]]);
        assert!(extract_scalars(&t, &[ColumnPair::new("name", "value")]).is_empty());
    }
}
