use std::collections::{BTreeMap, HashMap};

use simtab_expr::{Evaluate, Expression, ExpressionEvaluator};
use simtab_naming::{CastError, Complex64, DataType, Value};

use crate::error::{Result, TableError};

/// Suffix appended (repeatedly) to a column name that is already taken
pub const COLLISION_SUFFIX: &str = "_b";

/// Column-oriented table of raw cells.
///
/// Column names are unique: a colliding name gets [`COLLISION_SUFFIX`]
/// appended until it is free, so `x`, `x` loads as `x`, `x_b`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Vec<String>>,
    index: HashMap<String, usize>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a header and data rows.
    ///
    /// Short rows are padded with empty cells; cells past the header are
    /// dropped.
    pub fn from_rows<S: AsRef<str>>(header: &[S], rows: &[Vec<String>]) -> Self {
        let mut table = Self::new();
        for (col, name) in header.iter().enumerate() {
            let values = rows
                .iter()
                .map(|row| row.get(col).cloned().unwrap_or_default())
                .collect();
            table.push_column(name.as_ref(), values);
        }
        table
    }

    /// Build from named columns, renaming collisions.
    pub fn from_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<String>)>,
        S: AsRef<str>,
    {
        let mut table = Self::new();
        for (name, values) in columns {
            table.push_column(name.as_ref(), values);
        }
        table
    }

    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.names.len()
    }

    /// Length of the longest column.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.columns.iter().map(Vec::len).max().unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Result<&[String]> {
        self.index
            .get(name)
            .map(|&idx| self.columns[idx].as_slice())
            .ok_or_else(|| TableError::UnknownColumn(name.to_string()))
    }

    pub fn column_at(&self, index: usize) -> Result<&[String]> {
        self.columns
            .get(index)
            .map(Vec::as_slice)
            .ok_or(TableError::ColumnIndexOutOfRange {
                index,
                count: self.columns.len(),
            })
    }

    /// Cells of row `index`, empty strings where a column is shorter.
    #[must_use]
    pub fn row(&self, index: usize) -> Vec<&str> {
        self.columns
            .iter()
            .map(|col| col.get(index).map(String::as_str).unwrap_or(""))
            .collect()
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<&str>> + '_ {
        (0..self.row_count()).map(move |idx| self.row(idx))
    }

    /// First free name derived from `name`.
    #[must_use]
    pub fn free_name(&self, name: &str) -> String {
        let mut candidate = name.to_string();
        while self.index.contains_key(&candidate) {
            candidate.push_str(COLLISION_SUFFIX);
        }
        candidate
    }

    /// Append a column without length checks; returns the name it got.
    pub(crate) fn push_column(&mut self, name: &str, values: Vec<String>) -> String {
        let name = self.free_name(name);
        self.index.insert(name.clone(), self.names.len());
        self.names.push(name.clone());
        self.columns.push(values);
        name
    }

    /// Append a column, renaming it on collision; returns the name it got.
    pub fn append_column(&mut self, name: &str, values: Vec<String>) -> Result<String> {
        self.check_length(name, values.len())?;
        Ok(self.push_column(name, values))
    }

    /// Replace the column `name`, or append it when absent.
    pub fn set_column(&mut self, name: &str, values: Vec<String>) -> Result<()> {
        match self.index.get(name) {
            Some(&idx) => {
                if self.columns.len() > 1 {
                    let others = self
                        .columns
                        .iter()
                        .enumerate()
                        .filter(|(i, _)| *i != idx)
                        .map(|(_, col)| col.len())
                        .max()
                        .unwrap_or(0);
                    if values.len() != others {
                        return Err(TableError::LengthMismatch {
                            name: name.to_string(),
                            expected: others,
                            found: values.len(),
                        });
                    }
                }
                self.columns[idx] = values;
            }
            None => {
                self.check_length(name, values.len())?;
                self.push_column(name, values);
            }
        }
        Ok(())
    }

    /// Remove a column, returning its cells.
    pub fn remove_column(&mut self, name: &str) -> Result<Vec<String>> {
        let idx = self
            .index
            .get(name)
            .copied()
            .ok_or_else(|| TableError::UnknownColumn(name.to_string()))?;
        self.names.remove(idx);
        let values = self.columns.remove(idx);
        self.reindex();
        Ok(values)
    }

    /// Append every column of `other`, renaming collisions.
    pub fn merge(&mut self, other: Table) {
        for (name, values) in other.names.into_iter().zip(other.columns) {
            self.push_column(&name, values);
        }
    }

    /// `name column -> value column` mapping built from each data row.
    ///
    /// Rows with an empty name cell are skipped; a repeated name keeps the
    /// last value.
    pub fn scalar_pairs(&self, name_column: &str, value_column: &str) -> Result<BTreeMap<String, String>> {
        let names = self.column(name_column)?;
        let values = self.column(value_column)?;
        Ok(names
            .iter()
            .enumerate()
            .filter(|(_, name)| !name.trim().is_empty())
            .map(|(row, name)| {
                let value = values.get(row).cloned().unwrap_or_default();
                (name.trim().to_string(), value)
            })
            .collect())
    }

    /// Read a column (by name or index) or an expression over column names.
    ///
    /// Exact column names win over indices, indices over expressions.
    /// Expressions yield numbers, so `DataType::String` is rejected for them.
    pub fn get(&self, selector: &str, data_type: DataType) -> Result<Vec<Value>> {
        if let Ok(cells) = self.column(selector) {
            return convert_cells(cells, data_type);
        }
        if let Ok(index) = selector.trim().parse::<usize>() {
            return convert_cells(self.column_at(index)?, data_type);
        }
        if data_type == DataType::String {
            return Err(TableError::StringExpression(selector.to_string()));
        }

        self.evaluate(&ExpressionEvaluator, selector)?
            .into_iter()
            .map(|value| numeric_value(value, data_type))
            .collect()
    }

    /// Parse `expression` once and evaluate it per row, binding every
    /// referenced column as a float (unparsable cells bind as NaN).
    pub fn evaluate<E>(&self, evaluator: &E, expression: &str) -> Result<Vec<f64>>
    where
        E: Evaluate + ?Sized,
    {
        let parsed = Expression::parse(expression)?;
        let referenced: Vec<(String, &[String])> = parsed
            .variables()
            .into_iter()
            .filter_map(|name| {
                let cells = self.column(&name).ok()?;
                Some((name, cells))
            })
            .collect();

        let mut bindings = HashMap::with_capacity(referenced.len());
        let mut out = Vec::with_capacity(self.row_count());
        for row in 0..self.row_count() {
            for (name, cells) in &referenced {
                let cell = cells.get(row).map(String::as_str).unwrap_or("");
                bindings.insert(name.clone(), Value::parse_float(cell).unwrap_or(f64::NAN));
            }
            out.push(evaluator.evaluate_parsed(&parsed, &bindings)?);
        }
        Ok(out)
    }

    fn check_length(&self, name: &str, found: usize) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }
        let expected = self.row_count();
        if expected != found {
            return Err(TableError::LengthMismatch {
                name: name.to_string(),
                expected,
                found,
            });
        }
        Ok(())
    }

    fn reindex(&mut self) {
        self.index = self
            .names
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), idx))
            .collect();
    }
}

fn convert_cells(cells: &[String], data_type: DataType) -> Result<Vec<Value>> {
    cells
        .iter()
        .map(|cell| data_type.convert(cell).map_err(TableError::from))
        .collect()
}

fn numeric_value(value: f64, data_type: DataType) -> Result<Value> {
    match data_type {
        DataType::Integer => {
            if value.is_finite() && value.fract() == 0.0 {
                Ok(Value::Integer(value as i64))
            } else {
                Err(CastError::new(value.to_string(), "integer").into())
            }
        }
        DataType::Complex => Ok(Value::Complex(Complex64::new(value, 0.0))),
        DataType::Float | DataType::String => Ok(Value::Float(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn sample() -> Table {
        Table::from_rows(
            &["time", "position"],
            &[strings(&["0", "0"]), strings(&["1", "5"]), strings(&["2", "20"])],
        )
    }

    #[test]
    fn colliding_names_are_suffixed() {
        let table = Table::from_rows(&["x", "x", "x"], &[strings(&["1", "2", "3"])]);
        assert_eq!(table.column_names(), &strings(&["x", "x_b", "x_b_b"])[..]);
        assert_eq!(table.column("x_b").unwrap(), &strings(&["2"])[..]);
    }

    #[test]
    fn merge_keeps_both_columns() {
        let mut left = Table::from_columns([("x", strings(&["1", "2"]))]);
        let right = Table::from_columns([("x", strings(&["3", "4"])), ("y", strings(&["5", "6"]))]);
        left.merge(right);
        assert_eq!(left.column_names(), &strings(&["x", "x_b", "y"])[..]);
        assert_eq!(left.column("x").unwrap(), &strings(&["1", "2"])[..]);
        assert_eq!(left.column("x_b").unwrap(), &strings(&["3", "4"])[..]);
    }

    #[test]
    fn unknown_column_is_an_error() {
        let table = sample();
        assert!(matches!(table.column("speed"), Err(TableError::UnknownColumn(name)) if name == "speed"));
        assert!(matches!(
            table.column_at(7),
            Err(TableError::ColumnIndexOutOfRange { index: 7, count: 2 })
        ));
    }

    #[test]
    fn ragged_rows_are_padded() {
        let table = Table::from_rows(&["a", "b"], &[strings(&["1"]), strings(&["2", "3", "4"])]);
        assert_eq!(table.column("b").unwrap(), &strings(&["", "3"])[..]);
        assert_eq!(table.row(0), vec!["1", ""]);
    }

    #[test]
    fn set_and_append_check_lengths() {
        let mut table = sample();
        table.set_column("time", strings(&["5", "6", "7"])).unwrap();
        assert_eq!(table.column("time").unwrap()[0], "5");

        let err = table.set_column("time", strings(&["1"])).unwrap_err();
        assert!(matches!(err, TableError::LengthMismatch { expected: 3, found: 1, .. }));

        let name = table.append_column("time", strings(&["a", "b", "c"])).unwrap();
        assert_eq!(name, "time_b");
        assert!(table.append_column("short", strings(&["a"])).is_err());

        let removed = table.remove_column("time").unwrap();
        assert_eq!(removed, strings(&["5", "6", "7"]));
        assert_eq!(table.column_names(), &strings(&["position", "time_b"])[..]);
        assert_eq!(table.column("time_b").unwrap()[2], "c");
    }

    #[test]
    fn scalar_pairs_maps_names_to_values() {
        let table = Table::from_rows(
            &["result_name", "result_value"],
            &[strings(&["energy", "3.2"]), strings(&["", "9"]), strings(&["time", "0.5"])],
        );
        let pairs = table.scalar_pairs("result_name", "result_value").unwrap();
        assert_eq!(
            pairs,
            BTreeMap::from([
                ("energy".to_string(), "3.2".to_string()),
                ("time".to_string(), "0.5".to_string()),
            ])
        );
        assert!(table.scalar_pairs("name", "result_value").is_err());
    }

    #[test]
    fn get_reads_columns_indices_and_expressions() {
        let table = sample();
        assert_eq!(
            table.get("position", DataType::Integer).unwrap(),
            vec![Value::Integer(0), Value::Integer(5), Value::Integer(20)]
        );
        assert_eq!(
            table.get("0", DataType::String).unwrap(),
            vec![Value::from("0"), Value::from("1"), Value::from("2")]
        );
        assert_eq!(
            table.get("2 * time + 1", DataType::Float).unwrap(),
            vec![Value::Float(1.0), Value::Float(3.0), Value::Float(5.0)]
        );
        assert!(matches!(
            table.get("2 * time", DataType::String),
            Err(TableError::StringExpression(_))
        ));
        assert!(matches!(
            table.get("speed * 2", DataType::Float),
            Err(TableError::Expression(_))
        ));
    }

    #[test]
    fn expressions_bind_unparsable_cells_as_nan() {
        let table = Table::from_rows(&["x"], &[strings(&["1"]), strings(&["n/a"])]);
        let values = table.evaluate(&ExpressionEvaluator, "x * 2").unwrap();
        assert_eq!(values[0], 2.0);
        assert!(values[1].is_nan());
    }

    #[derive(Default)]
    struct CountingEvaluator {
        parsed_calls: std::cell::Cell<usize>,
    }

    impl Evaluate for CountingEvaluator {
        fn evaluate_parsed(
            &self,
            expression: &Expression,
            bindings: &HashMap<String, f64>,
        ) -> simtab_expr::Result<f64> {
            self.parsed_calls.set(self.parsed_calls.get() + 1);
            expression.eval(bindings)
        }

        fn evaluate(&self, _: &str, _: &HashMap<String, f64>) -> simtab_expr::Result<f64> {
            panic!("rows must reuse the parsed expression");
        }
    }

    #[test]
    fn expression_is_parsed_once_per_table() {
        let table = sample();
        let evaluator = CountingEvaluator::default();
        let values = table.evaluate(&evaluator, "position / 5 + time").unwrap();
        assert_eq!(values, vec![0.0, 2.0, 6.0]);
        assert_eq!(evaluator.parsed_calls.get(), table.row_count());
    }
}
