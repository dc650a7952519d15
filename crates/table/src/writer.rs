use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TableError};
use crate::table::Table;

/// How the outer sequence passed to [`write`] is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Each inner sequence is one line
    #[default]
    Rows,
    /// Each inner sequence is one column; shorter columns are padded
    Columns,
}

/// Write `data` as delimited text, creating parent directories as needed.
pub fn write<S: AsRef<str>>(
    data: &[Vec<S>],
    path: &Path,
    orientation: Orientation,
    delimiter: char,
) -> Result<()> {
    match orientation {
        Orientation::Rows => write_lines(path, delimiter, data.iter().map(|row| {
            row.iter().map(|cell| cell.as_ref()).collect::<Vec<_>>()
        })),
        Orientation::Columns => {
            let height = data.iter().map(Vec::len).max().unwrap_or(0);
            write_lines(
                path,
                delimiter,
                (0..height).map(|row| {
                    data.iter()
                        .map(|col| col.get(row).map(|cell| cell.as_ref()).unwrap_or(""))
                        .collect::<Vec<_>>()
                }),
            )
        }
    }
}

/// Write `table` with its column names as the header row.
pub fn write_table(table: &Table, path: &Path, delimiter: char) -> Result<()> {
    let header = table
        .column_names()
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>();
    write_lines(
        path,
        delimiter,
        std::iter::once(header).chain(table.rows()),
    )?;
    log::debug!(
        "Wrote {} columns x {} rows to {}",
        table.column_count(),
        table.row_count(),
        path.display()
    );
    Ok(())
}

fn write_lines<'a, I>(path: &Path, delimiter: char, lines: I) -> Result<()>
where
    I: Iterator<Item = Vec<&'a str>>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| TableError::io(parent, e))?;
    }

    let file = File::create(path).map_err(|e| TableError::io(path, e))?;
    let mut out = BufWriter::new(file);
    let mut delim_buf = [0u8; 4];
    let delim = delimiter.encode_utf8(&mut delim_buf).as_bytes();

    for line in lines {
        for (idx, cell) in line.iter().enumerate() {
            if idx > 0 {
                out.write_all(delim).map_err(|e| TableError::io(path, e))?;
            }
            out.write_all(escape(cell, delimiter).as_bytes())
                .map_err(|e| TableError::io(path, e))?;
        }
        out.write_all(b"\n").map_err(|e| TableError::io(path, e))?;
    }
    out.flush().map_err(|e| TableError::io(path, e))
}

/// Quote cells that would not survive a read back: empty cells, cells holding
/// the delimiter or a quote.
fn escape(cell: &str, delimiter: char) -> std::borrow::Cow<'_, str> {
    if cell.is_empty() {
        return "\"\"".into();
    }
    if cell.contains(delimiter) || cell.contains('"') || cell.contains('\n') {
        return format!("\"{}\"", cell.replace('"', "\"\"")).into();
    }
    cell.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read_table;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn writes_rows_and_creates_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/deeper/out.csv");
        let data = vec![vec!["a", "b"], vec!["1", "2"]];
        write(&data, &path, Orientation::Rows, ',').unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a,b\n1,2\n");
    }

    #[test]
    fn writes_columns_padding_short_ones() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cols.csv");
        let data = vec![
            vec!["x".to_string(), "1".to_string(), "2".to_string()],
            vec!["y".to_string(), "3".to_string()],
        ];
        write(&data, &path, Orientation::Columns, ' ').unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "x y\n1 3\n2 \"\"\n");
    }

    #[test]
    fn table_survives_a_write_read_cycle_with_awkward_cells() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.csv");
        let table = Table::from_columns([
            ("name", vec!["plain".to_string(), "has space".to_string()]),
            ("note", vec![String::new(), "say \"hi\"".to_string()]),
        ]);
        write_table(&table, &path, ' ').unwrap();
        let back = read_table(&path, ' ').unwrap();
        assert_eq!(back, table);
    }
}
