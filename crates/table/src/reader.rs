use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{Result, TableError};
use crate::table::Table;

/// Read a delimited file: first row is the header, the rest are data rows.
///
/// Blank lines are skipped. A trailing delimiter on every line produces an
/// unnamed, all-empty last column; that column is dropped. Non-empty cells
/// past the header width are dropped with a warning naming the line.
pub fn read_table(path: &Path, delimiter: char) -> Result<Table> {
    let file = File::open(path).map_err(|e| TableError::io(path, e))?;
    let reader = BufReader::new(file);

    let mut header: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    let mut line_numbers = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| TableError::io(path, e))?;
        let line = line.strip_suffix('\r').unwrap_or(&line);
        if line.trim().is_empty() {
            continue;
        }
        let record = split_record(line, delimiter);
        if header.is_none() {
            header = Some(record);
        } else {
            rows.push(record);
            line_numbers.push(idx + 1);
        }
    }

    let Some(mut header) = header else {
        return Err(TableError::EmptyFile(path.to_path_buf()));
    };

    let last = header.len().saturating_sub(1);
    let trailing_empty = header.len() > 1
        && header[last].is_empty()
        && rows
            .iter()
            .all(|row| row.get(last).map_or(true, |cell| cell.is_empty()));
    if trailing_empty {
        header.pop();
    }

    for (line, dropped) in overflowing_lines(header.len(), &rows, &line_numbers) {
        log::warn!(
            "{}:{line}: dropped {dropped} cells past the {} header columns",
            path.display(),
            header.len()
        );
    }

    let table = Table::from_rows(&header, &rows);
    log::debug!(
        "Loaded {} columns x {} rows from {}",
        table.column_count(),
        table.row_count(),
        path.display()
    );
    Ok(table)
}

/// Line numbers of rows holding non-empty cells past `width`, with the
/// number of such cells.
fn overflowing_lines(
    width: usize,
    rows: &[Vec<String>],
    line_numbers: &[usize],
) -> Vec<(usize, usize)> {
    rows.iter()
        .zip(line_numbers)
        .filter_map(|(row, &line)| {
            let dropped = row.iter().skip(width).filter(|cell| !cell.is_empty()).count();
            (dropped > 0).then_some((line, dropped))
        })
        .collect()
}

/// Split one line on `delimiter`, honouring double-quoted fields.
///
/// Inside quotes the delimiter is literal and `""` stands for one quote.
#[must_use]
pub fn split_record(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(ch);
            }
        } else if ch == '"' && field.is_empty() {
            in_quotes = true;
        } else if ch == delimiter {
            fields.push(std::mem::take(&mut field));
        } else {
            field.push(ch);
        }
    }
    fields.push(field);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn splits_quoted_fields() {
        assert_eq!(split_record("a,\"b,c\",d", ','), vec!["a", "b,c", "d"]);
        assert_eq!(split_record("\"say \"\"hi\"\"\" x", ' '), vec!["say \"hi\"", "x"]);
        assert_eq!(split_record("a  b", ' '), vec!["a", "", "b"]);
        assert_eq!(split_record("\"\" 1", ' '), vec!["", "1"]);
    }

    #[test]
    fn reads_header_and_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "time position \n0 0 \n1 5 \n\n2 20 \n").unwrap();

        let table = read_table(&path, ' ').unwrap();
        assert_eq!(table.column_names(), &["time".to_string(), "position".to_string()]);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column("position").unwrap()[2], "20");
    }

    #[test]
    fn duplicate_headers_are_renamed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dup.csv");
        fs::write(&path, "x,x,y\r\n1,2,3\r\n").unwrap();

        let table = read_table(&path, ',').unwrap();
        assert_eq!(
            table.column_names(),
            &["x".to_string(), "x_b".to_string(), "y".to_string()]
        );
        assert_eq!(table.column("x_b").unwrap()[0], "2");
        assert_eq!(table.column("y").unwrap()[0], "3");
    }

    #[test]
    fn cells_past_the_header_are_dropped_and_located() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wide.csv");
        fs::write(&path, "t x\n0 1\n\n1 2 7 8\n2 3 \n").unwrap();

        let table = read_table(&path, ' ').unwrap();
        assert_eq!(table.column_names(), &["t".to_string(), "x".to_string()]);
        assert_eq!(table.column("x").unwrap(), &["1", "2", "3"].map(String::from)[..]);

        let rows = vec![
            split_record("0 1", ' '),
            split_record("1 2 7 8", ' '),
            split_record("2 3 ", ' '),
        ];
        assert_eq!(overflowing_lines(2, &rows, &[2, 4, 5]), vec![(4, 2)]);
    }

    #[test]
    fn empty_file_and_missing_file_fail() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        fs::write(&path, "\n\n").unwrap();
        assert!(matches!(read_table(&path, ','), Err(TableError::EmptyFile(_))));

        let missing = dir.path().join("missing.csv");
        match read_table(&missing, ',') {
            Err(TableError::Io { path, .. }) => assert_eq!(path, missing),
            other => panic!("unexpected {other:?}"),
        }
    }
}
