use std::path::PathBuf;

use thiserror::Error;

/// Result type for table operations
pub type Result<T> = std::result::Result<T, TableError>;

/// Errors raised while reading, writing or querying a table
#[derive(Error, Debug)]
pub enum TableError {
    /// I/O failure, attached to the file involved
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file holds no header row
    #[error("{} is empty", .0.display())]
    EmptyFile(PathBuf),

    /// No column with this name
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    /// Column index past the last column
    #[error("column index {index} out of range ({count} columns)")]
    ColumnIndexOutOfRange { index: usize, count: usize },

    /// New column length does not match the table
    #[error("column '{name}' has {found} values, table has {expected} rows")]
    LengthMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    /// Expressions always produce numbers
    #[error("expression '{0}' cannot be read as strings")]
    StringExpression(String),

    #[error(transparent)]
    Cast(#[from] simtab_naming::CastError),

    #[error("expression error: {0}")]
    Expression(#[from] simtab_expr::ExprError),
}

impl TableError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
