use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error on {}: {source}", .path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: simtab_naming::NameError,
    },

    #[error("{}: {source}", .path.display())]
    Table {
        path: PathBuf,
        #[source]
        source: simtab_table::TableError,
    },

    #[error("unknown parameter '{key}' in {}", .path.display())]
    UnknownParameter { path: PathBuf, key: String },

    #[error("Invalid results path: {0}")]
    InvalidPath(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl StoreError {
    pub fn table(path: impl Into<PathBuf>, source: simtab_table::TableError) -> Self {
        Self::Table {
            path: path.into(),
            source,
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
