use std::path::PathBuf;

use simtab_store::StoreError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, QueryError>;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("cannot load scalar results of {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Invalid slice options: {0}")]
    InvalidOptions(String),
}

impl QueryError {
    pub fn load(path: impl Into<PathBuf>, source: StoreError) -> Self {
        Self::Load {
            path: path.into(),
            source,
        }
    }
}
