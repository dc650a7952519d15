use thiserror::Error;

/// Result type for name decoding
pub type Result<T> = std::result::Result<T, NameError>;

/// Errors raised while decoding a parameter-encoded file name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    /// A token outside the base name does not split on exactly one `=`
    #[error("malformed parameter token '{token}' in '{name}': expected exactly one '='")]
    MalformedToken { name: String, token: String },

    /// The same key appears twice in one name
    #[error("duplicate parameter '{key}' in '{name}'")]
    DuplicateKey { name: String, key: String },

    /// Nothing left after stripping directory and extension
    #[error("empty file name")]
    Empty,
}

impl NameError {
    pub fn malformed(name: impl Into<String>, token: impl Into<String>) -> Self {
        Self::MalformedToken {
            name: name.into(),
            token: token.into(),
        }
    }
}

/// Raised when a raw cell is forced into a numeric type it does not hold
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot cast '{raw}' to {target}")]
pub struct CastError {
    pub raw: String,
    pub target: &'static str,
}

impl CastError {
    pub fn new(raw: impl Into<String>, target: &'static str) -> Self {
        Self {
            raw: raw.into(),
            target,
        }
    }
}
