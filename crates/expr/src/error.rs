use thiserror::Error;

/// Result type for expression parsing and evaluation
pub type Result<T> = std::result::Result<T, ExprError>;

/// Errors raised while parsing or evaluating an expression
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExprError {
    #[error("empty expression")]
    Empty,

    #[error("illegal character '{0}'")]
    IllegalCharacter(char),

    #[error("expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },

    #[error("unknown variable '{0}'")]
    UnknownVariable(String),

    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    #[error("function '{name}' takes {expected} argument(s), got {found}")]
    Arity {
        name: String,
        expected: usize,
        found: usize,
    },
}

impl ExprError {
    pub fn unexpected(expected: impl Into<String>, found: impl std::fmt::Display) -> Self {
        Self::UnexpectedToken {
            expected: expected.into(),
            found: found.to_string(),
        }
    }
}
