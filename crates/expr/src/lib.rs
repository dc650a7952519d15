//! # Simtab Expressions
//!
//! Small arithmetic language evaluated over named numeric bindings, used to
//! derive values from table columns (`2 * time + offset`).
//!
//! ```text
//! "2 * time" ──> Lexer ──> Tokens ──> Parser ──> Expression ──> eval(bindings)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use simtab_expr::{Evaluate, ExpressionEvaluator};
//!
//! let bindings = HashMap::from([("time".to_string(), 1.5)]);
//! let value = ExpressionEvaluator.evaluate("2 * time + 1", &bindings).unwrap();
//! assert_eq!(value, 4.0);
//! ```

mod error;
mod eval;
mod lexer;
mod parser;

pub use error::{ExprError, Result};
pub use eval::{Evaluate, ExpressionEvaluator};
pub use lexer::{Lexer, Token};
pub use parser::{BinaryOperator, Expression, Parser};
