use std::fmt;
use std::str::FromStr;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::CastError;
use crate::format::format_significant;

/// Significant digits used whenever a float is rendered as text
pub const FLOAT_DIGITS: usize = 5;

/// Requested representation when reading raw cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    String,
    Integer,
    #[default]
    Float,
    Complex,
}

impl DataType {
    pub const fn as_str(self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::Integer => "integer",
            DataType::Float => "float",
            DataType::Complex => "complex",
        }
    }

    /// Convert a raw cell into a tagged value.
    ///
    /// Integer conversion is strict and fails on anything that is not an
    /// integer literal. Float and complex conversions are soft: unparsable
    /// cells become NaN.
    pub fn convert(self, raw: &str) -> Result<Value, CastError> {
        match self {
            DataType::String => Ok(Value::String(raw.to_string())),
            DataType::Integer => Value::parse_integer(raw),
            DataType::Float => Ok(Value::Float(
                Value::parse_float(raw).unwrap_or(f64::NAN),
            )),
            DataType::Complex => Ok(Value::Complex(
                Value::parse_complex(raw).unwrap_or(Complex64::new(f64::NAN, f64::NAN)),
            )),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" | "str" => Ok(DataType::String),
            "integer" | "int" => Ok(DataType::Integer),
            "float" => Ok(DataType::Float),
            "complex" => Ok(DataType::Complex),
            other => Err(format!(
                "unknown data type '{other}' (expected string, integer, float or complex)"
            )),
        }
    }
}

/// A tagged scalar. Formatting and parsing dispatch on the tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Complex(Complex64),
}

impl Value {
    #[must_use]
    pub const fn data_type(&self) -> DataType {
        match self {
            Value::String(_) => DataType::String,
            Value::Integer(_) => DataType::Integer,
            Value::Float(_) => DataType::Float,
            Value::Complex(_) => DataType::Complex,
        }
    }

    pub fn parse_integer(raw: &str) -> Result<Value, CastError> {
        raw.trim()
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| CastError::new(raw, "integer"))
    }

    pub fn parse_float(raw: &str) -> Result<f64, CastError> {
        raw.trim()
            .parse::<f64>()
            .map_err(|_| CastError::new(raw, "float"))
    }

    /// Accepts `1.5`, `2j`, `1+2j`, `(1-2j)` and the `i` suffix.
    pub fn parse_complex(raw: &str) -> Result<Complex64, CastError> {
        let trimmed = raw.trim();
        let inner = trimmed
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
            .unwrap_or(trimmed);
        Complex64::from_str(inner).map_err(|_| CastError::new(raw, "complex"))
    }

    /// Lossy numeric view: NaN when the value has no real interpretation.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Value::String(s) => Value::parse_float(s).unwrap_or(f64::NAN),
            Value::Integer(i) => *i as f64,
            Value::Float(f) => *f,
            Value::Complex(c) if c.im == 0.0 => c.re,
            Value::Complex(_) => f64::NAN,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(x) => f.write_str(&format_significant(*x, FLOAT_DIGITS)),
            Value::Complex(c) => {
                let re = format_significant(c.re, FLOAT_DIGITS);
                let im = format_significant(c.im.abs(), FLOAT_DIGITS);
                let sign = if c.im.is_sign_negative() { '-' } else { '+' };
                write!(f, "{re}{sign}{im}j")
            }
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<Complex64> for Value {
    fn from(value: Complex64) -> Self {
        Value::Complex(value)
    }
}
