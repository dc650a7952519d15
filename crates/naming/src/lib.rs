//! # Simtab Naming
//!
//! Result files carry their identity in their name:
//!
//! ```text
//! energy_scan|dt=0.01|lattice=square.csv
//! └────┬────┘ └──┬──┘ └─────┬──────┘
//!   base name  parameter  parameter
//! ```
//!
//! This crate decodes such names into a base name plus a [`ParameterMap`],
//! encodes them back (parameters sorted by key), and provides the tagged
//! scalar [`Value`] used wherever a parameter or a cell must be formatted or
//! cast.
//!
//! ## Example
//!
//! ```rust
//! use simtab_naming::NameCodec;
//!
//! let codec = NameCodec::default();
//! let decoded = codec.decode("run|b=1|a=2.csv").unwrap();
//! assert_eq!(decoded.base_name, "run");
//! assert_eq!(decoded.parameters["a"], "2");
//!
//! let name = codec.file_name(&decoded.base_name, &decoded.parameters);
//! assert_eq!(name, "run|a=2|b=1.csv");
//! ```

mod codec;
mod error;
mod format;
mod value;

pub use codec::{decode, encode, encode_strings, DecodedName, NameCodec, ParameterMap};
pub use error::{CastError, NameError, Result};
pub use format::format_significant;
pub use num_complex::Complex64;
pub use value::{DataType, Value};

/// Separator placed between the base name and each `key=value` token.
pub const DEFAULT_SEPARATOR: &str = "|";

/// Extension of result files, without the leading dot.
pub const DEFAULT_EXTENSION: &str = "csv";
