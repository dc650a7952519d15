//! # Simtab Table
//!
//! Plain delimited result files: the first row names the columns, every
//! following row holds one value per column.
//!
//! ```text
//! file ──> read_table ──> Table ──┬─> column("energy") / get("2 * t", Float)
//!                                 ├─> extract_scalars(pairs)  {name -> value}
//!                                 └─> write_table ──> file
//! ```
//!
//! Column names are unique inside a [`Table`]; a name that is already taken
//! gets `_b` appended until it is free.

mod error;
mod reader;
mod scalar;
mod table;
mod writer;

pub use error::{Result, TableError};
pub use reader::{read_table, split_record};
pub use scalar::{extract_scalars, ColumnPair};
pub use table::{Table, COLLISION_SUFFIX};
pub use writer::{write, write_table, Orientation};
