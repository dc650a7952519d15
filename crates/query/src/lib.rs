//! # Simtab Query
//!
//! Operations over a set of [`Entry`](simtab_store::Entry) values:
//!
//! ```text
//! entries ──> filter(keywords, constraints) ──> subset
//!         ──> compute_unique(context)        ──> unique_parameters per entry
//!         ──> sort_by_distinctiveness        ──> fewest unique parameters first
//!         ──> slice(pivot)                   ──> one derived entry per class
//! ```
//!
//! A slice class holds entries equal in every parameter except the pivot.
//! Its derived table has one row per member: the member's scalar results
//! plus its pivot value.
//!
//! ## Example
//!
//! ```no_run
//! use simtab_query::{compute_unique_within, filter, sort_by_distinctiveness, Label};
//! use simtab_store::{Registry, SimtabConfig};
//! use std::collections::BTreeMap;
//! use std::path::Path;
//!
//! let mut registry = Registry::new(SimtabConfig::default());
//! registry.load_from_folder(Path::new("results"))?;
//!
//! let mut selected = filter(registry.iter_mut(), &["energy"], &BTreeMap::new());
//! compute_unique_within(&mut selected);
//! sort_by_distinctiveness(&mut selected);
//! for entry in &selected {
//!     println!("{}", Label::new(entry));
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod filter;
mod label;
mod loader;
mod slice;
mod sort;
mod unique;

pub use error::{QueryError, Result};
pub use filter::{filter, matches};
pub use label::Label;
pub use loader::{ColumnPairLoader, ScalarResultLoader};
pub use slice::{slice, SliceOptions, Slicer, PIVOT_INFIX};
pub use sort::sort_by_distinctiveness;
pub use unique::{compute_unique, compute_unique_within, ParameterContext};
