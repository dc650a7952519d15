//! # Simtab Store
//!
//! Turns a directory of parameter-named result files into an ordered
//! [`Registry`] of [`Entry`] values.
//!
//! ## Pipeline
//!
//! ```text
//! results/ ──> FileScanner ──> Entry::open ──┬─> Registry (discovery order)
//!              (sorted walk)   (decode name) └─> LoadReport.failures
//!                    │                              ▲
//!                    └──── unreadable paths ────────┘
//! ```
//!
//! Entries decode their name eagerly and read their table on first access.
//!
//! ## Example
//!
//! ```no_run
//! use simtab_store::{Registry, SimtabConfig};
//! use std::path::Path;
//!
//! let mut registry = Registry::new(SimtabConfig::default());
//! let report = registry.load_from_folder(Path::new("results"))?;
//! for failure in &report.failures {
//!     eprintln!("skipped {}: {}", failure.path.display(), failure.reason);
//! }
//! # Ok::<(), simtab_store::StoreError>(())
//! ```

mod config;
mod entry;
mod error;
mod registry;
mod report;
mod scanner;

pub use config::{SimtabConfig, CONFIG_FILE_NAME};
pub use entry::{Entry, EntrySummary};
pub use error::{Result, StoreError};
pub use registry::Registry;
pub use report::{LoadFailure, LoadReport};
pub use scanner::{FileScanner, ScanError, ScanOutcome};
