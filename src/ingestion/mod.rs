//! Ingestion entrypoints and implementations.
//!
//! The pipeline uses [`load_inputs`] (from [`loader`]), which maps missing files to
//! `SourceNotFound` and everything else to `Load` errors. Underneath, [`ingest_from_path`]
//! (from [`unified`]):
//!
//! - auto-detects format by file extension (or you can override via [`IngestionOptions`])
//! - projects the file onto a requested schema, leaving absent columns out
//! - optionally reports success/failure/alerts to an [`IngestionObserver`]
//!
//! Format-specific functions are also available under:
//! - [`csv`]
//! - [`json`]
//! - [`parquet`]
//! - `excel` (Cargo feature `excel`)

pub mod csv;
pub mod dates;
#[cfg(feature = "excel")]
pub mod excel;
pub mod json;
pub mod loader;
pub mod observability;
pub mod parquet;
pub mod unified;

pub use loader::{load_inputs, load_table, RawInputs};
pub use observability::{
    CompositeObserver, FileObserver, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats,
    StdErrObserver,
};
pub use unified::{ingest_from_path, IngestionFormat, IngestionOptions};
