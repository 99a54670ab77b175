//! `sales-inventory-analysis` turns a sales ledger and an inventory snapshot into a per-category
//! sales summary and a low-inventory report, written as files.
//!
//! The primary entrypoint is [`pipeline::run_analysis`] (or [`pipeline::run_pipeline`] for full
//! control via [`pipeline::PipelineOptions`]).
//!
//! ## Inputs
//!
//! **Sales** columns: `fecha`, `producto`, `cantidad`, `precio_unitario`, `categoria`.
//! **Inventory** columns: `producto`, `cantidad_disponible` and optionally `categoria`.
//!
//! Inputs are read by extension (or a forced [`ingestion::IngestionFormat`]):
//!
//! - **CSV**: `.csv`
//! - **JSON**: `.json` (array-of-objects or single object) and `.ndjson`
//! - **Parquet**: `.parquet`, `.pq`
//! - **Excel/workbooks** (requires the Cargo feature `excel`): `.xlsx`, `.xls`, `.xlsm`, `.xlsb`, `.ods`
//!
//! Extra columns are ignored and columns may appear in any order. Dates accept `YYYY-MM-DD`
//! (optionally with a time), `DD/MM/YYYY`, `YYYY/MM/DD`, spreadsheet date cells and Parquet `DATE`.
//!
//! When an input file is missing and the caller allows it, the run continues on deterministic
//! generated data from [`example_data`].
//!
//! ## Outputs
//!
//! Under the results directory (default `resultados/`):
//!
//! - `resumen_ventas.<ext>`: `categoria, ingreso_total, num_ventas, porcentaje`, by revenue descending
//! - `inventario_bajo.<ext>`: `producto, cantidad_disponible, categoria`, by quantity ascending
//!
//! CSV by default; JSON or `.xlsx` via [`export::ExportOptions`].
//!
//! ## Quick example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use sales_inventory_analysis::ingestion::{IngestionSeverity, StdErrObserver};
//! use sales_inventory_analysis::pipeline::{run_pipeline, PipelineOptions, StdErrPipelineObserver};
//!
//! let opts = PipelineOptions {
//!     sales_path: "data/ventas.csv".into(),
//!     inventory_path: "data/inventario.csv".into(),
//!     allow_example_fallback: true,
//!     observer: Some(Arc::new(StdErrPipelineObserver)),
//!     ..Default::default()
//! }
//! .with_ingestion_observer(Arc::new(StdErrObserver), IngestionSeverity::Critical);
//!
//! match run_pipeline(&opts) {
//!     Ok(out) => println!("wrote {}", out.artifacts.summary.display()),
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```
//!
//! ## Modules
//!
//! - [`pipeline`]: orchestration, state machine, observers, run preconditions
//! - [`ingestion`]: format readers, unified entrypoint, ingestion observers
//! - [`validation`]: required-column checks and decoding into [`records`]
//! - [`processing`]: line revenue, category aggregation, low-inventory filter
//! - [`export`]: all-or-nothing writing of result tables
//! - [`example_data`]: deterministic fallback data
//! - [`types`]: schema + in-memory dataset types at the file boundary
//! - [`error`]: error types

pub mod error;
pub mod example_data;
pub mod export;
pub mod ingestion;
pub mod pipeline;
pub mod processing;
pub mod records;
pub mod types;
pub mod validation;

pub use error::{AnalysisError, AnalysisResult, IngestionError, IngestionResult, TableKind};
pub use pipeline::{run_analysis, run_pipeline, PipelineError, PipelineOptions, PipelineOutput};
pub use records::{CategorySummary, InventoryRecord, SalesRecord};
