use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Convenience result type for analysis stages.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Error type returned by the format readers under [`crate::ingestion`].
///
/// This is a single error enum shared across CSV/JSON/Parquet (and optional Excel) ingestion.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "excel")]
    /// Excel ingestion error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// CSV ingestion error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON document could not be parsed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Parquet ingestion error.
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// The input cannot be read as a table at all (no header row, unknown extension, ...).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A value could not be parsed into the required [`crate::types::DataType`].
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    ParseError {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },
}

impl IngestionError {
    /// Whether this error means the source file does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            IngestionError::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            IngestionError::Csv(e) => matches!(
                e.kind(),
                csv::ErrorKind::Io(io) if io.kind() == std::io::ErrorKind::NotFound
            ),
            _ => false,
        }
    }
}

/// Which table an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Sales,
    Inventory,
    /// An exported category summary being read back.
    CategorySummary,
    /// An exported low-inventory report being read back.
    LowInventory,
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableKind::Sales => f.write_str("sales"),
            TableKind::Inventory => f.write_str("inventory"),
            TableKind::CategorySummary => f.write_str("category summary"),
            TableKind::LowInventory => f.write_str("low-inventory"),
        }
    }
}

/// Error taxonomy of the analysis pipeline.
///
/// Every stage fails fast with one of these; the orchestrator pairs it with the stage it came
/// from (see [`crate::pipeline::PipelineError`]).
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// An input locator does not resolve to an existing file.
    #[error("{table} source not found: {}", path.display())]
    SourceNotFound { table: TableKind, path: PathBuf },

    /// The input exists but could not be read or contains malformed rows.
    #[error("failed to load {table} source '{origin}': {source}")]
    Load {
        table: TableKind,
        origin: String,
        #[source]
        source: IngestionError,
    },

    /// Required columns are absent from an input table.
    #[error("{table} table is missing required column(s): {}", missing.join(", "))]
    Schema {
        table: TableKind,
        missing: Vec<String>,
    },

    /// Numeric data reaching aggregation is malformed.
    #[error("aggregation failed: {message}")]
    Aggregation { message: String },

    /// A configuration value violates its contract (e.g. a negative threshold).
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// An output artifact could not be written.
    #[error("failed to export '{}': {message}", path.display())]
    Export { path: PathBuf, message: String },

    /// A caller-supplied precondition refused the run.
    #[error("precondition failed: {message}")]
    PreconditionFailed { message: String },
}
