//! Loading of the two pipeline inputs.
//!
//! A locator that does not resolve to an existing file is reported as
//! [`AnalysisError::SourceNotFound`] so the orchestrator can decide whether to fall back to
//! generated data; every other read failure is an [`AnalysisError::Load`].

use std::path::Path;

use crate::error::{AnalysisError, AnalysisResult, TableKind};
use crate::records::{inventory_schema, sales_schema};
use crate::types::{DataSet, Schema};

use super::unified::{ingest_from_path, IngestionOptions};

/// The raw sales and inventory tables of one run, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawInputs {
    pub sales: DataSet,
    pub inventory: DataSet,
    /// Human-readable origin of each table, used in error messages.
    pub sales_origin: String,
    pub inventory_origin: String,
}

/// Load the sales table, then the inventory table.
///
/// Sales dates are parsed into calendar dates here; an unparseable date fails the load.
pub fn load_inputs(
    sales_path: &Path,
    inventory_path: &Path,
    sales_options: &IngestionOptions,
    inventory_options: &IngestionOptions,
) -> AnalysisResult<RawInputs> {
    let sales = load_table(sales_path, TableKind::Sales, &sales_schema(), sales_options)?;
    let inventory = load_table(
        inventory_path,
        TableKind::Inventory,
        &inventory_schema(),
        inventory_options,
    )?;

    Ok(RawInputs {
        sales,
        inventory,
        sales_origin: sales_path.display().to_string(),
        inventory_origin: inventory_path.display().to_string(),
    })
}

/// Load one table from `path`, projected onto `schema`.
pub fn load_table(
    path: &Path,
    table: TableKind,
    schema: &Schema,
    options: &IngestionOptions,
) -> AnalysisResult<DataSet> {
    if !path.is_file() {
        return Err(AnalysisError::SourceNotFound {
            table,
            path: path.to_path_buf(),
        });
    }

    ingest_from_path(path, schema, options).map_err(|source| {
        if source.is_not_found() {
            // Removed between the existence check and the read.
            AnalysisError::SourceNotFound {
                table,
                path: path.to_path_buf(),
            }
        } else {
            AnalysisError::Load {
                table,
                origin: path.display().to_string(),
                source,
            }
        }
    })
}
