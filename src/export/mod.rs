//! Writing the two result tables to a results directory.
//!
//! [`export_results`] is all-or-nothing: both artifacts are rendered in memory first, written
//! to hidden staging files next to their targets, and only then renamed into place. If any
//! step fails, files written by the call are removed again, artifacts of an earlier run are
//! put back, and an [`AnalysisError::Export`] is returned.
//!
//! [`read_category_summary`] and [`read_low_inventory`] re-open exported artifacts through the
//! ingestion layer.

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod json;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AnalysisError, AnalysisResult, TableKind};
use crate::ingestion::{load_table, IngestionFormat, IngestionOptions};
use crate::records::{category_summary_schema, inventory_schema, CategorySummary, InventoryRecord, ReportRow};
use crate::validation::{check_required_columns, decode_category_summary, decode_inventory_rows, INVENTORY_REQUIRED_COLUMNS};

/// File stem of the category summary artifact.
pub const SUMMARY_FILE_STEM: &str = "resumen_ventas";

/// File stem of the low-inventory artifact.
pub const LOW_INVENTORY_FILE_STEM: &str = "inventario_bajo";

/// Default results directory.
pub const DEFAULT_OUTPUT_DIR: &str = "resultados";

/// On-disk format of an exported artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    /// Pretty-printed array of objects.
    Json,
    /// Single-sheet `.xlsx` workbook (requires the Cargo feature `excel`).
    Excel,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Excel => "xlsx",
        }
    }

    /// The ingestion format that re-opens an artifact written in this format.
    pub fn ingestion_format(self) -> IngestionFormat {
        match self {
            ExportFormat::Csv => IngestionFormat::Csv,
            ExportFormat::Json => IngestionFormat::Json,
            ExportFormat::Excel => IngestionFormat::Excel,
        }
    }
}

/// Options controlling [`export_results`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExportOptions {
    pub summary_format: ExportFormat,
    pub low_inventory_format: ExportFormat,
}

/// Paths of the artifacts written by a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedArtifacts {
    pub summary: PathBuf,
    pub low_inventory: PathBuf,
}

/// Write the category summary and the low-inventory report under `output_dir`.
///
/// The directory is created if absent (an existing directory is not an error). Existing
/// artifacts with the same names are replaced as a pair: they are moved aside while the new
/// files are committed and put back if the commit fails.
pub fn export_results(
    summary: &[CategorySummary],
    low_inventory: &[InventoryRecord],
    output_dir: impl AsRef<Path>,
    options: &ExportOptions,
) -> AnalysisResult<ExportedArtifacts> {
    let dir = output_dir.as_ref();
    let artifacts = ExportedArtifacts {
        summary: dir.join(format!("{SUMMARY_FILE_STEM}.{}", options.summary_format.extension())),
        low_inventory: dir.join(format!(
            "{LOW_INVENTORY_FILE_STEM}.{}",
            options.low_inventory_format.extension()
        )),
    };

    let rendered = [
        (
            artifacts.summary.as_path(),
            render(summary, options.summary_format, "resumen")
                .map_err(|message| export_error(&artifacts.summary, message))?,
        ),
        (
            artifacts.low_inventory.as_path(),
            render(low_inventory, options.low_inventory_format, "inventario_bajo")
                .map_err(|message| export_error(&artifacts.low_inventory, message))?,
        ),
    ];

    fs::create_dir_all(dir).map_err(|e| export_error(dir, e.to_string()))?;

    let mut staged: Vec<(PathBuf, &Path)> = Vec::with_capacity(rendered.len());
    for (target, bytes) in &rendered {
        let staging = staging_path(target);
        if let Err(e) = fs::write(&staging, bytes) {
            let _ = fs::remove_file(&staging);
            remove_all(staged.iter().map(|(s, _)| s.as_path()));
            return Err(export_error(target, e.to_string()));
        }
        staged.push((staging, *target));
    }

    // Artifacts of an earlier run are set aside, not overwritten, until both new files are in place.
    let mut set_aside: Vec<(PathBuf, &Path)> = Vec::new();
    for (_, target) in &staged {
        if !target.exists() {
            continue;
        }
        let backup = backup_path(target);
        if let Err(e) = fs::rename(target, &backup) {
            restore_all(&set_aside);
            remove_all(staged.iter().map(|(s, _)| s.as_path()));
            return Err(export_error(target, e.to_string()));
        }
        set_aside.push((backup, *target));
    }

    let mut committed: Vec<&Path> = Vec::with_capacity(staged.len());
    for (idx, (staging, target)) in staged.iter().enumerate() {
        if let Err(e) = fs::rename(staging, target) {
            remove_all(committed.iter().copied());
            remove_all(staged[idx..].iter().map(|(s, _)| s.as_path()));
            restore_all(&set_aside);
            return Err(export_error(target, e.to_string()));
        }
        committed.push(target);
    }

    remove_all(set_aside.iter().map(|(b, _)| b.as_path()));
    Ok(artifacts)
}

/// Re-open an exported category summary.
///
/// A table without rows reads back as empty regardless of which columns the file declares.
pub fn read_category_summary(path: impl AsRef<Path>, format: ExportFormat) -> AnalysisResult<Vec<CategorySummary>> {
    let path = path.as_ref();
    let ds = load_table(
        path,
        TableKind::CategorySummary,
        &category_summary_schema(),
        &reader_options(format),
    )?;
    if ds.row_count() == 0 {
        return Ok(Vec::new());
    }
    decode_category_summary(&ds, &path.display().to_string())
}

/// Re-open an exported low-inventory report.
pub fn read_low_inventory(path: impl AsRef<Path>, format: ExportFormat) -> AnalysisResult<Vec<InventoryRecord>> {
    let path = path.as_ref();
    let ds = load_table(path, TableKind::LowInventory, &inventory_schema(), &reader_options(format))?;
    if ds.row_count() == 0 {
        return Ok(Vec::new());
    }
    check_required_columns(&ds, INVENTORY_REQUIRED_COLUMNS, TableKind::LowInventory)?;
    decode_inventory_rows(&ds, TableKind::LowInventory, &path.display().to_string())
}

fn reader_options(format: ExportFormat) -> IngestionOptions {
    IngestionOptions {
        format: Some(format.ingestion_format()),
        ..Default::default()
    }
}

fn render<T: ReportRow>(rows: &[T], format: ExportFormat, sheet_name: &str) -> Result<Vec<u8>, String> {
    match format {
        ExportFormat::Csv => csv::render_csv(rows),
        ExportFormat::Json => json::render_json(rows),
        ExportFormat::Excel => render_excel_dispatch(rows, sheet_name),
    }
}

fn render_excel_dispatch<T: ReportRow>(rows: &[T], sheet_name: &str) -> Result<Vec<u8>, String> {
    #[cfg(feature = "excel")]
    {
        excel::render_xlsx(rows, sheet_name)
    }

    #[cfg(not(feature = "excel"))]
    {
        let _ = (rows, sheet_name);
        Err("excel export not enabled (enable cargo feature 'excel')".to_string())
    }
}

fn staging_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{name}.partial"))
}

fn backup_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{name}.previous"))
}

fn restore_all(set_aside: &[(PathBuf, &Path)]) {
    for (backup, target) in set_aside {
        let _ = fs::rename(backup, target);
    }
}

fn remove_all<'a>(paths: impl Iterator<Item = &'a Path>) {
    for p in paths {
        let _ = fs::remove_file(p);
    }
}

fn export_error(path: &Path, message: String) -> AnalysisError {
    AnalysisError::Export {
        path: path.to_path_buf(),
        message,
    }
}
