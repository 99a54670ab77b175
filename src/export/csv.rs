//! CSV rendering of result tables.

use crate::records::ReportRow;

/// Render `rows` as CSV, header first.
///
/// The header is written explicitly so an empty table still re-opens with its columns.
/// Floats use the shortest representation that parses back to the same value.
pub fn render_csv<T: ReportRow>(rows: &[T]) -> Result<Vec<u8>, String> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    wtr.write_record(T::HEADERS).map_err(|e| e.to_string())?;
    for row in rows {
        wtr.serialize(row).map_err(|e| e.to_string())?;
    }
    wtr.into_inner().map_err(|e| e.to_string())
}
