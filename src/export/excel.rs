#![cfg(feature = "excel")]

//! `.xlsx` rendering of result tables.

use rust_xlsxwriter::{Workbook, XlsxError};

use crate::records::ReportRow;
use crate::types::Value;

/// Render `rows` into a single-sheet workbook, header in the first row.
pub fn render_xlsx<T: ReportRow>(rows: &[T], sheet_name: &str) -> Result<Vec<u8>, String> {
    build_workbook(rows, sheet_name).map_err(|e| e.to_string())
}

fn build_workbook<T: ReportRow>(rows: &[T], sheet_name: &str) -> Result<Vec<u8>, XlsxError> {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.set_name(sheet_name)?;

    for (col, header) in T::HEADERS.iter().enumerate() {
        ws.write_string(0, col as u16, *header)?;
    }

    for (idx0, row) in rows.iter().enumerate() {
        let r = (idx0 + 1) as u32;
        for (col, cell) in row.cells().iter().enumerate() {
            let c = col as u16;
            match cell {
                Value::Null => {}
                Value::Int64(v) => {
                    ws.write_number(r, c, *v as f64)?;
                }
                Value::Float64(v) => {
                    ws.write_number(r, c, *v)?;
                }
                Value::Utf8(s) => {
                    ws.write_string(r, c, s)?;
                }
                Value::Date(_) => {
                    ws.write_string(r, c, cell.to_string())?;
                }
            }
        }
    }

    wb.save_to_buffer()
}
