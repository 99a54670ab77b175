#![cfg(feature = "excel")]

use std::path::Path;

use calamine::{open_workbook_auto, Data, DataType as _, Range, Reader};

use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataSet, DataType, Schema, Value};

use super::csv::parse_typed_value;

/// Ingest one sheet of an Excel document (`.xlsx`, `.xls`, `.ods`, etc.) into a `DataSet`.
///
/// Behavior:
/// - Picks `sheet_name` if provided; otherwise uses the first sheet in the workbook
/// - Detects the first non-empty row as the header row
/// - Schema fields without a matching header are left out of the returned dataset's schema
/// - Reads remaining rows and converts cells into typed `Value`s; date-formatted cells and
///   date strings both map to [`Value::Date`]
pub fn ingest_excel_from_path(
    path: impl AsRef<Path>,
    sheet_name: Option<&str>,
    schema: &Schema,
) -> IngestionResult<DataSet> {
    let mut workbook = open_workbook_auto(path)?;

    let sheet = match sheet_name {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| IngestionError::SchemaMismatch {
                message: "workbook has no sheets".to_string(),
            })?,
    };

    let range = workbook.worksheet_range(&sheet)?;
    ingest_sheet_range(&sheet, &range, schema)
}

fn ingest_sheet_range(sheet: &str, range: &Range<Data>, schema: &Schema) -> IngestionResult<DataSet> {
    let (header_row_idx, headers) = find_header_row(range).ok_or_else(|| IngestionError::SchemaMismatch {
        message: format!("sheet '{sheet}' has no non-empty rows (no header row found)"),
    })?;

    let projected = schema.project(|f| headers.iter().any(|h| *h == f.name));
    let col_idxs: Vec<usize> = projected
        .fields
        .iter()
        .filter_map(|f| headers.iter().position(|h| *h == f.name))
        .collect();

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (idx0, row) in range.rows().enumerate().skip(header_row_idx + 1) {
        // Skip blank spacer rows below the table.
        if row.iter().all(|c| matches!(c, Data::Empty)) {
            continue;
        }

        // Excel-like 1-based row number.
        let user_row = idx0 + 1;

        let mut out_row: Vec<Value> = Vec::with_capacity(projected.fields.len());
        for (field, &col_idx) in projected.fields.iter().zip(col_idxs.iter()) {
            let cell = row.get(col_idx).unwrap_or(&Data::Empty);
            out_row.push(convert_cell(user_row, &field.name, field.data_type, cell)?);
        }
        rows.push(out_row);
    }

    Ok(DataSet::new(projected, rows))
}

fn find_header_row(range: &Range<Data>) -> Option<(usize, Vec<String>)> {
    range
        .rows()
        .enumerate()
        .find(|(_, row)| row.iter().any(|c| !matches!(c, Data::Empty)))
        .map(|(idx0, row)| (idx0, row.iter().map(|c| cell_to_string(c).trim().to_string()).collect()))
}

fn cell_to_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 => (*f as i64).to_string(),
        Data::Empty => String::new(),
        _ => c.to_string(),
    }
}

fn convert_cell(row: usize, column: &str, data_type: DataType, c: &Data) -> IngestionResult<Value> {
    if let Data::String(s) = c {
        return parse_typed_value(row, column, data_type, s);
    }
    if matches!(c, Data::Empty) {
        return Ok(Value::Null);
    }

    let parse_err = |message: &str| IngestionError::ParseError {
        row,
        column: column.to_string(),
        raw: c.to_string(),
        message: message.to_string(),
    };

    match data_type {
        DataType::Utf8 => Ok(Value::Utf8(cell_to_string(c))),
        DataType::Int64 => match c {
            Data::Int(i) => Ok(Value::Int64(*i)),
            Data::Float(f) if f.fract() == 0.0 => Ok(Value::Int64(*f as i64)),
            Data::Float(_) => Err(parse_err("expected integer (got non-integer float)")),
            _ => Err(parse_err("expected integer")),
        },
        DataType::Float64 => match c {
            Data::Float(f) => Ok(Value::Float64(*f)),
            Data::Int(i) => Ok(Value::Float64(*i as f64)),
            _ => Err(parse_err("expected number")),
        },
        DataType::Date => c
            .as_date()
            .map(Value::Date)
            .ok_or_else(|| parse_err("expected date")),
    }
}
