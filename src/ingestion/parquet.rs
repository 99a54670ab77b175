//! Parquet ingestion implementation.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use parquet::file::reader::{ChunkReader, FileReader};
use parquet::file::serialized_reader::SerializedFileReader;
use parquet::record::Field;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataSet, DataType, Schema, Value};

use super::dates::{date_from_unix_days, parse_date};

/// Ingest a Parquet file into an in-memory `DataSet`.
///
/// Notes:
/// - Schema fields are matched against Parquet leaf columns by column path string; fields
///   without a matching column are left out of the returned dataset's schema
/// - `DATE` columns (days since the Unix epoch) and date strings both map to [`Value::Date`]
/// - Uses the Parquet record API (`RowIter`)
pub fn ingest_parquet_from_path(path: impl AsRef<Path>, schema: &Schema) -> IngestionResult<DataSet> {
    let reader = SerializedFileReader::try_from(path.as_ref())?;

    let available_columns = parquet_leaf_column_paths(&reader);
    let projected = schema.project(|f| available_columns.contains(f.name.as_str()));

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (idx0, row_res) in reader.into_iter().enumerate() {
        let row_num = idx0 + 1;
        let row = row_res?;

        let by_name: HashMap<&str, &Field> = row
            .get_column_iter()
            .map(|(name, field)| (name.as_str(), field))
            .collect();

        let mut out_row: Vec<Value> = Vec::with_capacity(projected.fields.len());
        for f in &projected.fields {
            let value = match by_name.get(f.name.as_str()) {
                Some(field) => convert_parquet_field(row_num, &f.name, f.data_type, field)?,
                None => Value::Null,
            };
            out_row.push(value);
        }
        rows.push(out_row);
    }

    Ok(DataSet::new(projected, rows))
}

fn parquet_leaf_column_paths<R: ChunkReader + 'static>(
    reader: &SerializedFileReader<R>,
) -> HashSet<String> {
    reader
        .metadata()
        .file_metadata()
        .schema_descr()
        .columns()
        .iter()
        .map(|c| c.path().string())
        .collect()
}

fn convert_parquet_field(
    row: usize,
    column: &str,
    data_type: DataType,
    f: &Field,
) -> IngestionResult<Value> {
    if matches!(f, Field::Null) {
        return Ok(Value::Null);
    }

    let parse_err = |message: String| IngestionError::ParseError {
        row,
        column: column.to_string(),
        raw: f.to_string(),
        message,
    };

    match data_type {
        DataType::Utf8 => match f {
            Field::Str(s) => Ok(Value::Utf8(s.clone())),
            _ => Err(parse_err("expected string".to_string())),
        },
        DataType::Int64 => integer_value(f)
            .ok_or_else(|| parse_err("expected integer".to_string()))?
            .map(Value::Int64)
            .map_err(parse_err),
        DataType::Float64 => match f {
            Field::Float(v) => Ok(Value::Float64(f64::from(*v))),
            Field::Double(v) => Ok(Value::Float64(*v)),
            other => match integer_value(other) {
                Some(Ok(i)) => Ok(Value::Float64(i as f64)),
                _ => Err(parse_err("expected number".to_string())),
            },
        },
        DataType::Date => match f {
            Field::Date(days) => date_from_unix_days(*days)
                .map(Value::Date)
                .ok_or_else(|| parse_err("date out of range".to_string())),
            Field::Str(s) => parse_date(s).map(Value::Date).map_err(parse_err),
            _ => Err(parse_err("expected date".to_string())),
        },
    }
}

/// Widen any Parquet integer field to `i64`; `None` for non-integer fields.
fn integer_value(f: &Field) -> Option<Result<i64, String>> {
    let v = match f {
        Field::Byte(v) => i64::from(*v),
        Field::Short(v) => i64::from(*v),
        Field::Int(v) => i64::from(*v),
        Field::Long(v) => *v,
        Field::UByte(v) => i64::from(*v),
        Field::UShort(v) => i64::from(*v),
        Field::UInt(v) => i64::from(*v),
        Field::ULong(v) => {
            return Some(i64::try_from(*v).map_err(|_| "u64 out of range for i64".to_string()));
        }
        _ => return None,
    };
    Some(Ok(v))
}
