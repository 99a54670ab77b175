//! JSON ingestion implementation.
//!
//! Supported inputs:
//! - A JSON array of objects: `[{"producto":"Prod_1"}, {"producto":"Prod_2"}]`
//! - A single JSON object (one row)
//! - Newline-delimited JSON (NDJSON): `{"producto":"Prod_1"}\n{"producto":"Prod_2"}\n`
//!
//! A schema field counts as present when at least one object carries the key; objects that
//! lack a present key contribute [`Value::Null`] for it.

use std::fs;
use std::path::Path;

use serde_json::Map;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataSet, DataType, Schema, Value};

use super::dates::parse_date;

type JsonObject = Map<String, serde_json::Value>;

/// Ingest a JSON or NDJSON file into an in-memory [`DataSet`].
pub fn ingest_json_from_path(path: impl AsRef<Path>, schema: &Schema) -> IngestionResult<DataSet> {
    let text = fs::read_to_string(path)?;
    ingest_json_from_str(&text, schema)
}

/// Ingest JSON from an in-memory string into a [`DataSet`].
pub fn ingest_json_from_str(input: &str, schema: &Schema) -> IngestionResult<DataSet> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(DataSet::new(schema.project(|_| false), Vec::new()));
    }

    let values = match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::Array(items)) => items,
        Ok(v @ serde_json::Value::Object(_)) => vec![v],
        Ok(_) => {
            return Err(IngestionError::SchemaMismatch {
                message: "json must be an object, an array of objects, or NDJSON".to_string(),
            });
        }
        Err(_) => parse_ndjson(trimmed)?,
    };

    let objects = values
        .iter()
        .enumerate()
        .map(|(idx0, v)| {
            v.as_object().ok_or_else(|| IngestionError::SchemaMismatch {
                message: format!("row {} is not a json object", idx0 + 1),
            })
        })
        .collect::<IngestionResult<Vec<&JsonObject>>>()?;

    ingest_json_objects(&objects, schema)
}

fn parse_ndjson(input: &str) -> IngestionResult<Vec<serde_json::Value>> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| serde_json::from_str::<serde_json::Value>(line).map_err(IngestionError::from))
        .collect()
}

fn ingest_json_objects(objects: &[&JsonObject], schema: &Schema) -> IngestionResult<DataSet> {
    let projected = schema.project(|f| objects.iter().any(|o| o.contains_key(&f.name)));

    let mut rows: Vec<Vec<Value>> = Vec::with_capacity(objects.len());
    for (idx0, obj) in objects.iter().enumerate() {
        let row_num = idx0 + 1;
        let mut row: Vec<Value> = Vec::with_capacity(projected.fields.len());
        for field in &projected.fields {
            let value = match obj.get(&field.name) {
                Some(jv) => convert_json_value(row_num, &field.name, field.data_type, jv)?,
                None => Value::Null,
            };
            row.push(value);
        }
        rows.push(row);
    }

    Ok(DataSet::new(projected, rows))
}

fn convert_json_value(
    row: usize,
    column: &str,
    data_type: DataType,
    v: &serde_json::Value,
) -> IngestionResult<Value> {
    if v.is_null() {
        return Ok(Value::Null);
    }

    let parse_err = |message: &str| IngestionError::ParseError {
        row,
        column: column.to_string(),
        raw: v.to_string(),
        message: message.to_string(),
    };

    match data_type {
        DataType::Utf8 => match v {
            serde_json::Value::String(s) => Ok(Value::Utf8(s.clone())),
            serde_json::Value::Number(n) => Ok(Value::Utf8(n.to_string())),
            _ => Err(parse_err("expected string")),
        },
        DataType::Int64 => {
            if let Some(n) = v.as_i64() {
                Ok(Value::Int64(n))
            } else if v.as_u64().is_some() {
                Err(parse_err("u64 out of range for i64"))
            } else {
                match v.as_f64() {
                    Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(Value::Int64(f as i64)),
                    _ => Err(parse_err("expected integer number")),
                }
            }
        }
        DataType::Float64 => v
            .as_f64()
            .map(Value::Float64)
            .ok_or_else(|| parse_err("expected number")),
        DataType::Date => match v.as_str() {
            Some(s) => parse_date(s).map(Value::Date).map_err(|m| parse_err(&m)),
            None => Err(parse_err("expected date string")),
        },
    }
}
