//! Schema validation and decoding of loaded tables into typed records.
//!
//! Column presence is checked first and reported as [`AnalysisError::Schema`] naming every
//! missing column. Only then are rows decoded; a malformed cell (missing value, negative
//! quantity, negative price) is reported as [`AnalysisError::Load`].

use chrono::NaiveDate;

use crate::error::{AnalysisError, AnalysisResult, IngestionError, TableKind};
use crate::records::columns::{
    AVAILABLE_QUANTITY, CATEGORY, DATE, PRODUCT, QUANTITY, REVENUE_SHARE, SALE_COUNT, TOTAL_REVENUE,
    UNIT_PRICE,
};
use crate::records::{CategorySummary, InventoryRecord, SalesRecord};
use crate::types::{DataSet, Value};

/// Columns every sales table must carry.
pub const SALES_REQUIRED_COLUMNS: &[&str] = &[DATE, PRODUCT, QUANTITY, UNIT_PRICE, CATEGORY];

/// Columns every inventory table must carry; `categoria` is optional.
pub const INVENTORY_REQUIRED_COLUMNS: &[&str] = &[PRODUCT, AVAILABLE_QUANTITY];

const SUMMARY_REQUIRED_COLUMNS: &[&str] = &[CATEGORY, TOTAL_REVENUE, SALE_COUNT, REVENUE_SHARE];

/// Fail with [`AnalysisError::Schema`] if any of `required` is absent from `dataset`.
pub fn check_required_columns(dataset: &DataSet, required: &[&str], table: TableKind) -> AnalysisResult<()> {
    let missing: Vec<String> = required
        .iter()
        .filter(|c| !dataset.has_column(c))
        .map(|c| c.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AnalysisError::Schema { table, missing })
    }
}

/// Validate a sales table and decode it into [`SalesRecord`]s.
///
/// `origin` names the source in error messages.
pub fn validate_sales(dataset: &DataSet, origin: &str) -> AnalysisResult<Vec<SalesRecord>> {
    check_required_columns(dataset, SALES_REQUIRED_COLUMNS, TableKind::Sales)?;

    let rows = RowDecoder::new(dataset, TableKind::Sales, origin);
    (0..dataset.row_count())
        .map(|i| {
            Ok(SalesRecord {
                date: rows.date(i, DATE)?,
                product: rows.text(i, PRODUCT)?,
                quantity: rows.count(i, QUANTITY)?,
                unit_price: rows.amount(i, UNIT_PRICE)?,
                category: rows.text(i, CATEGORY)?,
            })
        })
        .collect()
}

/// Validate an inventory table and decode it into [`InventoryRecord`]s.
pub fn validate_inventory(dataset: &DataSet, origin: &str) -> AnalysisResult<Vec<InventoryRecord>> {
    check_required_columns(dataset, INVENTORY_REQUIRED_COLUMNS, TableKind::Inventory)?;
    decode_inventory_rows(dataset, TableKind::Inventory, origin)
}

pub(crate) fn decode_inventory_rows(
    dataset: &DataSet,
    table: TableKind,
    origin: &str,
) -> AnalysisResult<Vec<InventoryRecord>> {
    let rows = RowDecoder::new(dataset, table, origin);
    (0..dataset.row_count())
        .map(|i| {
            Ok(InventoryRecord {
                product: rows.text(i, PRODUCT)?,
                available_quantity: rows.count(i, AVAILABLE_QUANTITY)?,
                category: rows.optional_text(i, CATEGORY),
            })
        })
        .collect()
}

/// Decode a re-opened category summary artifact.
pub(crate) fn decode_category_summary(dataset: &DataSet, origin: &str) -> AnalysisResult<Vec<CategorySummary>> {
    check_required_columns(dataset, SUMMARY_REQUIRED_COLUMNS, TableKind::CategorySummary)?;

    let rows = RowDecoder::new(dataset, TableKind::CategorySummary, origin);
    (0..dataset.row_count())
        .map(|i| {
            Ok(CategorySummary {
                category: rows.text(i, CATEGORY)?,
                total_revenue: rows.number(i, TOTAL_REVENUE)?,
                sale_count: rows.count(i, SALE_COUNT)?,
                revenue_share_pct: rows.number(i, REVENUE_SHARE)?,
            })
        })
        .collect()
}

/// Typed cell access over a validated [`DataSet`], producing row-numbered load errors.
struct RowDecoder<'a> {
    dataset: &'a DataSet,
    table: TableKind,
    origin: &'a str,
}

impl<'a> RowDecoder<'a> {
    fn new(dataset: &'a DataSet, table: TableKind, origin: &'a str) -> Self {
        Self { dataset, table, origin }
    }

    fn error(&self, row: usize, column: &str, value: &Value, message: &str) -> AnalysisError {
        AnalysisError::Load {
            table: self.table,
            origin: self.origin.to_string(),
            source: IngestionError::ParseError {
                row: row + 1,
                column: column.to_string(),
                raw: value.to_string(),
                message: message.to_string(),
            },
        }
    }

    fn required(&self, row: usize, column: &str) -> AnalysisResult<&'a Value> {
        match self.dataset.value(row, column) {
            Some(Value::Null) | None => Err(self.error(row, column, &Value::Null, "missing value")),
            Some(v) => Ok(v),
        }
    }

    /// Text cells are trimmed; blank text counts as a missing value in every format.
    fn text(&self, row: usize, column: &str) -> AnalysisResult<String> {
        match self.required(row, column)? {
            Value::Utf8(s) => match s.trim() {
                "" => Err(self.error(row, column, &Value::Utf8(s.clone()), "missing value")),
                t => Ok(t.to_string()),
            },
            other => Err(self.error(row, column, other, "expected text")),
        }
    }

    fn optional_text(&self, row: usize, column: &str) -> Option<String> {
        let text = match self.dataset.value(row, column) {
            Some(Value::Utf8(s)) => s.trim().to_string(),
            Some(Value::Null) | None => return None,
            Some(other) => other.to_string(),
        };
        (!text.is_empty()).then_some(text)
    }

    fn count(&self, row: usize, column: &str) -> AnalysisResult<u64> {
        match self.required(row, column)? {
            Value::Int64(v) => u64::try_from(*v).map_err(|_| {
                self.error(row, column, &Value::Int64(*v), "must be a non-negative integer")
            }),
            other => Err(self.error(row, column, other, "expected integer")),
        }
    }

    fn number(&self, row: usize, column: &str) -> AnalysisResult<f64> {
        match self.required(row, column)? {
            Value::Float64(v) => Ok(*v),
            Value::Int64(v) => Ok(*v as f64),
            other => Err(self.error(row, column, other, "expected number")),
        }
    }

    /// A finite, non-negative number (prices).
    fn amount(&self, row: usize, column: &str) -> AnalysisResult<f64> {
        let v = self.number(row, column)?;
        if v.is_finite() && v >= 0.0 {
            Ok(v)
        } else {
            Err(self.error(row, column, &Value::Float64(v), "must be a finite, non-negative number"))
        }
    }

    fn date(&self, row: usize, column: &str) -> AnalysisResult<NaiveDate> {
        match self.required(row, column)? {
            Value::Date(d) => Ok(*d),
            other => Err(self.error(row, column, other, "expected date")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{inventory_schema, sales_schema};
    use crate::types::{DataType, Field, Schema};

    fn date(d: u32) -> Value {
        Value::Date(NaiveDate::from_ymd_opt(2023, 1, d).unwrap())
    }

    fn text(s: &str) -> Value {
        Value::Utf8(s.to_string())
    }

    fn sales_row(qty: i64, price: Value) -> Vec<Value> {
        vec![date(1), text("Prod_1"), Value::Int64(qty), price, text("Hogar")]
    }

    #[test]
    fn decodes_valid_sales_rows() {
        let ds = DataSet::new(
            sales_schema(),
            vec![sales_row(2, Value::Float64(10.0)), sales_row(1, Value::Int64(5))],
        );
        let records = validate_sales(&ds, "test").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].quantity, 2);
        assert_eq!(records[0].unit_price, 10.0);
        assert_eq!(records[1].unit_price, 5.0);
        assert_eq!(records[1].category, "Hogar");
    }

    #[test]
    fn names_every_missing_column() {
        let schema = Schema::new(vec![
            Field::new(PRODUCT, DataType::Utf8),
            Field::new(QUANTITY, DataType::Int64),
        ]);
        let ds = DataSet::new(schema, vec![]);
        match validate_sales(&ds, "test").unwrap_err() {
            AnalysisError::Schema { table, missing } => {
                assert_eq!(table, TableKind::Sales);
                assert_eq!(missing, vec![DATE, UNIT_PRICE, CATEGORY]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn negative_quantity_is_a_load_error() {
        let ds = DataSet::new(sales_schema(), vec![sales_row(-1, Value::Float64(1.0))]);
        let err = validate_sales(&ds, "ventas.csv").unwrap_err();
        assert!(matches!(err, AnalysisError::Load { table: TableKind::Sales, .. }));
        assert!(err.to_string().contains("ventas.csv"));
    }

    #[test]
    fn negative_price_is_a_load_error() {
        let ds = DataSet::new(sales_schema(), vec![sales_row(1, Value::Float64(-0.5))]);
        assert!(matches!(
            validate_sales(&ds, "t").unwrap_err(),
            AnalysisError::Load { .. }
        ));
    }

    #[test]
    fn null_in_required_cell_reports_row_and_column() {
        let mut row = sales_row(1, Value::Float64(1.0));
        row[4] = Value::Null;
        let ds = DataSet::new(sales_schema(), vec![sales_row(1, Value::Float64(1.0)), row]);
        match validate_sales(&ds, "t").unwrap_err() {
            AnalysisError::Load {
                source: IngestionError::ParseError { row, column, message, .. },
                ..
            } => {
                assert_eq!(row, 2);
                assert_eq!(column, CATEGORY);
                assert_eq!(message, "missing value");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn text_cells_are_trimmed_and_blank_text_is_missing() {
        let mut padded = sales_row(1, Value::Float64(1.0));
        padded[4] = text("  Hogar ");
        let records = validate_sales(&DataSet::new(sales_schema(), vec![padded]), "t").unwrap();
        assert_eq!(records[0].category, "Hogar");

        let mut blank = sales_row(1, Value::Float64(1.0));
        blank[4] = text("  ");
        match validate_sales(&DataSet::new(sales_schema(), vec![blank]), "t").unwrap_err() {
            AnalysisError::Load {
                source: IngestionError::ParseError { column, message, .. },
                ..
            } => {
                assert_eq!(column, CATEGORY);
                assert_eq!(message, "missing value");
            }
            other => panic!("unexpected error: {other}"),
        }

        let ds = DataSet::new(
            inventory_schema(),
            vec![
                vec![text(" Prod_1"), Value::Int64(4), text("")],
                vec![text("Prod_2"), Value::Int64(9), text(" Ropa ")],
            ],
        );
        let items = validate_inventory(&ds, "t").unwrap();
        assert_eq!(items[0].product, "Prod_1");
        assert_eq!(items[0].category, None);
        assert_eq!(items[1].category.as_deref(), Some("Ropa"));
    }

    #[test]
    fn inventory_category_is_optional() {
        let schema = Schema::new(vec![
            Field::new(PRODUCT, DataType::Utf8),
            Field::new(AVAILABLE_QUANTITY, DataType::Int64),
        ]);
        let ds = DataSet::new(schema, vec![vec![text("Prod_1"), Value::Int64(4)]]);
        let items = validate_inventory(&ds, "t").unwrap();
        assert_eq!(
            items,
            vec![InventoryRecord {
                product: "Prod_1".to_string(),
                available_quantity: 4,
                category: None,
            }]
        );
    }

    #[test]
    fn inventory_without_quantity_is_a_schema_error() {
        let schema = inventory_schema().project(|f| f.name != AVAILABLE_QUANTITY);
        let ds = DataSet::new(schema, vec![]);
        match validate_inventory(&ds, "t").unwrap_err() {
            AnalysisError::Schema { table, missing } => {
                assert_eq!(table, TableKind::Inventory);
                assert_eq!(missing, vec![AVAILABLE_QUANTITY]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
