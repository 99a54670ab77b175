//! Typed records for the sales and inventory tables and the two result tables.
//!
//! Column names are those of the source files and exported artifacts (`fecha`, `producto`,
//! ...); the Rust field names are their English equivalents.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{DataType, Field, Schema, Value};

/// Column names used by the input sources and output artifacts.
pub mod columns {
    pub const DATE: &str = "fecha";
    pub const PRODUCT: &str = "producto";
    pub const QUANTITY: &str = "cantidad";
    pub const UNIT_PRICE: &str = "precio_unitario";
    pub const CATEGORY: &str = "categoria";
    pub const AVAILABLE_QUANTITY: &str = "cantidad_disponible";

    pub const TOTAL_REVENUE: &str = "ingreso_total";
    pub const SALE_COUNT: &str = "num_ventas";
    pub const REVENUE_SHARE: &str = "porcentaje";
}

/// One sale from the sales ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    #[serde(rename = "fecha")]
    pub date: NaiveDate,
    #[serde(rename = "producto")]
    pub product: String,
    #[serde(rename = "cantidad")]
    pub quantity: u64,
    #[serde(rename = "precio_unitario")]
    pub unit_price: f64,
    #[serde(rename = "categoria")]
    pub category: String,
}

/// A sale with its derived revenue (`quantity * unit_price`).
#[derive(Debug, Clone, PartialEq)]
pub struct RevenueLine {
    pub sale: SalesRecord,
    pub line_revenue: f64,
}

/// One row of the inventory snapshot; also the row type of the low-inventory report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    #[serde(rename = "producto")]
    pub product: String,
    #[serde(rename = "cantidad_disponible")]
    pub available_quantity: u64,
    /// Inventory taxonomy; independent of sales categories and optional in the source.
    #[serde(rename = "categoria")]
    pub category: Option<String>,
}

/// Per-category aggregate of the sales ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "ingreso_total")]
    pub total_revenue: f64,
    #[serde(rename = "num_ventas")]
    pub sale_count: u64,
    /// Share of the run's total revenue, in percent (0–100).
    #[serde(rename = "porcentaje")]
    pub revenue_share_pct: f64,
}

/// A record that can be written as one row of a tabular artifact.
pub trait ReportRow: Serialize {
    /// Column headers, in output order.
    const HEADERS: &'static [&'static str];

    /// Cell values in [`Self::HEADERS`] order.
    fn cells(&self) -> Vec<Value>;
}

impl ReportRow for CategorySummary {
    const HEADERS: &'static [&'static str] = &[
        columns::CATEGORY,
        columns::TOTAL_REVENUE,
        columns::SALE_COUNT,
        columns::REVENUE_SHARE,
    ];

    fn cells(&self) -> Vec<Value> {
        vec![
            Value::Utf8(self.category.clone()),
            Value::Float64(self.total_revenue),
            Value::Int64(clamp_to_i64(self.sale_count)),
            Value::Float64(self.revenue_share_pct),
        ]
    }
}

impl ReportRow for InventoryRecord {
    const HEADERS: &'static [&'static str] = &[
        columns::PRODUCT,
        columns::AVAILABLE_QUANTITY,
        columns::CATEGORY,
    ];

    fn cells(&self) -> Vec<Value> {
        vec![
            Value::Utf8(self.product.clone()),
            Value::Int64(clamp_to_i64(self.available_quantity)),
            self.category.clone().map(Value::Utf8).unwrap_or(Value::Null),
        ]
    }
}

fn clamp_to_i64(v: u64) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}

/// Schema of the sales source.
pub fn sales_schema() -> Schema {
    Schema::new(vec![
        Field::new(columns::DATE, DataType::Date),
        Field::new(columns::PRODUCT, DataType::Utf8),
        Field::new(columns::QUANTITY, DataType::Int64),
        Field::new(columns::UNIT_PRICE, DataType::Float64),
        Field::new(columns::CATEGORY, DataType::Utf8),
    ])
}

/// Schema of the inventory source (and of the exported low-inventory report).
pub fn inventory_schema() -> Schema {
    Schema::new(vec![
        Field::new(columns::PRODUCT, DataType::Utf8),
        Field::new(columns::AVAILABLE_QUANTITY, DataType::Int64),
        Field::new(columns::CATEGORY, DataType::Utf8),
    ])
}

/// Schema of the exported category summary.
pub fn category_summary_schema() -> Schema {
    Schema::new(vec![
        Field::new(columns::CATEGORY, DataType::Utf8),
        Field::new(columns::TOTAL_REVENUE, DataType::Float64),
        Field::new(columns::SALE_COUNT, DataType::Int64),
        Field::new(columns::REVENUE_SHARE, DataType::Float64),
    ])
}
