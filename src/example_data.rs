//! Deterministic demonstration data, used when the real inputs are missing and the caller has
//! opted in to the fallback.
//!
//! Every call returns the same 50 sales rows and 5 inventory rows.

use chrono::NaiveDate;

use crate::ingestion::RawInputs;
use crate::records::{inventory_schema, sales_schema, InventoryRecord, SalesRecord};
use crate::types::{DataSet, Value};

/// Number of generated sales rows.
pub const EXAMPLE_SALES_ROWS: usize = 50;

/// Origin label used in messages for generated tables.
pub const EXAMPLE_ORIGIN: &str = "<example data>";

const FIRST_SALE_DATE: NaiveDate = match NaiveDate::from_ymd_opt(2023, 1, 1) {
    Some(d) => d,
    None => panic!("invalid example epoch"),
};

const CATEGORIES: [&str; 5] = ["Electrónicos", "Hogar", "Ropa", "Alimentos", "Juguetes"];
const UNIT_PRICES: [f64; 5] = [10.5, 15.0, 8.0, 20.0, 12.5];

const INVENTORY: [(&str, u64, &str); 5] = [
    ("Prod_1", 15, "Electrónicos"),
    ("Prod_2", 3, "Hogar"),
    ("Prod_3", 8, "Electrónicos"),
    ("Prod_4", 20, "Ropa"),
    ("Prod_5", 5, "Hogar"),
];

/// The example sales ledger: row `i` sells `Prod_{i % 5 + 1}` in category `i % 5`, quantity
/// `i % 10 + 1` at the `i % 5`-th price, on 2023-01-01 plus `i` days.
pub fn example_sales() -> Vec<SalesRecord> {
    FIRST_SALE_DATE
        .iter_days()
        .take(EXAMPLE_SALES_ROWS)
        .enumerate()
        .map(|(i, date)| SalesRecord {
            date,
            product: format!("Prod_{}", i % 5 + 1),
            quantity: (i % 10 + 1) as u64,
            unit_price: UNIT_PRICES[i % UNIT_PRICES.len()],
            category: CATEGORIES[i % CATEGORIES.len()].to_string(),
        })
        .collect()
}

/// The example inventory snapshot; `Prod_2`, `Prod_5` and `Prod_3` are below the default
/// threshold, `Prod_1` and `Prod_4` are not.
pub fn example_inventory() -> Vec<InventoryRecord> {
    INVENTORY
        .iter()
        .map(|(product, qty, category)| InventoryRecord {
            product: product.to_string(),
            available_quantity: *qty,
            category: Some(category.to_string()),
        })
        .collect()
}

/// The example tables in their raw, pre-validation form, so generated data goes through the
/// same validation stage as loaded data.
pub fn example_inputs() -> RawInputs {
    let sales_rows = example_sales()
        .into_iter()
        .map(|s| {
            vec![
                Value::Date(s.date),
                Value::Utf8(s.product),
                Value::Int64(s.quantity as i64),
                Value::Float64(s.unit_price),
                Value::Utf8(s.category),
            ]
        })
        .collect();

    let inventory_rows = example_inventory()
        .into_iter()
        .map(|item| {
            vec![
                Value::Utf8(item.product),
                Value::Int64(item.available_quantity as i64),
                item.category.map(Value::Utf8).unwrap_or(Value::Null),
            ]
        })
        .collect();

    RawInputs {
        sales: DataSet::new(sales_schema(), sales_rows),
        inventory: DataSet::new(inventory_schema(), inventory_rows),
        sales_origin: EXAMPLE_ORIGIN.to_string(),
        inventory_origin: EXAMPLE_ORIGIN.to_string(),
    }
}
