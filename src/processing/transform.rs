//! Derived columns for the sales table.

use crate::records::{RevenueLine, SalesRecord};

/// Returns a new table with `line_revenue = quantity * unit_price` for every sale.
///
/// The product is computed in `f64` with no rounding; the input is left untouched.
pub fn add_line_revenue(sales: &[SalesRecord]) -> Vec<RevenueLine> {
    sales
        .iter()
        .map(|sale| RevenueLine {
            line_revenue: sale.quantity as f64 * sale.unit_price,
            sale: sale.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sale(quantity: u64, unit_price: f64) -> SalesRecord {
        SalesRecord {
            date: NaiveDate::from_ymd_opt(2023, 3, 1).unwrap(),
            product: "Prod_1".to_string(),
            quantity,
            unit_price,
            category: "Hogar".to_string(),
        }
    }

    #[test]
    fn revenue_is_quantity_times_price() {
        let sales = vec![sale(3, 12.5), sale(0, 99.0), sale(7, 0.1)];
        let lines = add_line_revenue(&sales);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].line_revenue, 37.5);
        assert_eq!(lines[1].line_revenue, 0.0);
        // No rounding: the raw f64 product is kept.
        assert_eq!(lines[2].line_revenue, 7.0 * 0.1);
        assert_eq!(lines[0].sale, sales[0]);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(add_line_revenue(&[]).is_empty());
    }
}
