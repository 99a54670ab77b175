//! In-memory analysis stages over typed records.
//!
//! - [`add_line_revenue()`]: derive `line_revenue` per sale
//! - [`summarize_by_category()`]: group by category with totals, counts and revenue share
//! - [`low_inventory()`]: items below a stock threshold
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use sales_inventory_analysis::processing::{add_line_revenue, summarize_by_category};
//! use sales_inventory_analysis::records::SalesRecord;
//!
//! let day = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
//! let sale = |qty, price, cat: &str| SalesRecord {
//!     date: day,
//!     product: "Prod_1".to_string(),
//!     quantity: qty,
//!     unit_price: price,
//!     category: cat.to_string(),
//! };
//!
//! let lines = add_line_revenue(&[sale(2, 10.0, "Electronics"), sale(1, 5.0, "Home")]);
//! let summary = summarize_by_category(&lines).unwrap();
//! assert_eq!(summary[0].category, "Electronics");
//! assert_eq!(summary[0].total_revenue, 20.0);
//! assert!((summary[1].revenue_share_pct - 20.0).abs() < 1e-9);
//! ```

pub mod aggregate;
pub mod inventory;
pub mod transform;

pub use aggregate::summarize_by_category;
pub use inventory::{low_inventory, DEFAULT_LOW_INVENTORY_THRESHOLD};
pub use transform::add_line_revenue;
