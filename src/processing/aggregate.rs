//! Per-category aggregation of revenue lines.

use std::collections::HashMap;

use crate::error::{AnalysisError, AnalysisResult};
use crate::records::{CategorySummary, RevenueLine};

/// Running totals for one category.
#[derive(Debug, Default)]
struct CategoryAcc {
    total_revenue: f64,
    sale_count: u64,
}

/// Group revenue lines by category and compute totals, counts and revenue share.
///
/// Semantics:
///
/// - Categories are partitioned in first-seen order; within a category revenue is summed in
///   input order.
/// - The grand total is the sum of the category totals, in first-seen order.
/// - `revenue_share_pct = total_revenue / grand_total * 100`. When the grand total is zero
///   (no sales, or only zero-revenue sales) every share is `0.0`.
/// - Output is sorted by `total_revenue` descending; the sort is stable, so ties keep
///   first-seen order.
///
/// Fails with [`AnalysisError::Aggregation`] if a line revenue or the grand total is not finite.
pub fn summarize_by_category(lines: &[RevenueLine]) -> AnalysisResult<Vec<CategorySummary>> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, CategoryAcc> = HashMap::new();

    for (idx0, line) in lines.iter().enumerate() {
        if !line.line_revenue.is_finite() {
            return Err(AnalysisError::Aggregation {
                message: format!(
                    "line revenue of sale {} ({}) is not a finite number: {}",
                    idx0 + 1,
                    line.sale.product,
                    line.line_revenue
                ),
            });
        }

        let category = line.sale.category.as_str();
        let acc = groups.entry(category).or_insert_with(|| {
            order.push(category);
            CategoryAcc::default()
        });
        acc.total_revenue += line.line_revenue;
        acc.sale_count += 1;
    }

    let partitions: Vec<(&str, CategoryAcc)> = order
        .into_iter()
        .filter_map(|c| groups.remove(c).map(|acc| (c, acc)))
        .collect();

    let grand_total: f64 = partitions.iter().map(|(_, acc)| acc.total_revenue).sum();
    if !grand_total.is_finite() {
        return Err(AnalysisError::Aggregation {
            message: format!("grand total revenue is not a finite number: {grand_total}"),
        });
    }

    let mut summary: Vec<CategorySummary> = partitions
        .into_iter()
        .map(|(category, acc)| CategorySummary {
            category: category.to_string(),
            revenue_share_pct: revenue_share(acc.total_revenue, grand_total),
            total_revenue: acc.total_revenue,
            sale_count: acc.sale_count,
        })
        .collect();

    summary.sort_by(|a, b| b.total_revenue.total_cmp(&a.total_revenue));
    Ok(summary)
}

fn revenue_share(total: f64, grand_total: f64) -> f64 {
    if grand_total == 0.0 {
        0.0
    } else {
        total / grand_total * 100.0
    }
}
