//! Low-inventory filtering.

use crate::error::{AnalysisError, AnalysisResult};
use crate::records::InventoryRecord;

/// Default threshold below which a product counts as low on stock.
pub const DEFAULT_LOW_INVENTORY_THRESHOLD: i64 = 10;

/// Returns the items with `available_quantity < threshold`, ascending by quantity.
///
/// The sort is stable, so items with equal quantities keep their input order. An empty result
/// is a valid outcome. A negative threshold fails with [`AnalysisError::InvalidArgument`].
pub fn low_inventory(items: &[InventoryRecord], threshold: i64) -> AnalysisResult<Vec<InventoryRecord>> {
    let threshold = u64::try_from(threshold).map_err(|_| AnalysisError::InvalidArgument {
        message: format!("low-inventory threshold must be >= 0 (got {threshold})"),
    })?;

    let mut low: Vec<InventoryRecord> = items
        .iter()
        .filter(|item| item.available_quantity < threshold)
        .cloned()
        .collect();
    low.sort_by_key(|item| item.available_quantity);
    Ok(low)
}
