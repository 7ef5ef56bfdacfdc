use crate::domain::model::LineItem;
use crate::utils::error::{EtlError, Result};
use std::collections::{BTreeMap, HashSet};

/// Per-order metrics before pricing: N distinct SKUs and Q total units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderMetrics {
    pub order_id: String,
    pub unique_sku_count: usize,
    pub total_units: u64,
}

/// Groups line items by order id, emitting orders in ascending id order.
/// An order only exists if at least one of its rows survived filtering.
/// Fails when an order's unit count does not fit in `u64`.
pub fn aggregate_orders(items: &[LineItem]) -> Result<Vec<OrderMetrics>> {
    let mut groups: BTreeMap<&str, (HashSet<&str>, u64)> = BTreeMap::new();

    for item in items {
        let (skus, units) = groups.entry(item.order_id.as_str()).or_default();
        skus.insert(item.sku.as_str());
        *units = units
            .checked_add(item.quantity)
            .ok_or_else(|| EtlError::MalformedInput {
                message: format!("order {}: total quantity overflows", item.order_id),
            })?;
    }

    Ok(groups
        .into_iter()
        .map(|(order_id, (skus, units))| OrderMetrics {
            order_id: order_id.to_string(),
            unique_sku_count: skus.len(),
            total_units: units,
        })
        .collect())
}
