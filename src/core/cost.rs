use crate::core::aggregate::OrderMetrics;
use crate::domain::model::{OrderSummary, TariffConfig};

/// Tariff formula: first SKU, each further distinct SKU, then every unit.
pub fn order_cost(tariff: &TariffConfig, unique_sku_count: usize, total_units: u64) -> f64 {
    let mut cost = 0.0;
    if unique_sku_count >= 1 {
        cost += tariff.first_sku_cost;
    }
    if unique_sku_count > 1 {
        cost += (unique_sku_count - 1) as f64 * tariff.next_sku_cost;
    }
    cost + total_units as f64 * tariff.unit_cost
}

pub fn round_currency(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn price_orders(orders: Vec<OrderMetrics>, tariff: &TariffConfig) -> Vec<OrderSummary> {
    orders
        .into_iter()
        .map(|order| {
            let cost = order_cost(tariff, order.unique_sku_count, order.total_units);
            OrderSummary {
                order_id: order.order_id,
                unique_sku_count: order.unique_sku_count,
                total_units: order.total_units,
                cost: round_currency(cost),
            }
        })
        .collect()
}
