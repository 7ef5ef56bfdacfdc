use crate::core::cost::round_currency;
use crate::domain::model::{CostReport, LineItem, LineItemRow, OrderSummary, TariffConfig, Totals};
use crate::utils::error::{EtlError, Result};

pub fn build_totals(orders: &[OrderSummary], exchange_rate: Option<f64>) -> Result<Totals> {
    let total_units = orders
        .iter()
        .try_fold(0u64, |acc, o| acc.checked_add(o.total_units))
        .ok_or_else(|| EtlError::MalformedInput {
            message: "total quantity across orders overflows".to_string(),
        })?;
    let total_cost = round_currency(orders.iter().map(|o| o.cost).sum());

    Ok(Totals {
        processed_orders_count: orders.len(),
        total_units,
        total_cost,
        total_cost_converted: convert(total_cost, exchange_rate),
    })
}

fn convert(total_cost: f64, exchange_rate: Option<f64>) -> Option<f64> {
    exchange_rate
        .filter(|rate| *rate > 0.0)
        .map(|rate| round_currency(total_cost / rate))
}

pub fn project_line_items(items: &[LineItem]) -> Vec<LineItemRow> {
    items
        .iter()
        .map(|item| LineItemRow {
            order_id: item.order_id.clone(),
            fulfilled_at: item.fulfilled_at,
            sku: item.sku.clone(),
            product_name: item.product_name.clone(),
            quantity: item.quantity,
        })
        .collect()
}

pub fn build_report(
    order_summaries: Vec<OrderSummary>,
    filtered: &[LineItem],
    tariff: &TariffConfig,
) -> Result<CostReport> {
    Ok(CostReport {
        totals: build_totals(&order_summaries, tariff.exchange_rate)?,
        order_summaries,
        line_items: project_line_items(filtered),
        problem_rows: Vec::new(),
    })
}

/// Zero-valued report for runs where filtering removed every row.
pub fn empty_report(tariff: &TariffConfig) -> CostReport {
    CostReport {
        totals: Totals {
            processed_orders_count: 0,
            total_units: 0,
            total_cost: 0.0,
            total_cost_converted: convert(0.0, tariff.exchange_rate),
        },
        order_summaries: Vec::new(),
        line_items: Vec::new(),
        problem_rows: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(order_id: &str, n: usize, q: u64, cost: f64) -> OrderSummary {
        OrderSummary {
            order_id: order_id.to_string(),
            unique_sku_count: n,
            total_units: q,
            cost,
        }
    }

    #[test]
    fn test_totals_fold_orders() {
        let orders = vec![summary("#1", 2, 5, 25.0), summary("#2", 1, 2, 14.0)];
        let totals = build_totals(&orders, Some(1.95583)).unwrap();

        assert_eq!(totals.processed_orders_count, 2);
        assert_eq!(totals.total_units, 7);
        assert_eq!(totals.total_cost, 39.0);
        assert_eq!(totals.total_cost_converted, Some(19.94));
    }

    #[test]
    fn test_no_rate_means_no_conversion() {
        let totals = build_totals(&[summary("#1", 1, 1, 12.0)], None).unwrap();
        assert_eq!(totals.total_cost_converted, None);
    }

    #[test]
    fn test_empty_report_is_zero_valued() {
        let tariff = TariffConfig {
            first_sku_cost: 10.0,
            next_sku_cost: 5.0,
            unit_cost: 2.0,
            exchange_rate: Some(2.0),
        };
        let report = empty_report(&tariff);
        assert_eq!(report.totals.processed_orders_count, 0);
        assert_eq!(report.totals.total_units, 0);
        assert_eq!(report.totals.total_cost, 0.0);
        assert_eq!(report.totals.total_cost_converted, Some(0.0));
        assert!(report.order_summaries.is_empty());
        assert!(report.line_items.is_empty());
    }

    #[test]
    fn test_total_units_overflow_is_reported() {
        let orders = vec![summary("#1", 1, u64::MAX, 10.0), summary("#2", 1, 1, 12.0)];
        let err = build_totals(&orders, None).unwrap_err();
        assert!(matches!(err, EtlError::MalformedInput { .. }));
    }
}
