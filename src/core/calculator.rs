use crate::adapters::csv_table;
use crate::core::{aggregate, cost, filters::FilterPipeline, problems, rows, summary, validator};
use crate::domain::model::{CalculationParams, CostReport, Table};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use std::path::Path;

/// Runs validation, filtering, grouping, pricing and summarising over one
/// table. Pure: the same table and params always produce the same report.
pub fn calculate(table: &Table, params: &CalculationParams) -> Result<CostReport> {
    params.validate()?;
    let table = validator::validate_columns(table, &params.required_columns())?;

    let items = rows::read_line_items(table, &params.columns)?;
    let validated_rows = items.len();
    let problem_rows = problems::find_problem_rows(table, &params.columns, &params.filters);

    let filtered = FilterPipeline::from_options(&params.filters).apply(items);
    tracing::debug!(
        "{} of {} line items survived filtering",
        filtered.len(),
        validated_rows
    );

    if filtered.is_empty() {
        tracing::info!("No line items left after filtering");
        let mut report = summary::empty_report(&params.tariff);
        report.problem_rows = problem_rows;
        return Ok(report);
    }

    let orders = cost::price_orders(aggregate::aggregate_orders(&filtered)?, &params.tariff);
    let mut report = summary::build_report(orders, &filtered, &params.tariff)?;
    report.problem_rows = problem_rows;

    tracing::info!(
        "Priced {} orders, {} units, total cost {:.2}",
        report.totals.processed_orders_count,
        report.totals.total_units,
        report.totals.total_cost
    );
    Ok(report)
}

/// Reads a CSV export from disk and calculates its report.
pub fn calculate_file<P: AsRef<Path>>(path: P, params: &CalculationParams) -> Result<CostReport> {
    // 先驗證配置，避免讀取大型檔案後才失敗
    params.validate()?;
    let table = csv_table::read_table(path)?;
    calculate(&table, params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ExclusionSet, FilterOptions, TariffConfig};
    use crate::utils::error::EtlError;

    fn tariff() -> TariffConfig {
        TariffConfig {
            first_sku_cost: 10.0,
            next_sku_cost: 5.0,
            unit_cost: 2.0,
            exchange_rate: None,
        }
    }

    fn lenient_filters(excluded: &[&str]) -> FilterOptions {
        FilterOptions {
            status_filter: false,
            require_fulfillment_date: false,
            date_range: None,
            exclusions: ExclusionSet::with_defaults(excluded.iter().copied()),
        }
    }

    fn table(rows: &[(&str, &str, &str)]) -> Table {
        Table::new(
            vec![
                "Name".to_string(),
                "Lineitem quantity".to_string(),
                "Lineitem sku".to_string(),
            ],
            rows.iter()
                .map(|(o, q, s)| vec![o.to_string(), q.to_string(), s.to_string()])
                .collect(),
        )
    }

    #[test]
    fn test_worked_example() {
        let t = table(&[("#1", "3", "A"), ("#1", "2", "B"), ("#2", "2", "C")]);
        let params = CalculationParams::new(tariff(), lenient_filters(&[]));

        let report = calculate(&t, &params).unwrap();
        assert_eq!(report.order_summaries[0].cost, 25.0);
        assert_eq!(report.order_summaries[1].cost, 14.0);
        assert_eq!(report.totals.processed_orders_count, 2);
        assert_eq!(report.totals.total_units, 7);
        assert_eq!(report.totals.total_cost, 39.0);
    }

    #[test]
    fn test_fully_excluded_order_disappears() {
        let t = table(&[("#1", "1", "A"), ("#1", "1", "parcel-protection"), ("#2", "4", "GIFT")]);
        let params = CalculationParams::new(tariff(), lenient_filters(&["GIFT"]));

        let report = calculate(&t, &params).unwrap();
        assert_eq!(report.totals.processed_orders_count, 1);
        assert!(report.order_summaries.iter().all(|o| o.order_id != "#2"));
        assert!(report.line_items.iter().all(|i| i.order_id != "#2"));
        assert_eq!(report.order_summaries[0].unique_sku_count, 1);
    }

    #[test]
    fn test_invalid_tariff_fails_before_columns() {
        let t = Table::new(vec!["Unrelated".to_string()], vec![]);
        let mut bad = tariff();
        bad.exchange_rate = Some(0.0);
        let params = CalculationParams::new(bad, lenient_filters(&[]));

        let err = calculate(&t, &params).unwrap_err();
        assert!(matches!(err, EtlError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_status_filter_requires_status_column() {
        let t = table(&[("#1", "1", "A")]);
        let mut filters = lenient_filters(&[]);
        filters.status_filter = true;
        let params = CalculationParams::new(tariff(), filters);

        match calculate(&t, &params).unwrap_err() {
            EtlError::MissingColumn { column } => assert_eq!(column, "Fulfillment Status"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_repeatable() {
        let t = table(&[("#2", "1", "B"), ("#1", "2", "A"), ("#1", "1", "C")]);
        let params = CalculationParams::new(tariff(), lenient_filters(&[]));
        assert_eq!(
            calculate(&t, &params).unwrap(),
            calculate(&t, &params).unwrap()
        );
    }
}
