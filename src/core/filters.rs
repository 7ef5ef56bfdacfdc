use crate::domain::model::{DateRange, ExclusionSet, FilterOptions, LineItem, FULFILLED_STATUS};

/// One independent row predicate in the filter pipeline.
pub trait RowFilter: Send + Sync {
    fn name(&self) -> &'static str;
    fn keep(&self, item: &LineItem) -> bool;
}

/// Keeps rows whose status is exactly `fulfilled`.
pub struct StatusFilter;

impl RowFilter for StatusFilter {
    fn name(&self) -> &'static str {
        "status"
    }

    fn keep(&self, item: &LineItem) -> bool {
        item.fulfillment_status.as_deref() == Some(FULFILLED_STATUS)
    }
}

/// Drops rows whose fulfillment timestamp was missing or unparsable.
pub struct FulfillmentDateFilter;

impl RowFilter for FulfillmentDateFilter {
    fn name(&self) -> &'static str {
        "fulfillment_date"
    }

    fn keep(&self, item: &LineItem) -> bool {
        item.fulfilled_at.is_some()
    }
}

pub struct DateRangeFilter {
    range: DateRange,
}

impl DateRangeFilter {
    pub fn new(range: DateRange) -> Self {
        Self { range }
    }
}

impl RowFilter for DateRangeFilter {
    fn name(&self) -> &'static str {
        "date_range"
    }

    fn keep(&self, item: &LineItem) -> bool {
        item.fulfilled_at
            .map(|ts| self.range.contains(ts))
            .unwrap_or(false)
    }
}

pub struct SkuExclusionFilter {
    exclusions: ExclusionSet,
}

impl SkuExclusionFilter {
    pub fn new(exclusions: ExclusionSet) -> Self {
        Self { exclusions }
    }
}

impl RowFilter for SkuExclusionFilter {
    fn name(&self) -> &'static str {
        "sku_exclusion"
    }

    fn keep(&self, item: &LineItem) -> bool {
        !self.exclusions.contains(&item.sku)
    }
}

/// Ordered sequence of row filters. Each stage only sees the rows the
/// previous stage kept, and relative row order is preserved.
pub struct FilterPipeline {
    stages: Vec<Box<dyn RowFilter>>,
}

impl FilterPipeline {
    pub fn new(stages: Vec<Box<dyn RowFilter>>) -> Self {
        Self { stages }
    }

    /// Status → fulfillment date → date range → SKU exclusion.
    pub fn from_options(options: &FilterOptions) -> Self {
        let mut stages: Vec<Box<dyn RowFilter>> = Vec::new();

        if options.status_filter {
            stages.push(Box::new(StatusFilter));
        }
        if options.requires_date_column() {
            stages.push(Box::new(FulfillmentDateFilter));
        }
        if let Some(range) = options.date_range {
            stages.push(Box::new(DateRangeFilter::new(range)));
        }
        stages.push(Box::new(SkuExclusionFilter::new(options.exclusions.clone())));

        Self { stages }
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub fn apply(&self, items: Vec<LineItem>) -> Vec<LineItem> {
        let mut rows = items;

        for stage in &self.stages {
            if rows.is_empty() {
                break;
            }
            let before = rows.len();
            rows.retain(|item| stage.keep(item));
            tracing::debug!(
                "Filter '{}' kept {} of {} rows",
                stage.name(),
                rows.len(),
                before
            );
        }

        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, min, s))
    }

    fn item(order_id: &str, sku: &str, status: &str, fulfilled_at: Option<NaiveDateTime>) -> LineItem {
        LineItem {
            order_id: order_id.to_string(),
            sku: sku.to_string(),
            quantity: 1,
            product_name: String::new(),
            fulfillment_status: Some(status.to_string()),
            fulfilled_at,
        }
    }

    fn options(date_range: Option<DateRange>, excluded: &[&str]) -> FilterOptions {
        FilterOptions {
            status_filter: true,
            require_fulfillment_date: true,
            date_range,
            exclusions: ExclusionSet::with_defaults(excluded.iter().copied()),
        }
    }

    #[test]
    fn test_stage_order() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 7, 31).unwrap(),
        )
        .unwrap();
        let pipeline = FilterPipeline::from_options(&options(Some(range), &[]));
        assert_eq!(
            pipeline.stage_names(),
            vec!["status", "fulfillment_date", "date_range", "sku_exclusion"]
        );

        let lenient = FilterOptions {
            status_filter: false,
            require_fulfillment_date: false,
            date_range: None,
            exclusions: ExclusionSet::default(),
        };
        assert_eq!(
            FilterPipeline::from_options(&lenient).stage_names(),
            vec!["sku_exclusion"]
        );
    }

    #[test]
    fn test_status_is_exact_and_case_sensitive() {
        let items = vec![
            item("#1", "A", "fulfilled", at(2025, 7, 2, 0, 0, 0)),
            item("#2", "B", "Fulfilled", at(2025, 7, 2, 0, 0, 0)),
            item("#3", "C", "unfulfilled", at(2025, 7, 2, 0, 0, 0)),
            item("#4", "D", "partial", at(2025, 7, 2, 0, 0, 0)),
        ];
        let kept = FilterPipeline::from_options(&options(None, &[])).apply(items);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].order_id, "#1");
    }

    #[test]
    fn test_date_range_is_line_item_granular() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 7, 31).unwrap(),
        )
        .unwrap();
        let items = vec![
            item("#1", "A", "fulfilled", at(2025, 7, 31, 23, 59, 59)),
            item("#1", "B", "fulfilled", at(2025, 8, 1, 0, 0, 1)),
            item("#2", "C", "fulfilled", at(2025, 6, 30, 23, 59, 59)),
            item("#3", "D", "fulfilled", None),
        ];

        let kept = FilterPipeline::from_options(&options(Some(range), &[])).apply(items);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].order_id, "#1");
        assert_eq!(kept[0].sku, "A");
    }

    #[test]
    fn test_sku_exclusion_includes_builtin_defaults() {
        let items = vec![
            item("#1", "A", "fulfilled", at(2025, 7, 2, 0, 0, 0)),
            item("#1", "parcel-protection", "fulfilled", at(2025, 7, 2, 0, 0, 0)),
            item("#2", "GIFT", "fulfilled", at(2025, 7, 2, 0, 0, 0)),
        ];
        let kept = FilterPipeline::from_options(&options(None, &["GIFT"])).apply(items);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].sku, "A");
    }

    #[test]
    fn test_preserves_relative_order() {
        let items = vec![
            item("#3", "C", "fulfilled", at(2025, 7, 3, 0, 0, 0)),
            item("#1", "X", "pending", at(2025, 7, 3, 0, 0, 0)),
            item("#1", "A", "fulfilled", at(2025, 7, 1, 0, 0, 0)),
            item("#2", "B", "fulfilled", at(2025, 7, 2, 0, 0, 0)),
        ];
        let kept = FilterPipeline::from_options(&options(None, &[])).apply(items);
        let skus: Vec<&str> = kept.iter().map(|i| i.sku.as_str()).collect();
        assert_eq!(skus, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_empty_input_stays_empty() {
        let kept = FilterPipeline::from_options(&options(None, &[])).apply(Vec::new());
        assert!(kept.is_empty());
    }
}
