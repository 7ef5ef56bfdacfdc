use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{validate_non_negative_cost, validate_positive_rate, Validate};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Service SKUs that never count towards fulfillment (shipping insurance add-ons).
pub const DEFAULT_EXCLUDED_SKUS: &[&str] = &["parcel-protection"];

pub const FULFILLED_STATUS: &str = "fulfilled";

/// A fully materialized table of named columns, as read from the export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Source header names for each logical line-item field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub order_id: String,
    pub sku: String,
    pub quantity: String,
    pub product_name: String,
    pub fulfillment_status: String,
    pub fulfilled_at: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            order_id: "Name".to_string(),
            sku: "Lineitem sku".to_string(),
            quantity: "Lineitem quantity".to_string(),
            product_name: "Lineitem name".to_string(),
            fulfillment_status: "Fulfillment Status".to_string(),
            fulfilled_at: "Fulfilled at".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub order_id: String,
    pub sku: String,
    pub quantity: u64,
    pub product_name: String,
    pub fulfillment_status: Option<String>,
    /// `None` when the cell is absent, blank or unparsable.
    pub fulfilled_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TariffConfig {
    pub first_sku_cost: f64,
    pub next_sku_cost: f64,
    pub unit_cost: f64,
    /// Local currency per foreign unit; converted totals are skipped when absent.
    pub exchange_rate: Option<f64>,
}

impl Validate for TariffConfig {
    fn validate(&self) -> Result<()> {
        validate_non_negative_cost("first_sku_cost", self.first_sku_cost)?;
        validate_non_negative_cost("next_sku_cost", self.next_sku_cost)?;
        validate_non_negative_cost("unit_cost", self.unit_cost)?;
        if let Some(rate) = self.exchange_rate {
            validate_positive_rate("exchange_rate", rate)?;
        }
        Ok(())
    }
}

/// Inclusive calendar-date window; the end day is covered up to 23:59:59.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(EtlError::invalid_config(
                "end_date",
                end,
                format!("End date cannot be before start date {}", start),
            ));
        }
        Ok(Self { start, end })
    }

    /// Builds a range from optional bounds; both or neither must be given.
    pub fn from_bounds(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Option<Self>> {
        match (start, end) {
            (Some(start), Some(end)) => Self::new(start, end).map(Some),
            (None, None) => Ok(None),
            (Some(start), None) => Err(EtlError::invalid_config(
                "end_date",
                "",
                format!("An end date is required when start date {} is given", start),
            )),
            (None, Some(end)) => Err(EtlError::invalid_config(
                "start_date",
                "",
                format!("A start date is required when end date {} is given", end),
            )),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn start_bound(&self) -> NaiveDateTime {
        self.start.and_time(NaiveTime::MIN)
    }

    pub fn end_bound(&self) -> NaiveDateTime {
        self.end.and_time(end_of_day())
    }

    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        self.start_bound() <= timestamp && timestamp <= self.end_bound()
    }
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    skus: HashSet<String>,
}

impl ExclusionSet {
    /// Unions the user's SKUs with `defaults`; blank entries are ignored.
    pub fn new<I, S>(user_skus: I, defaults: &[&str]) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let skus = user_skus
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .chain(defaults.iter().map(|s| s.to_string()))
            .collect();
        Self { skus }
    }

    pub fn with_defaults<I, S>(user_skus: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(user_skus, DEFAULT_EXCLUDED_SKUS)
    }

    pub fn contains(&self, sku: &str) -> bool {
        self.skus.contains(sku)
    }

    pub fn len(&self) -> usize {
        self.skus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skus.is_empty()
    }

    /// Sorted copy of the members, for display.
    pub fn to_sorted_vec(&self) -> Vec<String> {
        let mut skus: Vec<String> = self.skus.iter().cloned().collect();
        skus.sort();
        skus
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterOptions {
    pub status_filter: bool,
    pub require_fulfillment_date: bool,
    pub date_range: Option<DateRange>,
    pub exclusions: ExclusionSet,
}

impl FilterOptions {
    pub fn requires_date_column(&self) -> bool {
        self.date_range.is_some() || self.status_filter || self.require_fulfillment_date
    }
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            status_filter: true,
            require_fulfillment_date: true,
            date_range: None,
            exclusions: ExclusionSet::with_defaults(Vec::<String>::new()),
        }
    }
}

/// Everything one calculation run needs besides the table itself.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationParams {
    pub tariff: TariffConfig,
    pub filters: FilterOptions,
    pub columns: ColumnMapping,
}

impl CalculationParams {
    pub fn new(tariff: TariffConfig, filters: FilterOptions) -> Self {
        Self {
            tariff,
            filters,
            columns: ColumnMapping::default(),
        }
    }

    pub fn with_columns(mut self, columns: ColumnMapping) -> Self {
        self.columns = columns;
        self
    }

    /// Source headers that must be present, in the order they are checked.
    pub fn required_columns(&self) -> Vec<&str> {
        let mut required = vec![
            self.columns.order_id.as_str(),
            self.columns.quantity.as_str(),
            self.columns.sku.as_str(),
        ];
        if self.filters.status_filter {
            required.push(self.columns.fulfillment_status.as_str());
        }
        if self.filters.requires_date_column() {
            required.push(self.columns.fulfilled_at.as_str());
        }
        required
    }
}

impl Validate for CalculationParams {
    fn validate(&self) -> Result<()> {
        self.tariff.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderSummary {
    pub order_id: String,
    pub unique_sku_count: usize,
    pub total_units: u64,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItemRow {
    pub order_id: String,
    #[serde(serialize_with = "serialize_timestamp")]
    pub fulfilled_at: Option<NaiveDateTime>,
    pub sku: String,
    pub product_name: String,
    pub quantity: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Totals {
    pub processed_orders_count: usize,
    pub total_units: u64,
    pub total_cost: f64,
    pub total_cost_converted: Option<f64>,
}

/// An input row with a blank or unreadable key field. Listed for review
/// only; it never changes the totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProblemRow {
    /// 1-based line in the source file, header included.
    pub line_number: usize,
    pub order_id: String,
    pub sku: String,
    pub quantity: String,
    pub fulfilled_at: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostReport {
    pub totals: Totals,
    pub order_summaries: Vec<OrderSummary>,
    pub line_items: Vec<LineItemRow>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub problem_rows: Vec<ProblemRow>,
}

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_timestamp(timestamp: Option<NaiveDateTime>) -> String {
    timestamp
        .map(|ts| ts.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_default()
}

fn serialize_timestamp<S>(
    timestamp: &Option<NaiveDateTime>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match timestamp {
        Some(_) => serializer.serialize_str(&format_timestamp(*timestamp)),
        None => serializer.serialize_none(),
    }
}
