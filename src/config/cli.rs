use crate::adapters::export::SUPPORTED_FORMATS;
use crate::config::RunSettings;
use crate::core::ConfigProvider;
use crate::domain::model::{CalculationParams, ColumnMapping, TariffConfig};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_output_formats, validate_path, Validate,
};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "fulfillment-cost")]
#[command(about = "Calculate fulfillment costs from a Shopify order export")]
pub struct CliConfig {
    /// Path to the order export CSV
    pub input: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, default_value = "10.0", help = "Cost of the first SKU in an order")]
    pub first_sku_cost: f64,

    #[arg(long, default_value = "5.0", help = "Cost of each additional distinct SKU")]
    pub next_sku_cost: f64,

    #[arg(long, default_value = "2.0", help = "Cost per unit")]
    pub unit_cost: f64,

    #[arg(long, help = "Local currency per foreign unit, e.g. 1.95583")]
    pub exchange_rate: Option<f64>,

    #[arg(long, requires = "end_date", help = "First fulfillment day (YYYY-MM-DD)")]
    pub start_date: Option<String>,

    #[arg(long, requires = "start_date", help = "Last fulfillment day, inclusive (YYYY-MM-DD)")]
    pub end_date: Option<String>,

    #[arg(long, value_delimiter = ',')]
    pub exclude_skus: Vec<String>,

    #[arg(long, help = "Count line items regardless of fulfillment status")]
    pub no_status_filter: bool,

    #[arg(
        long,
        help = "Keep line items without a fulfillment date; only takes effect with --no-status-filter and no date range"
    )]
    pub allow_missing_dates: bool,

    #[arg(long, value_delimiter = ',', default_value = "xlsx")]
    pub formats: Vec<String>,

    #[arg(long, default_value = "fulfillment_report")]
    pub file_prefix: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

impl CliConfig {
    pub fn tariff(&self) -> TariffConfig {
        TariffConfig {
            first_sku_cost: self.first_sku_cost,
            next_sku_cost: self.next_sku_cost,
            unit_cost: self.unit_cost,
            exchange_rate: self.exchange_rate,
        }
    }
}

impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.formats
    }

    fn file_prefix(&self) -> &str {
        &self.file_prefix
    }

    fn calculation_params(&self) -> Result<CalculationParams> {
        let columns = ColumnMapping::default();
        RunSettings {
            tariff: self.tariff(),
            start_date: self.start_date.as_deref(),
            end_date: self.end_date.as_deref(),
            excluded_skus: &self.exclude_skus,
            status_filter: !self.no_status_filter,
            require_fulfillment_date: !self.allow_missing_dates,
            columns: &columns,
        }
        .resolve()
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("input", &self.input)?;
        validate_path("output_path", &self.output_path)?;
        validate_output_formats("formats", &self.formats, SUPPORTED_FORMATS)?;
        validate_non_empty_string("file_prefix", &self.file_prefix)?;
        self.calculation_params().map(|_| ())
    }
}
