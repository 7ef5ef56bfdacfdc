pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliConfig;
pub use crate::config::toml_config::TomlConfig;

pub use crate::adapters::storage::LocalStorage;
pub use crate::core::{
    calculator::{calculate, calculate_file},
    etl::{EtlEngine, RunOutcome},
    pipeline::CostReportPipeline,
};
pub use crate::domain::model::{
    CalculationParams, ColumnMapping, CostReport, DateRange, ExclusionSet, FilterOptions,
    LineItemRow, OrderSummary, ProblemRow, TariffConfig, Totals, DEFAULT_EXCLUDED_SKUS,
};
pub use crate::utils::error::{EtlError, Result};
