#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::domain::model::{
    CalculationParams, ColumnMapping, DateRange, ExclusionSet, FilterOptions, TariffConfig,
};
use crate::utils::error::Result;
use crate::utils::validation::{parse_iso_date, Validate};

/// Raw run settings shared by every configuration source.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RunSettings<'a> {
    pub tariff: TariffConfig,
    pub start_date: Option<&'a str>,
    pub end_date: Option<&'a str>,
    pub excluded_skus: &'a [String],
    pub status_filter: bool,
    pub require_fulfillment_date: bool,
    pub columns: &'a ColumnMapping,
}

impl RunSettings<'_> {
    /// Validates tariff and dates and assembles the calculation parameters.
    pub(crate) fn resolve(&self) -> Result<CalculationParams> {
        self.tariff.validate()?;

        let start = self
            .start_date
            .map(|s| parse_iso_date("start_date", s))
            .transpose()?;
        let end = self
            .end_date
            .map(|s| parse_iso_date("end_date", s))
            .transpose()?;

        let filters = FilterOptions {
            status_filter: self.status_filter,
            require_fulfillment_date: self.require_fulfillment_date,
            date_range: DateRange::from_bounds(start, end)?,
            exclusions: ExclusionSet::with_defaults(self.excluded_skus),
        };

        Ok(CalculationParams::new(self.tariff, filters).with_columns(self.columns.clone()))
    }
}
