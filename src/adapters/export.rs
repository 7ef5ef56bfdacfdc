use crate::adapters::{archive, xlsx};
use crate::domain::model::CostReport;
use crate::utils::error::{EtlError, Result};
use std::fmt;
use std::str::FromStr;

pub const SUPPORTED_FORMATS: &[&str] = &["xlsx", "zip", "json"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Xlsx,
    Zip,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Zip => "zip",
            OutputFormat::Json => "json",
        }
    }

    pub fn file_name(&self, prefix: &str) -> String {
        format!("{}.{}", prefix, self.extension())
    }

    pub fn render(&self, report: &CostReport) -> Result<Vec<u8>> {
        match self {
            OutputFormat::Xlsx => xlsx::render_workbook(report),
            OutputFormat::Zip => archive::render_archive(report),
            OutputFormat::Json => Ok(serde_json::to_vec_pretty(report)?),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = EtlError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xlsx" => Ok(OutputFormat::Xlsx),
            "zip" => Ok(OutputFormat::Zip),
            "json" => Ok(OutputFormat::Json),
            other => Err(EtlError::invalid_config(
                "output_formats",
                other,
                format!("Unsupported format. Valid formats: {}", SUPPORTED_FORMATS.join(", ")),
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

pub fn parse_formats(formats: &[String]) -> Result<Vec<OutputFormat>> {
    formats.iter().map(|f| f.parse()).collect()
}
