use crate::adapters::export::SUPPORTED_FORMATS;
use crate::config::RunSettings;
use crate::core::ConfigProvider;
use crate::domain::model::{CalculationParams, ColumnMapping, TariffConfig};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{
    validate_log_level, validate_non_empty_string, validate_output_formats, validate_path,
    Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub report: ReportConfig,
    pub input: InputConfig,
    pub tariff: TariffConfig,
    #[serde(default)]
    pub filters: FiltersConfig,
    pub output: OutputConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub path: String,
    #[serde(default)]
    pub columns: ColumnMapping,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FiltersConfig {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub excluded_skus: Vec<String>,
    pub status_filter: bool,
    pub require_fulfillment_date: bool,
}

impl Default for FiltersConfig {
    fn default() -> Self {
        Self {
            start_date: None,
            end_date: None,
            excluded_skus: Vec::new(),
            status_filter: true,
            require_fulfillment_date: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

fn default_formats() -> Vec<String> {
    vec!["xlsx".to_string()]
}

fn default_file_prefix() -> String {
    "fulfillment_report".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => EtlError::SourceNotFound {
                path: path.display().to_string(),
            },
            _ => EtlError::IoError(e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${REPORT_INPUT})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 取得監控設定
    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    /// Level for this crate's log events when `RUST_LOG` is unset.
    pub fn log_level(&self) -> Option<&str> {
        self.monitoring.as_ref().and_then(|m| m.log_level.as_deref())
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        &self.input.path
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn output_formats(&self) -> &[String] {
        &self.output.formats
    }

    fn file_prefix(&self) -> &str {
        &self.output.file_prefix
    }

    fn calculation_params(&self) -> Result<CalculationParams> {
        RunSettings {
            tariff: self.tariff,
            start_date: self.filters.start_date.as_deref(),
            end_date: self.filters.end_date.as_deref(),
            excluded_skus: &self.filters.excluded_skus,
            status_filter: self.filters.status_filter,
            require_fulfillment_date: self.filters.require_fulfillment_date,
            columns: &self.input.columns,
        }
        .resolve()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_path("input.path", &self.input.path)?;
        validate_path("output.path", &self.output.path)?;
        validate_output_formats("output.formats", &self.output.formats, SUPPORTED_FORMATS)?;
        validate_non_empty_string("output.file_prefix", &self.output.file_prefix)?;
        if let Some(level) = self.log_level() {
            validate_log_level("monitoring.log_level", level)?;
        }
        self.calculation_params().map(|_| ())
    }
}
