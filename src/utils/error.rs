use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Missing required column: {column}")]
    MissingColumn { column: String },

    #[error("The specified file was not found: {path}")]
    SourceNotFound { path: String },

    #[error("Malformed input: {message}")]
    MalformedInput { message: String },

    #[error("Invalid configuration for '{field}' (value: '{value}'): {reason}")]
    InvalidConfiguration {
        field: String,
        value: String,
        reason: String,
    },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Spreadsheet export failed: {0}")]
    XlsxError(#[from] rust_xlsxwriter::XlsxError),

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Processing,
    Output,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn invalid_config(
        field: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        EtlError::InvalidConfiguration {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::MissingColumn { .. }
            | EtlError::SourceNotFound { .. }
            | EtlError::MalformedInput { .. }
            | EtlError::CsvError(_) => ErrorCategory::Input,
            EtlError::InvalidConfiguration { .. } | EtlError::ConfigError { .. } => {
                ErrorCategory::Configuration
            }
            EtlError::ProcessingError { .. } => ErrorCategory::Processing,
            EtlError::SerializationError(_) | EtlError::XlsxError(_) | EtlError::ZipError(_) => {
                ErrorCategory::Output
            }
            EtlError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Output => ErrorSeverity::Medium,
            ErrorCategory::Processing | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 輸出與系統錯誤可重試，輸入與配置錯誤需要使用者修正
    pub fn is_retryable(&self) -> bool {
        matches!(self.category(), ErrorCategory::Output | ErrorCategory::System)
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::MissingColumn { .. } => {
                "Export the orders again with line-item columns, or map the column names in the config file"
            }
            EtlError::SourceNotFound { .. } => "Check the input path and that the file is readable",
            EtlError::MalformedInput { .. } | EtlError::CsvError(_) => {
                "Make sure the file is a comma-separated export with a header row"
            }
            EtlError::InvalidConfiguration { .. } => {
                "Costs must be non-negative numbers, the exchange rate must be above zero, and dates must be YYYY-MM-DD with start <= end"
            }
            EtlError::ConfigError { .. } => "Fix the syntax of the configuration file",
            EtlError::SerializationError(_)
            | EtlError::XlsxError(_)
            | EtlError::ZipError(_)
            | EtlError::IoError(_) => "Check that the output directory exists and is writable",
            EtlError::ProcessingError { .. } => "Run again with --verbose and report the log",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::MissingColumn { column } => {
                format!("The input file is missing the required column '{}'", column)
            }
            EtlError::SourceNotFound { path } => format!("Input file not found: {}", path),
            EtlError::MalformedInput { .. } | EtlError::CsvError(_) => {
                "The input file could not be read as an order export".to_string()
            }
            EtlError::InvalidConfiguration { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
