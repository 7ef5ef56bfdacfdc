use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// 終端機用的精簡格式
    Compact,
    /// 給日誌收集器使用的結構化輸出
    Json,
}

/// Filter directive used when `RUST_LOG` is unset.
///
/// `--verbose` wins over a configured level; a configured level only applies
/// to this crate's own events.
pub fn default_directive(verbose: bool, level: Option<&str>) -> String {
    match (verbose, level) {
        (true, _) => "fulfillment_cost=debug,info".to_string(),
        (false, Some(level)) => format!("fulfillment_cost={}", level.trim().to_ascii_lowercase()),
        (false, None) => "fulfillment_cost=info".to_string(),
    }
}

pub fn init_logger(format: LogFormat, verbose: bool, level: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, level)));

    let layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    match format {
        LogFormat::Compact => tracing_subscriber::registry()
            .with(filter)
            .with(layer.compact())
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(layer.json())
            .init(),
    }
}
