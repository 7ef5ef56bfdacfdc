use anyhow::Context;
use clap::Parser;
use fulfillment_cost::core::ConfigProvider;
use fulfillment_cost::utils::logger::{self, LogFormat};
use fulfillment_cost::utils::validation::Validate;
use fulfillment_cost::{CalculationParams, CostReportPipeline, EtlEngine, LocalStorage, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-report")]
#[command(about = "Fulfillment cost report driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "report-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Show what would be processed without executing
    #[arg(long)]
    dry_run: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 先載入配置，日誌等級可由 [monitoring].log_level 指定
    let config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("Failed to load config file '{}'", args.config))?;

    let format = if args.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    logger::init_logger(format, args.verbose, config.log_level());

    tracing::info!("🚀 Starting TOML-based fulfillment report");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    let params = config.calculation_params()?;
    display_config_summary(&config, &params, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());

    let source = LocalStorage::new(".".to_string());
    let sink = LocalStorage::new(config.output_path().to_string());
    let pipeline = CostReportPipeline::new(source, sink, config)?;

    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);
    let outcome = engine.run().await.map_err(|e| {
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        e
    })?;

    let totals = &outcome.totals;
    println!("✅ Report completed successfully!");
    println!(
        "   {} orders, {} units, total cost {:.2}",
        totals.processed_orders_count, totals.total_units, totals.total_cost
    );
    if let Some(converted) = totals.total_cost_converted {
        println!("   Converted cost: {:.2}", converted);
    }
    println!("📁 Output saved to: {}", outcome.output_path);

    Ok(())
}

fn display_config_summary(config: &TomlConfig, params: &CalculationParams, args: &Args) {
    let tariff = &params.tariff;
    let filters = &params.filters;

    println!("📋 Configuration Summary:");
    println!("  Report: {}", config.report.name);
    if let Some(description) = &config.report.description {
        println!("  Description: {}", description);
    }
    println!("  Input: {}", config.input_path());
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));
    println!(
        "  Tariff: first SKU {:.2}, next SKU {:.2}, per unit {:.2}",
        tariff.first_sku_cost, tariff.next_sku_cost, tariff.unit_cost
    );
    match tariff.exchange_rate {
        Some(rate) => println!("  Exchange rate: {}", rate),
        None => println!("  Exchange rate: (not converted)"),
    }
    match &filters.date_range {
        Some(range) => println!("  Dates: {} to {} (inclusive)", range.start(), range.end()),
        None => println!("  Dates: all"),
    }
    println!("  Status filter: {}", filters.status_filter);
    println!(
        "  Excluded SKUs: {}",
        filters.exclusions.to_sorted_vec().join(", ")
    );

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}
