use clap::Parser;
use fulfillment_cost::utils::error::ErrorSeverity;
use fulfillment_cost::utils::logger::{self, LogFormat};
use fulfillment_cost::utils::validation::Validate;
use fulfillment_cost::{CliConfig, CostReportPipeline, EtlEngine, LocalStorage, RunOutcome};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    let format = if config.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    logger::init_logger(format, config.verbose, None);

    tracing::info!("Starting fulfillment-cost CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    // 輸入檔路徑由使用者提供，輸出寫到 output_path
    let source = LocalStorage::new(".".to_string());
    let sink = LocalStorage::new(config.output_path.clone());

    let result = match CostReportPipeline::new(source, sink, config) {
        Ok(pipeline) => EtlEngine::new_with_monitoring(pipeline, monitor_enabled).run().await,
        Err(e) => Err(e),
    };

    match result {
        Ok(outcome) => {
            tracing::info!("✅ Report completed successfully!");
            print_outcome(&outcome);
        }
        Err(e) => {
            tracing::error!(
                "❌ Report failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn print_outcome(outcome: &RunOutcome) {
    let totals = &outcome.totals;
    println!("✅ Processed orders: {}", totals.processed_orders_count);
    println!("   Total units:      {}", totals.total_units);
    println!("   Total cost:       {:.2}", totals.total_cost);
    if let Some(converted) = totals.total_cost_converted {
        println!("   Converted cost:   {:.2}", converted);
    }
    println!("   Line items:       {}", outcome.line_item_count);
    println!("📁 Output saved to: {}", outcome.output_path);
}
