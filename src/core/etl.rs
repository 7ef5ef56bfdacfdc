use crate::core::Pipeline;
use crate::domain::model::Totals;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub totals: Totals,
    pub order_count: usize,
    pub line_item_count: usize,
    pub output_path: String,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<RunOutcome> {
        tracing::info!("Starting fulfillment cost report...");
        self.monitor.log_stats("Start");

        // Extract
        let table = self.pipeline.extract().await?;
        tracing::info!(
            "Extracted {} rows with {} columns",
            table.row_count(),
            table.headers.len()
        );
        self.monitor.log_stats("Extract");

        // Transform
        let report = self.pipeline.transform(table).await?;
        tracing::info!(
            "Calculated {} orders from {} line items",
            report.order_summaries.len(),
            report.line_items.len()
        );
        self.monitor.log_stats("Transform");

        let totals = report.totals.clone();
        let order_count = report.order_summaries.len();
        let line_item_count = report.line_items.len();

        // Load
        let output_path = self.pipeline.load(report).await?;
        tracing::info!("Report saved to: {}", output_path);
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        Ok(RunOutcome {
            totals,
            order_count,
            line_item_count,
            output_path,
        })
    }
}
