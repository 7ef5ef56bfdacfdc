use crate::adapters::csv_table;
use crate::adapters::export::{parse_formats, OutputFormat};
use crate::core::calculator;
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::{CalculationParams, CostReport, Table};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::Validate;

/// Reads an order export from `source`, prices it, and writes every
/// configured report format to `sink`.
pub struct CostReportPipeline<S: Storage, C: ConfigProvider> {
    source: S,
    sink: S,
    config: C,
    params: CalculationParams,
    formats: Vec<OutputFormat>,
}

impl<S: Storage, C: ConfigProvider> CostReportPipeline<S, C> {
    /// Resolves the run parameters up front so configuration errors surface
    /// before the input is touched.
    pub fn new(source: S, sink: S, config: C) -> Result<Self> {
        let params = config.calculation_params()?;
        params.validate()?;
        let formats = parse_formats(config.output_formats())?;
        Ok(Self {
            source,
            sink,
            config,
            params,
            formats,
        })
    }

    pub fn params(&self) -> &CalculationParams {
        &self.params
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for CostReportPipeline<S, C> {
    async fn extract(&self) -> Result<Table> {
        let path = self.config.input_path();
        tracing::debug!("Reading order export from: {}", path);

        let data = self.source.read_file(path).await?;
        tracing::debug!("Read {} bytes", data.len());

        csv_table::parse_table(&data)
    }

    async fn transform(&self, table: Table) -> Result<CostReport> {
        let params = self.params.clone();

        // 計算本身是同步的，放到 blocking worker 上避免阻塞 runtime
        tokio::task::spawn_blocking(move || calculator::calculate(&table, &params))
            .await
            .map_err(|e| EtlError::ProcessingError {
                message: format!("calculation worker failed: {}", e),
            })?
    }

    async fn load(&self, report: CostReport) -> Result<String> {
        let mut written = Vec::with_capacity(self.formats.len());

        for format in &self.formats {
            let file_name = format.file_name(self.config.file_prefix());
            let data = format.render(&report)?;

            tracing::debug!("Writing {} ({} bytes) to storage", file_name, data.len());
            self.sink.write_file(&file_name, &data).await?;

            written.push(format!("{}/{}", self.config.output_path(), file_name));
        }

        Ok(written.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ColumnMapping, DateRange, ExclusionSet, FilterOptions, TariffConfig};
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn put_file(&self, path: &str, data: &[u8]) {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files
                .get(path)
                .cloned()
                .ok_or_else(|| EtlError::SourceNotFound {
                    path: path.to_string(),
                })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        input_path: String,
        output_path: String,
        output_formats: Vec<String>,
        file_prefix: String,
        tariff: TariffConfig,
        date_range: Option<(NaiveDate, NaiveDate)>,
        excluded: Vec<String>,
    }

    impl MockConfig {
        fn new(formats: &[&str]) -> Self {
            Self {
                input_path: "orders.csv".to_string(),
                output_path: "out".to_string(),
                output_formats: formats.iter().map(|f| f.to_string()).collect(),
                file_prefix: "report".to_string(),
                tariff: TariffConfig {
                    first_sku_cost: 10.0,
                    next_sku_cost: 5.0,
                    unit_cost: 2.0,
                    exchange_rate: Some(2.0),
                },
                date_range: None,
                excluded: vec![],
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn input_path(&self) -> &str {
            &self.input_path
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn output_formats(&self) -> &[String] {
            &self.output_formats
        }

        fn file_prefix(&self) -> &str {
            &self.file_prefix
        }

        fn calculation_params(&self) -> Result<CalculationParams> {
            let date_range = match self.date_range {
                Some((start, end)) => Some(DateRange::new(start, end)?),
                None => None,
            };
            let filters = FilterOptions {
                status_filter: true,
                require_fulfillment_date: true,
                date_range,
                exclusions: ExclusionSet::with_defaults(&self.excluded),
            };
            Ok(CalculationParams::new(self.tariff, filters).with_columns(ColumnMapping::default()))
        }
    }

    const ORDERS_CSV: &str = "\
Name,Fulfillment Status,Lineitem quantity,Lineitem sku,Lineitem name,Fulfilled at
#1001,fulfilled,3,SKU-A,Product A,2025-07-15 10:00:00 +0300
#1001,fulfilled,2,SKU-B,Product B,2025-07-15 10:00:00 +0300
#1001,fulfilled,1,parcel-protection,Parcel Protection,2025-07-15 10:00:00 +0300
#1002,fulfilled,2,SKU-C,Product C,2025-07-20 09:30:00 +0300
#1003,unfulfilled,4,SKU-D,Product D,
";

    #[tokio::test]
    async fn test_extract_parses_table() {
        let storage = MockStorage::new();
        storage.put_file("orders.csv", ORDERS_CSV.as_bytes()).await;

        let pipeline =
            CostReportPipeline::new(storage.clone(), storage, MockConfig::new(&["json"])).unwrap();
        let table = pipeline.extract().await.unwrap();

        assert_eq!(table.row_count(), 5);
        assert!(table.has_column("Fulfilled at"));
    }

    #[tokio::test]
    async fn test_extract_missing_source() {
        let storage = MockStorage::new();
        let pipeline =
            CostReportPipeline::new(storage.clone(), storage, MockConfig::new(&["json"])).unwrap();

        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, EtlError::SourceNotFound { .. }));
    }

    #[tokio::test]
    async fn test_transform_runs_calculation() {
        let storage = MockStorage::new();
        storage.put_file("orders.csv", ORDERS_CSV.as_bytes()).await;
        let pipeline =
            CostReportPipeline::new(storage.clone(), storage, MockConfig::new(&["json"])).unwrap();

        let table = pipeline.extract().await.unwrap();
        let report = pipeline.transform(table).await.unwrap();

        assert_eq!(report.totals.processed_orders_count, 2);
        assert_eq!(report.totals.total_units, 7);
        assert_eq!(report.totals.total_cost, 39.0);
        assert_eq!(report.totals.total_cost_converted, Some(19.5));
        assert_eq!(report.line_items.len(), 3);
    }

    #[tokio::test]
    async fn test_transform_date_range() {
        let storage = MockStorage::new();
        storage.put_file("orders.csv", ORDERS_CSV.as_bytes()).await;

        let mut config = MockConfig::new(&["json"]);
        config.date_range = Some((
            NaiveDate::from_ymd_opt(2025, 7, 16).unwrap(),
            NaiveDate::from_ymd_opt(2025, 7, 31).unwrap(),
        ));
        let pipeline = CostReportPipeline::new(storage.clone(), storage, config).unwrap();

        let table = pipeline.extract().await.unwrap();
        let report = pipeline.transform(table).await.unwrap();

        assert_eq!(report.totals.processed_orders_count, 1);
        assert_eq!(report.order_summaries[0].order_id, "#1002");
        assert_eq!(report.order_summaries[0].cost, 14.0);
    }

    #[tokio::test]
    async fn test_load_writes_every_format() {
        let storage = MockStorage::new();
        storage.put_file("orders.csv", ORDERS_CSV.as_bytes()).await;
        let pipeline = CostReportPipeline::new(
            storage.clone(),
            storage.clone(),
            MockConfig::new(&["xlsx", "zip", "json"]),
        )
        .unwrap();

        let table = pipeline.extract().await.unwrap();
        let report = pipeline.transform(table).await.unwrap();
        let output = pipeline.load(report).await.unwrap();

        assert_eq!(output, "out/report.xlsx, out/report.zip, out/report.json");
        assert!(storage.get_file("report.xlsx").await.is_some());
        assert!(storage.get_file("report.zip").await.is_some());

        let json = storage.get_file("report.json").await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(value["totals"]["total_cost"], 39.0);
    }

    #[test]
    fn test_new_rejects_unknown_format() {
        let storage = MockStorage::new();
        let result = CostReportPipeline::new(storage.clone(), storage, MockConfig::new(&["pdf"]));
        assert!(matches!(result, Err(EtlError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_new_rejects_invalid_tariff() {
        let storage = MockStorage::new();
        let mut config = MockConfig::new(&["json"]);
        config.tariff.unit_cost = -2.0;
        let result = CostReportPipeline::new(storage.clone(), storage, config);
        assert!(matches!(result, Err(EtlError::InvalidConfiguration { .. })));
    }
}
