use crate::domain::model::CostReport;
use crate::utils::error::{EtlError, Result};
use serde::Serialize;
use std::io::Write;
use zip::write::{SimpleFileOptions, ZipWriter};

const ORDER_COLUMNS: &[&str] = &["order_id", "unique_sku_count", "total_units", "cost"];
const LINE_ITEM_COLUMNS: &[&str] = &["order_id", "fulfilled_at", "sku", "product_name", "quantity"];
const PROBLEM_COLUMNS: &[&str] = &[
    "line_number",
    "order_id",
    "sku",
    "quantity",
    "fulfilled_at",
    "reason",
];
const TOTALS_COLUMNS: &[&str] = &[
    "processed_orders_count",
    "total_units",
    "total_cost",
    "total_cost_converted",
];

/// Serializes rows as CSV with a fixed header, so empty tables keep their columns.
pub fn to_csv<T: Serialize>(headers: &[&str], rows: &[T]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(headers)?;
    for row in rows {
        writer.serialize(row)?;
    }

    writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))
}

/// Bundles the report's tables as CSV files in one ZIP archive. The problem
/// rows file is only added when there are any.
pub fn render_archive(report: &CostReport) -> Result<Vec<u8>> {
    let mut files = vec![
        ("order_summary.csv", to_csv(ORDER_COLUMNS, &report.order_summaries)?),
        ("line_items.csv", to_csv(LINE_ITEM_COLUMNS, &report.line_items)?),
        ("totals.csv", to_csv(TOTALS_COLUMNS, std::slice::from_ref(&report.totals))?),
    ];
    if !report.problem_rows.is_empty() {
        files.push(("problem_rows.csv", to_csv(PROBLEM_COLUMNS, &report.problem_rows)?));
    }

    tracing::debug!("Creating ZIP archive with {} files", files.len());

    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, data) in &files {
        zip.start_file(*name, options)?;
        zip.write_all(data)?;
    }

    // 完成並取回底層 Vec<u8>
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}
