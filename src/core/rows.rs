use crate::core::timestamp::parse_fulfilled_at;
use crate::domain::model::{ColumnMapping, LineItem, Table};
use crate::utils::error::{EtlError, Result};

struct ColumnIndexes {
    order_id: usize,
    quantity: usize,
    sku: usize,
    product_name: Option<usize>,
    fulfillment_status: Option<usize>,
    fulfilled_at: Option<usize>,
}

impl ColumnIndexes {
    fn resolve(table: &Table, columns: &ColumnMapping) -> Result<Self> {
        let required = |name: &str| {
            table.column_index(name).ok_or_else(|| EtlError::MissingColumn {
                column: name.to_string(),
            })
        };

        Ok(Self {
            order_id: required(&columns.order_id)?,
            quantity: required(&columns.quantity)?,
            sku: required(&columns.sku)?,
            product_name: table.column_index(&columns.product_name),
            fulfillment_status: table.column_index(&columns.fulfillment_status),
            fulfilled_at: table.column_index(&columns.fulfilled_at),
        })
    }
}

/// Converts table rows into typed line items, preserving row order.
///
/// Rows without an order id cannot be grouped and are skipped. A quantity
/// that is not a non-negative whole number makes the whole input malformed.
pub fn read_line_items(table: &Table, columns: &ColumnMapping) -> Result<Vec<LineItem>> {
    let idx = ColumnIndexes::resolve(table, columns)?;
    let mut items = Vec::with_capacity(table.row_count());

    for (i, row) in table.rows.iter().enumerate() {
        let cell = |index: usize| row.get(index).map(String::as_str).unwrap_or("");
        let optional_cell = |index: Option<usize>| index.map(|i| cell(i));

        // 標題列是第 1 行
        let line_number = i + 2;

        let order_id = cell(idx.order_id);
        if order_id.trim().is_empty() {
            tracing::debug!("Skipping line {}: no order id", line_number);
            continue;
        }

        let quantity = parse_quantity(cell(idx.quantity), line_number)?;

        items.push(LineItem {
            order_id: order_id.to_string(),
            sku: cell(idx.sku).to_string(),
            quantity,
            product_name: optional_cell(idx.product_name).unwrap_or("").to_string(),
            fulfillment_status: optional_cell(idx.fulfillment_status).map(str::to_string),
            fulfilled_at: optional_cell(idx.fulfilled_at).and_then(parse_fulfilled_at),
        });
    }

    Ok(items)
}

/// 2^64; float quantities at or above it do not fit in `u64`.
const U64_LIMIT: f64 = 18_446_744_073_709_551_616.0;

fn parse_quantity(raw: &str, line_number: usize) -> Result<u64> {
    let value = raw.trim();
    if value.is_empty() {
        return Ok(0);
    }

    if let Ok(quantity) = value.parse::<u64>() {
        return Ok(quantity);
    }

    // 部分匯出工具會把數量寫成 "2.0"
    match value.parse::<f64>() {
        Ok(q) if q.is_finite() && q >= 0.0 && q.fract() == 0.0 && q < U64_LIMIT => Ok(q as u64),
        _ => Err(EtlError::MalformedInput {
            message: format!(
                "line {}: quantity '{}' is not a non-negative whole number",
                line_number, raw
            ),
        }),
    }
}
