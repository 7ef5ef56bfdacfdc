use crate::core::timestamp::parse_fulfilled_at;
use crate::domain::model::{ColumnMapping, FilterOptions, ProblemRow, Table, FULFILLED_STATUS};

/// Lists rows whose key fields are blank or unreadable, for the review sheet.
///
/// Date problems are only reported for rows that would otherwise be counted:
/// an unfulfilled order without a date is expected, not a problem.
pub fn find_problem_rows(
    table: &Table,
    columns: &ColumnMapping,
    filters: &FilterOptions,
) -> Vec<ProblemRow> {
    let order_idx = table.column_index(&columns.order_id);
    let sku_idx = table.column_index(&columns.sku);
    let quantity_idx = table.column_index(&columns.quantity);
    let status_idx = table.column_index(&columns.fulfillment_status);
    let date_idx = table
        .column_index(&columns.fulfilled_at)
        .filter(|_| filters.requires_date_column());

    let mut problems = Vec::new();
    for (i, row) in table.rows.iter().enumerate() {
        let cell = |index: Option<usize>| {
            index
                .and_then(|i| row.get(i))
                .map(|c| c.trim())
                .unwrap_or("")
        };

        let order_id = cell(order_idx);
        let sku = cell(sku_idx);
        let quantity = cell(quantity_idx);
        let fulfilled_at = cell(date_idx);

        let counted = !filters.status_filter || cell(status_idx) == FULFILLED_STATUS;

        let reason = if order_id.is_empty() {
            Some("missing order id")
        } else if sku.is_empty() {
            Some("missing SKU")
        } else if quantity.is_empty() {
            Some("missing quantity")
        } else if date_idx.is_some() && counted && fulfilled_at.is_empty() {
            Some("missing fulfillment date")
        } else if date_idx.is_some() && counted && parse_fulfilled_at(fulfilled_at).is_none() {
            Some("unreadable fulfillment date")
        } else {
            None
        };

        if let Some(reason) = reason {
            problems.push(ProblemRow {
                line_number: i + 2,
                order_id: order_id.to_string(),
                sku: sku.to_string(),
                quantity: quantity.to_string(),
                fulfilled_at: fulfilled_at.to_string(),
                reason: reason.to_string(),
            });
        }
    }

    if !problems.is_empty() {
        tracing::warn!("⚠️ {} rows have blank or unreadable key fields", problems.len());
    }
    problems
}
