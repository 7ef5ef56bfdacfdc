use crate::domain::model::{format_timestamp, CostReport};
use crate::utils::error::Result;
use rust_xlsxwriter::{Format, Workbook, Worksheet};

const ORDER_HEADERS: [&str; 4] = ["Order #", "Unique SKUs", "Total Units", "Order Cost"];
const LINE_ITEM_HEADERS: [&str; 5] = ["Order #", "Fulfilled Date", "SKU", "Product Name", "Quantity"];
const PROBLEM_HEADERS: [&str; 6] = ["Line", "Order #", "SKU", "Quantity", "Fulfilled at", "Reason"];

/// Renders the report as a workbook with order summary, line items and totals
/// sheets, plus a "Problem Rows" sheet when some input rows were unusable.
pub fn render_workbook(report: &CostReport) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let money = Format::new().set_num_format("0.00");

    let sheet = workbook.add_worksheet();
    sheet.set_name("Order Summary")?;
    write_headers(sheet, &ORDER_HEADERS, &header)?;
    for (i, order) in report.order_summaries.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, &order.order_id)?;
        sheet.write_number(row, 1, order.unique_sku_count as f64)?;
        sheet.write_number(row, 2, order.total_units as f64)?;
        sheet.write_number_with_format(row, 3, order.cost, &money)?;
    }
    set_widths(sheet, &[14.0, 12.0, 12.0, 14.0])?;

    let sheet = workbook.add_worksheet();
    sheet.set_name("Line Items")?;
    write_headers(sheet, &LINE_ITEM_HEADERS, &header)?;
    for (i, item) in report.line_items.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, &item.order_id)?;
        sheet.write_string(row, 1, format_timestamp(item.fulfilled_at))?;
        sheet.write_string(row, 2, &item.sku)?;
        sheet.write_string(row, 3, &item.product_name)?;
        sheet.write_number(row, 4, item.quantity as f64)?;
    }
    set_widths(sheet, &[14.0, 20.0, 20.0, 40.0, 10.0])?;

    let totals = &report.totals;
    let sheet = workbook.add_worksheet();
    sheet.set_name("Totals")?;
    write_headers(sheet, &["Metric", "Value"], &header)?;
    sheet.write_string(1, 0, "Processed orders")?;
    sheet.write_number(1, 1, totals.processed_orders_count as f64)?;
    sheet.write_string(2, 0, "Total units")?;
    sheet.write_number(2, 1, totals.total_units as f64)?;
    sheet.write_string(3, 0, "Total cost")?;
    sheet.write_number_with_format(3, 1, totals.total_cost, &money)?;
    if let Some(converted) = totals.total_cost_converted {
        sheet.write_string(4, 0, "Total cost (converted)")?;
        sheet.write_number_with_format(4, 1, converted, &money)?;
    }
    set_widths(sheet, &[24.0, 14.0])?;

    if !report.problem_rows.is_empty() {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Problem Rows")?;
        write_headers(sheet, &PROBLEM_HEADERS, &header)?;
        for (i, problem) in report.problem_rows.iter().enumerate() {
            let row = i as u32 + 1;
            sheet.write_number(row, 0, problem.line_number as f64)?;
            sheet.write_string(row, 1, &problem.order_id)?;
            sheet.write_string(row, 2, &problem.sku)?;
            sheet.write_string(row, 3, &problem.quantity)?;
            sheet.write_string(row, 4, &problem.fulfilled_at)?;
            sheet.write_string(row, 5, &problem.reason)?;
        }
        set_widths(sheet, &[8.0, 14.0, 20.0, 10.0, 24.0, 30.0])?;
    }

    Ok(workbook.save_to_buffer()?)
}

fn write_headers(sheet: &mut Worksheet, headers: &[&str], format: &Format) -> Result<()> {
    for (col, title) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, format)?;
    }
    Ok(())
}

fn set_widths(sheet: &mut Worksheet, widths: &[f64]) -> Result<()> {
    for (col, width) in widths.iter().enumerate() {
        sheet.set_column_width(col as u16, *width)?;
    }
    Ok(())
}
