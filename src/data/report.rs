use std::path::Path;

use arrow::util::pretty::pretty_format_batches;

use super::cache::to_record_batch;
use super::model::{CellValue, Column, Table};
use crate::error::Result;

/// Shown in place of a table when a filter matched nothing.
pub const NO_MATCHING_ROWS: &str = "No rows match the selected filters.";

/// Shown in place of a pivot when every row lacked an index or columns value.
pub const NO_PIVOT_ROWS: &str = "No rows have both an index and a columns value.";

/// Render a table as an ASCII grid. Cells use their textual form.
/// An empty table renders as `empty_message`.
pub fn render_text(table: &Table, empty_message: &str) -> Result<String> {
    if table.is_empty() {
        return Ok(empty_message.to_string());
    }
    let text_only = Table::new(
        table
            .columns()
            .iter()
            .map(|c| {
                Column::new(
                    c.name.clone(),
                    c.values
                        .iter()
                        .map(|v| CellValue::Text(v.to_string()))
                        .collect(),
                )
            })
            .collect(),
    )?;
    let batch = to_record_batch(&text_only)?;
    Ok(pretty_format_batches(&[batch])?.to_string())
}

/// Write a table to CSV with a header row.
pub fn export_csv(table: &Table, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(table.column_names())?;
    for row in 0..table.len() {
        writer.write_record(table.row(row).iter().map(|v| v.to_string()))?;
    }
    writer.flush()?;
    log::info!("Exported {} rows to {}", table.len(), path.display());
    Ok(())
}
