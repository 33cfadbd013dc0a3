//! Output formatting helpers for human-readable and JSON output.

use sortable::{Row, SortableConfig, Value};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Print a table with aligned columns in human-readable format.
///
/// `headers` and each row in `rows` must have the same length.
pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    if rows.is_empty() {
        return;
    }

    // Calculate column widths (max of header and all row values)
    let col_count = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(col_count) {
            widths[i] = widths[i].max(cell.len());
        }
    }

    // Print header
    let header_line: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:<width$}", h, width = widths[i]))
        .collect();
    println!("{}", header_line.join("  ").trim_end());

    // Print rows
    for row in rows {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .take(col_count)
            .map(|(i, cell)| format!("{:<width$}", cell, width = widths[i]))
            .collect();
        println!("{}", line.join("  ").trim_end());
    }
}

/// Column order for listing rows: key, position, group columns, then every
/// other attribute by name.
pub fn row_columns(rows: &[Row], config: &SortableConfig, key_column: &str) -> Vec<String> {
    let mut columns = vec![key_column.to_string(), config.column.clone()];
    columns.extend(config.group_columns().iter().cloned());
    let mut rest: Vec<String> = rows
        .iter()
        .flat_map(|row| row.attributes().keys())
        .filter(|name| !columns.contains(name))
        .cloned()
        .collect();
    rest.sort();
    rest.dedup();
    columns.extend(rest);
    columns
}

/// Render one cell; missing and null attributes print as `-`.
pub fn cell(row: &Row, column: &str) -> String {
    match row.get(column) {
        None | Some(Value::Null) => "-".to_string(),
        Some(value) => value.to_string(),
    }
}

/// Print rows in the requested format.
pub fn print_rows(
    rows: &[Row],
    config: &SortableConfig,
    key_column: &str,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Human => {
            if rows.is_empty() {
                println!("No rows found.");
                return Ok(());
            }
            let columns = row_columns(rows, config, key_column);
            let headers: Vec<String> = columns.iter().map(|c| c.to_uppercase()).collect();
            let headers: Vec<&str> = headers.iter().map(String::as_str).collect();
            let cells: Vec<Vec<String>> = rows
                .iter()
                .map(|row| columns.iter().map(|column| cell(row, column)).collect())
                .collect();
            print_table(&headers, &cells);
        }
        OutputFormat::Json => {
            let entries: Vec<_> = rows.iter().map(Row::attributes).collect();
            println!("{}", serde_json::to_string(&entries)?);
        }
    }
    Ok(())
}

/// Print a single row in the requested format.
pub fn print_row(
    row: &Row,
    config: &SortableConfig,
    key_column: &str,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Human => {
            for column in row_columns(std::slice::from_ref(row), config, key_column) {
                println!("{:<12} {}", format!("{column}:"), cell(row, &column));
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string(row.attributes())?),
    }
    Ok(())
}
