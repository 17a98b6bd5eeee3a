use std::collections::BTreeSet;
use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde_json::Value;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

pub fn print_value(value: &Value, format: OutputFormat) {
    match format {
        OutputFormat::Json => println!("{value}"),
        OutputFormat::Pretty => println!(
            "{}",
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        ),
        OutputFormat::Table => println!("{}", render_table(value)),
    }
}

/// Objects render as KEY/VALUE rows, arrays of objects as one row per
/// element, anything else as a single cell. Feed responses render their
/// `feeds` (or `channels`) array when present.
pub fn render_table(value: &Value) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    match value {
        Value::Object(map) => {
            if let Some(rows) = ["feeds", "channels"]
                .iter()
                .find_map(|name| map.get(*name).and_then(Value::as_array))
            {
                fill_rows(&mut table, rows);
            } else {
                table.set_header(vec!["KEY", "VALUE"]);
                for (key, entry) in map {
                    table.add_row(vec![key.clone(), cell(entry)]);
                }
            }
        }
        Value::Array(rows) => fill_rows(&mut table, rows),
        other => {
            table.add_row(vec![cell(other)]);
        }
    }
    table
}

fn fill_rows(table: &mut Table, rows: &[Value]) {
    let columns: BTreeSet<&str> = rows
        .iter()
        .filter_map(Value::as_object)
        .flat_map(|row| row.keys().map(String::as_str))
        .collect();

    if columns.is_empty() {
        table.set_header(vec!["VALUE"]);
        for row in rows {
            table.add_row(vec![cell(row)]);
        }
        return;
    }

    table.set_header(columns.iter().map(|c| c.to_uppercase()).collect::<Vec<_>>());
    for row in rows {
        let cells: Vec<String> = columns
            .iter()
            .map(|column| row.get(*column).map(cell).unwrap_or_default())
            .collect();
        table.add_row(cells);
    }
}

fn cell(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
