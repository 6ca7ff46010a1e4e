// Copyright (c) 2024-2025 GraphAdmin Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Result formatting for the console

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use serde_json::Value;

use crate::record::Record;

/// Output format options
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Renders records in the selected output format
pub struct ResultFormatter;

impl ResultFormatter {
    pub fn format(records: &[Record], format: OutputFormat) -> String {
        match format {
            OutputFormat::Table => Self::format_table(records),
            OutputFormat::Json => Self::format_json(records),
            OutputFormat::Csv => Self::format_csv(records),
        }
    }

    fn format_table(records: &[Record]) -> String {
        if records.is_empty() {
            return "(no records)".to_string();
        }

        let columns = columns_of(records);
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(columns.clone());

        for record in records {
            table.add_row(
                columns
                    .iter()
                    .map(|column| record.get(column).map(cell_text).unwrap_or_default())
                    .collect::<Vec<_>>(),
            );
        }

        format!("{}\n{} record(s)", table, records.len())
    }

    fn format_json(records: &[Record]) -> String {
        let rows: Vec<Value> = records
            .iter()
            .map(|record| {
                Value::Object(
                    record
                        .columns()
                        .zip(record.values())
                        .map(|(column, value)| (column.to_string(), value.clone()))
                        .collect(),
                )
            })
            .collect();

        serde_json::to_string_pretty(&rows).unwrap_or_else(|e| format!("<unserializable: {}>", e))
    }

    fn format_csv(records: &[Record]) -> String {
        Self::write_csv(records).unwrap_or_else(|e| format!("<unwritable: {}>", e))
    }

    fn write_csv(records: &[Record]) -> Result<String, Box<dyn std::error::Error>> {
        let columns = columns_of(records);
        if columns.is_empty() {
            return Ok(String::new());
        }

        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        writer.write_record(&columns)?;
        for record in records {
            writer.write_record(
                columns
                    .iter()
                    .map(|column| record.get(column).map(cell_text).unwrap_or_default()),
            )?;
        }

        let bytes = writer.into_inner().map_err(|e| e.into_error())?;
        let text = String::from_utf8(bytes)?;
        Ok(text.trim_end_matches('\n').to_string())
    }
}

/// Union of column names in first-seen order
fn columns_of(records: &[Record]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for record in records {
        for column in record.columns() {
            if !columns.iter().any(|c| c == column) {
                columns.push(column.to_string());
            }
        }
    }
    columns
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
