//! Source ingestion: turning raw CSV/JSON text into headers plus rows.
//!
//! This is the boundary where malformed input is reported. Everything past
//! it operates on a [`TableData`] value and cannot fail on input shape.

use std::{fmt, path::Path, str::FromStr};

use anyhow::{Context, Result, anyhow};
use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::io_utils;

/// Declared type of an uploaded source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Json,
    Xlsx,
    Xls,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFormat::Csv => "csv",
            SourceFormat::Json => "json",
            SourceFormat::Xlsx => "xlsx",
            SourceFormat::Xls => "xls",
        }
    }
}

impl FromStr for SourceFormat {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(SourceFormat::Csv),
            "json" => Ok(SourceFormat::Json),
            "xlsx" => Ok(SourceFormat::Xlsx),
            "xls" => Ok(SourceFormat::Xls),
            other => Err(anyhow!(
                "Unknown source format '{other}'. Supported formats: csv, json, xlsx, xls"
            )),
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors raised while turning raw text into tabular rows.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Input is empty")]
    EmptyInput,
    #[error("Input contains a header row but no data rows")]
    NoDataRows,
    #[error("JSON payload must be an array of objects or a single object, found {found}")]
    UnexpectedJsonShape { found: &'static str },
    #[error("Binary spreadsheet format '{format}' is not supported; export the sheet as CSV and retry")]
    UnsupportedFormat { format: SourceFormat },
    #[error("Malformed CSV input: {0}")]
    MalformedCsv(#[from] csv::Error),
}

/// Header row plus data rows, all cells as raw strings.
#[derive(Debug, Clone)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableData {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Raw values of one column across every row, padding short rows with
    /// empty strings so all columns have equal length.
    pub fn column_values(&self, index: usize) -> Vec<&str> {
        self.rows
            .iter()
            .map(|row| row.get(index).map(String::as_str).unwrap_or_default())
            .collect()
    }
}

/// Dispatches on the declared format. `xlsx`/`xls` are rejected up front
/// with a convert-to-CSV suggestion rather than attempting binary parsing.
pub fn parse_source(content: &str, format: SourceFormat, delimiter: Option<u8>) -> Result<TableData, SourceError> {
    match format {
        SourceFormat::Csv => parse_csv(content, delimiter),
        SourceFormat::Json => parse_json(content),
        SourceFormat::Xlsx | SourceFormat::Xls => Err(SourceError::UnsupportedFormat { format }),
    }
}

/// Quote-aware CSV parsing with sniffed or explicit delimiter. The first
/// record is always treated as the header row.
pub fn parse_csv(content: &str, delimiter: Option<u8>) -> Result<TableData, SourceError> {
    if content.trim().is_empty() {
        return Err(SourceError::EmptyInput);
    }
    let delimiter = io_utils::resolve_input_delimiter(content, delimiter);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()?
        .iter()
        .map(|field| field.trim().to_string())
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|field| field.to_string()).collect());
    }
    if rows.is_empty() {
        return Err(SourceError::NoDataRows);
    }
    Ok(TableData { headers, rows })
}

/// JSON ingestion: an array of objects, or a single object treated as a
/// one-row table. Keys of the first element define the header order.
pub fn parse_json(content: &str) -> Result<TableData, SourceError> {
    if content.trim().is_empty() {
        return Err(SourceError::EmptyInput);
    }
    let payload: JsonValue =
        serde_json::from_str(content).map_err(|_| SourceError::UnexpectedJsonShape {
            found: "invalid JSON",
        })?;

    let objects: Vec<&serde_json::Map<String, JsonValue>> = match &payload {
        JsonValue::Array(items) => {
            let mut objects = Vec::with_capacity(items.len());
            for item in items {
                match item.as_object() {
                    Some(map) => objects.push(map),
                    None => {
                        return Err(SourceError::UnexpectedJsonShape {
                            found: json_kind(item),
                        });
                    }
                }
            }
            objects
        }
        JsonValue::Object(map) => vec![map],
        other => {
            return Err(SourceError::UnexpectedJsonShape {
                found: json_kind(other),
            });
        }
    };

    let first = objects.first().ok_or(SourceError::NoDataRows)?;
    let headers = first.keys().cloned().collect::<Vec<_>>();
    let rows = objects
        .iter()
        .map(|object| {
            headers
                .iter()
                .map(|key| object.get(key).map(json_cell).unwrap_or_default())
                .collect()
        })
        .collect();
    Ok(TableData { headers, rows })
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "a nested array",
        JsonValue::Object(_) => "an object",
    }
}

/// Scalar JSON values render as their natural string form; nested values
/// are kept as compact JSON so no data is silently dropped.
fn json_cell(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s.clone(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Loads and parses a source file in one step, resolving the format from
/// the extension when not declared explicitly.
pub fn load_table(
    path: &Path,
    declared: Option<SourceFormat>,
    delimiter: Option<u8>,
    encoding: &'static encoding_rs::Encoding,
) -> Result<TableData> {
    let format = declared
        .or_else(|| SourceFormat::from_path(path))
        .unwrap_or(SourceFormat::Csv);
    let content = io_utils::read_source_text(path, encoding)?;
    parse_source(&content, format, delimiter)
        .with_context(|| format!("Parsing {format} input from {path:?}"))
}
