use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::dashboard::Template;

#[derive(Debug, Parser)]
#[command(author, version, about = "Infer tabular schemas and generate dashboard layouts", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Detect a dashboard-oriented schema from a CSV/JSON file
    Detect(DetectArgs),
    /// List the columns of a saved schema file
    Columns(ColumnsArgs),
    /// Preview the first few rows of a data file in a formatted table
    Preview(PreviewArgs),
    /// Generate a dashboard layout from a data file or saved schema
    Generate(GenerateArgs),
}

#[derive(Debug, Args)]
pub struct DetectArgs {
    /// Input data file to inspect ('-' for stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Destination schema file path (prints to stdout if omitted)
    #[arg(short, long)]
    pub schema: Option<PathBuf>,
    /// Declared source format (csv, json, xlsx, xls); inferred from the extension by default
    #[arg(short = 'f', long = "format")]
    pub format: Option<String>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|'); sniffed from the header by default
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct ColumnsArgs {
    /// Schema file produced by `detect`
    #[arg(short, long)]
    pub schema: PathBuf,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Input data file to preview ('-' for stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Number of rows to display
    #[arg(short = 'n', long, default_value_t = 10)]
    pub rows: usize,
    /// Declared source format (csv, json); inferred from the extension by default
    #[arg(short = 'f', long = "format")]
    pub format: Option<String>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Input data file to generate from ('-' for stdin)
    #[arg(short = 'i', long = "input", conflicts_with = "schema")]
    pub input: Option<PathBuf>,
    /// Saved schema file to generate from instead of raw data
    #[arg(short, long)]
    pub schema: Option<PathBuf>,
    /// Output dashboard JSON path (prints to stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Generation template
    #[arg(short, long, value_enum, default_value_t = Template::Auto)]
    pub template: Template,
    /// Opaque dataset reference recorded in the generated dashboard
    #[arg(long = "dataset-id", default_value = "dataset-local")]
    pub dataset_id: String,
    /// Overrides the primary date column used for trend widgets
    #[arg(long = "date-column")]
    pub date_column: Option<String>,
    /// Declared source format for --input (csv, json)
    #[arg(short = 'f', long = "format")]
    pub format: Option<String>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "," => Ok(b','),
        ";" => Ok(b';'),
        "|" => Ok(b'|'),
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        other => Err(format!(
            "Unsupported delimiter '{other}'. Use ',', ';', '|', or 'tab'"
        )),
    }
}
