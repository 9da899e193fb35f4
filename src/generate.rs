//! `generate` command: schema (or raw data) in, dashboard JSON out.

use std::{fs::File, io::BufWriter};

use anyhow::{Context, Result, bail};
use log::info;

use crate::{
    cli::GenerateArgs,
    dashboard::GeneratedDashboard,
    ingest::{self, SourceFormat},
    io_utils,
    layout::{self, GeneratorOptions},
    schema::{self, DetectedSchema},
};

pub fn execute(args: &GenerateArgs) -> Result<()> {
    let detected = resolve_schema(args)?;

    let mut options = GeneratorOptions::new(args.dataset_id.clone(), args.template);
    if let Some(name) = &args.date_column {
        if detected.column(name).is_none() {
            bail!("Date column '{name}' does not exist in the schema");
        }
        options.primary_date_column = Some(name.clone());
    }

    let dashboard = layout::generate(&detected, &options);
    write_dashboard(args, &dashboard)?;
    info!(
        "Generated '{}' with {} widget(s) in {} section(s) using the {} template",
        dashboard.name,
        dashboard.widgets.len(),
        dashboard.sections.len(),
        args.template
    );
    Ok(())
}

fn resolve_schema(args: &GenerateArgs) -> Result<DetectedSchema> {
    match (&args.schema, &args.input) {
        (Some(path), _) => DetectedSchema::load(path)
            .with_context(|| format!("Loading schema from {path:?}")),
        (None, Some(input)) => {
            let declared = args
                .format
                .as_deref()
                .map(str::parse::<SourceFormat>)
                .transpose()?;
            let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
            let table = ingest::load_table(input, declared, args.delimiter, encoding)?;
            Ok(schema::build_schema(&table))
        }
        (None, None) => bail!("Either --input or --schema is required"),
    }
}

fn write_dashboard(args: &GenerateArgs, dashboard: &GeneratedDashboard) -> Result<()> {
    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Creating dashboard file {path:?}"))?;
            serde_json::to_writer_pretty(BufWriter::new(file), dashboard)
                .context("Writing dashboard JSON")?;
        }
        None => {
            let json =
                serde_json::to_string_pretty(dashboard).context("Serializing dashboard JSON")?;
            println!("{json}");
        }
    }
    Ok(())
}
