//! `detect` command: infer a schema from a data file and persist it.

use anyhow::{Context, Result};
use log::info;

use crate::{
    cli::DetectArgs,
    ingest::{self, SourceFormat},
    io_utils,
    schema::{self, DetectedSchema},
    table,
};

pub fn execute(args: &DetectArgs) -> Result<()> {
    let declared = args
        .format
        .as_deref()
        .map(str::parse::<SourceFormat>)
        .transpose()?;
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let table_data = ingest::load_table(&args.input, declared, args.delimiter, encoding)?;
    let detected = schema::build_schema(&table_data);

    print_summary(&detected);

    match &args.schema {
        Some(path) => {
            detected
                .save(path)
                .with_context(|| format!("Writing schema to {path:?}"))?;
            info!(
                "Detected {} column(s) over {} row(s); schema written to {path:?}",
                detected.columns.len(),
                detected.row_count,
            );
        }
        None => {
            let yaml = serde_yaml::to_string(&detected).context("Serializing schema YAML")?;
            print!("{yaml}");
        }
    }
    Ok(())
}

fn print_summary(schema: &DetectedSchema) {
    let headers = vec![
        "#".to_string(),
        "name".to_string(),
        "type".to_string(),
        "role".to_string(),
        "null %".to_string(),
        "distinct".to_string(),
        "sample".to_string(),
    ];
    let rows = schema
        .columns
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            let role = if column.is_measure {
                "measure"
            } else if column.is_primary_date {
                "primary date"
            } else if column.is_dimension {
                "dimension"
            } else {
                ""
            };
            vec![
                (idx + 1).to_string(),
                column.name.clone(),
                column.data_type.to_string(),
                role.to_string(),
                format!("{:.0}", column.null_ratio * 100.0),
                column.cardinality.to_string(),
                column
                    .sample_values
                    .first()
                    .cloned()
                    .unwrap_or_default(),
            ]
        })
        .collect::<Vec<_>>();
    table::print_table(&headers, &rows);
}
