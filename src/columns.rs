//! Column listing from a saved schema file.
//!
//! Reads a schema YAML file and renders its column names, types, and roles
//! as an ASCII table.

use anyhow::{Context, Result};
use log::info;

use crate::{cli::ColumnsArgs, schema::DetectedSchema, table};

pub fn execute(args: &ColumnsArgs) -> Result<()> {
    let schema = DetectedSchema::load(&args.schema)
        .with_context(|| format!("Loading schema from {schema:?}", schema = args.schema))?;

    if schema.columns.is_empty() {
        info!("Schema {:?} does not define any columns", args.schema);
        return Ok(());
    }

    let mut rows = Vec::with_capacity(schema.columns.len());
    for (idx, column) in schema.columns.iter().enumerate() {
        let mut flags = Vec::new();
        if column.is_measure {
            flags.push("measure");
        }
        if column.is_dimension {
            flags.push("dimension");
        }
        if column.is_primary_date {
            flags.push("primary date");
        }
        rows.push(vec![
            (idx + 1).to_string(),
            column.name.clone(),
            column.display_name.clone(),
            column.data_type.to_string(),
            flags.join(", "),
        ]);
    }

    let headers = vec![
        "#".to_string(),
        "name".to_string(),
        "display".to_string(),
        "type".to_string(),
        "flags".to_string(),
    ];
    table::print_table(&headers, &rows);
    info!(
        "Listed {} column(s) from {:?}",
        schema.columns.len(),
        args.schema
    );
    Ok(())
}
