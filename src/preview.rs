use anyhow::Result;
use log::info;

use crate::{
    cli::PreviewArgs,
    ingest::{self, SourceFormat},
    io_utils, table,
};

pub fn execute(args: &PreviewArgs) -> Result<()> {
    let declared = args
        .format
        .as_deref()
        .map(str::parse::<SourceFormat>)
        .transpose()?;
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let table_data = ingest::load_table(&args.input, declared, args.delimiter, encoding)?;

    let rows = table_data
        .rows
        .iter()
        .take(args.rows)
        .cloned()
        .collect::<Vec<_>>();
    table::print_table(&table_data.headers, &rows);
    info!("Displayed {} row(s) from {:?}", rows.len(), args.input);
    Ok(())
}
