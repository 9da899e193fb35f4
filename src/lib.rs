pub mod classify;
pub mod cli;
pub mod columns;
pub mod dashboard;
pub mod detect;
pub mod generate;
pub mod ingest;
pub mod io_utils;
pub mod layout;
pub mod preview;
pub mod schema;
pub mod semantics;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::{LevelFilter, debug};

use crate::cli::{Cli, Commands};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("dashgen", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Detect(args) => {
            debug!("detect: input {:?}", args.input);
            detect::execute(&args)
        }
        Commands::Columns(args) => columns::execute(&args),
        Commands::Preview(args) => preview::execute(&args),
        Commands::Generate(args) => generate::execute(&args),
    }
}
