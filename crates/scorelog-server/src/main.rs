//! scorelog CLI
//!
//! Runs the report service or inspects stored partitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "scorelog")]
#[command(about = "scorelog - month-partitioned score reports", long_about = None)]
struct Cli {
    /// Config file (TOML/JSON/YAML); defaults to ./scorelog.* if present
    #[arg(short, long, global = true, env = "SCORELOG_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Serve the HTTP API
    Serve(commands::serve::ServeArgs),
    /// Print one month's reports as JSON
    Reports(commands::reports::ReportsArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve(args) => commands::serve::execute(cli.config.as_deref(), args),
        Commands::Reports(args) => commands::reports::execute(cli.config.as_deref(), args),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
