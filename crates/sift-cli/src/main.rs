//! Sift CLI - Extract structured records from unstructured text.

use clap::Parser;
use sift_cli::commands;
use sift_cli::{Cli, CliFormat, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Log to stderr; stdout carries the extracted record
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sift=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Returns whether the command produced its result.
async fn run() -> sift_cli::Result<bool> {
    let cli = Cli::parse();

    let path = Config::resolve_path(cli.config.as_deref())?;
    let config = Config::load(&path)?;

    let color_enabled = !cli.no_color && config.settings.color;

    match cli.command {
        Command::Extract(args) => {
            let formatter = Formatter::new(args.format, color_enabled);
            commands::execute_extract(args, &config, &formatter).await
        }
        Command::Schema(args) => {
            commands::execute_schema(args)?;
            Ok(true)
        }
        Command::Config(args) => {
            let formatter = Formatter::new(CliFormat::Pretty, color_enabled);
            commands::execute_config(args, &config, &path, &formatter)?;
            Ok(true)
        }
    }
}
