//! Sourcechunk CLI
//!
//! Chunk a source repository into deduplicated, token-bounded units.

use anyhow::Result;
use clap::Parser;
use sourcechunk_core::error::exit_codes;
use sourcechunk_core::SourceChunkError;

mod app;
mod commands;
mod progress;

use app::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let result = match cli.command {
        Commands::Chunk(args) => commands::chunk::run(args, cli.config, cli.format).await,
        Commands::Inspect(args) => commands::inspect::run(args, cli.format).await,
        Commands::Languages => commands::languages::run(cli.format).await,
    };

    if let Err(e) = result {
        let code = e
            .downcast_ref::<SourceChunkError>()
            .map(|e| e.exit_code())
            .unwrap_or(exit_codes::GENERAL_ERROR);
        eprintln!("Error: {:#}", e);
        std::process::exit(code);
    }
    Ok(())
}
