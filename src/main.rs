//! memsync CLI - Entry point
//!
//! Usage: memsync [command] [options]

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use memsync::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing; stdout carries JSON-RPC frames, so log to stderr
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    match cli.command {
        None | Some(Commands::Serve) => memsync::cli::serve::run(config).await,
        Some(Commands::Read(args)) => memsync::cli::read::run(args, &config).await,
        Some(Commands::Search(args)) => memsync::cli::search::run(args, &config).await,
        Some(Commands::Config) => memsync::cli::config::run(&config),
    }
}
