//! `memsync search` command
//!
//! Case-insensitive substring search over entity name, type and observations.
//!
//! # Usage
//! ```bash
//! memsync search redis
//! memsync search "in-memory" --format json
//! ```

use anyhow::Result;
use clap::Args;

use super::read::print_entity;
use super::{open_dispatcher, OutputFormat};
use crate::config::Config;
use crate::core::graph::SearchResult;
use crate::mcp::Operation;

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Substring to look for
    pub query: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    pub format: OutputFormat,
}

pub async fn run(args: SearchArgs, config: &Config) -> Result<()> {
    let dispatcher = open_dispatcher(config)?;
    let payload = dispatcher
        .dispatch(Operation::SearchNodes(args.query))
        .await?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&payload)?),
        OutputFormat::Pretty => {
            let result: SearchResult = serde_json::from_value(payload)?;
            if result.entities.is_empty() {
                println!("No results found.");
                return Ok(());
            }
            println!("Found {} entit(y/ies):\n", result.entities.len());
            for entity in &result.entities {
                print_entity(entity);
            }
        }
    }

    Ok(())
}
