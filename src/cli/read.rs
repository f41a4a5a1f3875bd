//! `memsync read` command
//!
//! Prints the whole graph, loaded the same way the `read_graph` tool does.
//!
//! # Usage
//! ```bash
//! memsync read
//! memsync read --format json
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::{open_dispatcher, OutputFormat};
use crate::config::Config;
use crate::core::graph::{Entity, Graph, Relation};
use crate::mcp::Operation;

#[derive(Args, Debug)]
pub struct ReadArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    pub format: OutputFormat,
}

pub async fn run(args: ReadArgs, config: &Config) -> Result<()> {
    let dispatcher = open_dispatcher(config)?;
    let payload = dispatcher.dispatch(Operation::ReadGraph).await?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&payload)?),
        OutputFormat::Pretty => {
            let graph: Graph = serde_json::from_value(payload)?;
            print_pretty(&graph);
        }
    }

    Ok(())
}

fn print_pretty(graph: &Graph) {
    if graph.entities.is_empty() && graph.relations.is_empty() {
        println!("Graph is empty.");
        return;
    }

    println!("{}", format!("Entities ({})", graph.entities.len()).bold());
    for entity in &graph.entities {
        print_entity(entity);
    }

    println!();
    println!("{}", format!("Relations ({})", graph.relations.len()).bold());
    for relation in &graph.relations {
        print_relation(relation);
    }
}

pub(crate) fn print_entity(entity: &Entity) {
    println!(
        "  {} {}",
        entity.name.cyan().bold(),
        format!("[{}]", entity.entity_type).dimmed()
    );
    for obs in &entity.observations {
        println!("    - {}", obs);
    }
}

fn print_relation(relation: &Relation) {
    println!(
        "  {} {} {}",
        relation.from.cyan(),
        format!("--{}-->", relation.relation_type).dimmed(),
        relation.to.cyan()
    );
}
