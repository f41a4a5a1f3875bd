//! CLI module - Command definitions and handlers

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use crate::config::Config;
use crate::core::persistence::PersistenceManager;
use crate::mcp::Dispatcher;

pub mod config;
pub mod read;
pub mod search;
pub mod serve;

/// memsync - knowledge graph memory synced to object storage
///
/// Without a subcommand, runs the MCP server on stdin/stdout.
#[derive(Parser, Debug)]
#[command(name = "memsync")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file path (TOML)
    #[arg(short, long, global = true, env = "MEMSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Object store prefix the object name is appended to (overrides ORACLE_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Local cache file (overrides MEMORY_FILE_PATH)
    #[arg(long, global = true)]
    pub local_path: Option<PathBuf>,

    /// Object store request timeout in seconds
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the MCP server over stdio (default)
    Serve,

    /// Print the whole graph
    Read(read::ReadArgs),

    /// Search entities by name, type or observation
    Search(search::SearchArgs),

    /// Show the effective configuration
    Config,
}

/// Output format for one-shot commands
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

impl Cli {
    /// Defaults, then config file, then environment, then flags
    pub fn resolve_config(&self) -> Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;

        if let Some(base_url) = &self.base_url {
            config.remote.base_url = base_url.clone();
        }
        if let Some(path) = &self.local_path {
            config.local.path = path.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.remote.timeout_secs = secs;
        }

        Ok(config)
    }
}

/// Dispatcher for one-shot commands
pub(crate) fn open_dispatcher(config: &Config) -> Result<Dispatcher> {
    let persistence =
        PersistenceManager::from_config(config).context("Failed to set up storage")?;
    Ok(Dispatcher::new(persistence))
}
