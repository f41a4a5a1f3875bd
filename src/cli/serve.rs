//! `memsync serve` command
//!
//! Runs the MCP server on stdin/stdout until stdin closes.

use anyhow::Result;

use crate::config::Config;

pub async fn run(config: Config) -> Result<()> {
    crate::mcp::run_mcp_server(config).await
}
