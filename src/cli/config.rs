//! `memsync config` command
//!
//! Prints the configuration after file, environment and flag overrides.

use anyhow::Result;

use crate::config::Config;

pub fn run(config: &Config) -> Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}
