//! modhost - module lifecycle host
//!
//! Main entry point for the modhost CLI.

mod cli;
mod cmd_skill;
mod host;
mod register;

use clap::Parser;

use modhost_config::{ConfigLoader, PathsConfig};

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = ConfigLoader::load_or_default(&cli.config)?;
    if let Some(root) = &cli.root {
        config.paths = PathsConfig::rooted_at(root);
    }

    host::init_tracing(&config)?;

    match cli.command {
        None => host::run_host(&config, &[]).await,
        Some(Commands::Run { tenants }) => host::run_host(&config, &tenants).await,
        Some(Commands::Skills { format }) => cmd_skill::list_skills(&config, format).await,
        Some(Commands::CheckConfig) => host::check_config(&config),
    }
}
