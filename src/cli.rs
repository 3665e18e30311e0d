//! CLI definitions for modhost.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// modhost CLI.
#[derive(Parser)]
#[command(name = "modhost")]
#[command(about = "Module lifecycle host")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(
        short,
        long,
        env = "MODHOST_CONFIG",
        default_value = "config/modhost.toml",
        global = true
    )]
    pub config: PathBuf,

    /// Root every host path under this directory, overriding `[paths]`
    #[arg(short, long, global = true)]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Run the host in foreground (default)
    Run {
        /// Tenant to mount once the host is running (repeatable)
        #[arg(long = "tenant", value_name = "ID")]
        tenants: Vec<String>,
    },

    /// List the skills exposed by the loaded modules
    Skills {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Validate the configuration file
    CheckConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Table,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_with_tenants() {
        let cli = Cli::parse_from(["modhost", "run", "--tenant", "acme", "--tenant", "globex"]);
        match cli.command {
            Some(Commands::Run { tenants }) => assert_eq!(tenants, vec!["acme", "globex"]),
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_default_command_is_none() {
        let cli = Cli::parse_from(["modhost", "--root", "/srv/modhost"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.root, Some(PathBuf::from("/srv/modhost")));
    }

    #[test]
    fn test_skills_format() {
        let cli = Cli::parse_from(["modhost", "skills", "--format", "json"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Skills {
                format: OutputFormat::Json
            })
        ));
    }

    #[test]
    fn test_check_config() {
        let cli = Cli::parse_from(["modhost", "-c", "other.toml", "check-config"]);
        assert!(matches!(cli.command, Some(Commands::CheckConfig)));
        assert_eq!(cli.config, PathBuf::from("other.toml"));
    }
}
