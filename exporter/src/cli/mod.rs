//! CLI module for heartbeat-exporter
//!
//! Provides the command-line interface for serving probes and checking configuration.

pub mod check_config;
pub mod serve;

use clap::{Parser, Subcommand};

/// Heartbeat exporter - probe service liveness from Pushgateway heartbeats
#[derive(Parser, Debug)]
#[command(name = "heartbeat-exporter")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
    HEARTBEAT_EXPORTER_HOST       Bind address (default: 0.0.0.0)
    HEARTBEAT_EXPORTER_PORT       Listen port (default: 8000)
    HEARTBEAT_EXPORTER_CONFIG     Configuration file (default: /app/config.yml)
    CONFIG_PATH                   Deprecated alias of HEARTBEAT_EXPORTER_CONFIG
    HEARTBEAT_EXPORTER_LOG_LEVEL  Log filter (default: info, falls back to RUST_LOG)
"#)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the exporter server
    Serve(serve::ServeArgs),
    /// Validate the configuration file and exit
    CheckConfig(check_config::CheckConfigArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_none() {
        let cli = Cli::try_parse_from(["heartbeat-exporter"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_check_config() {
        let cli =
            Cli::try_parse_from(["heartbeat-exporter", "check-config", "--config", "/tmp/c.yml"])
                .unwrap();
        match cli.command {
            Some(Commands::CheckConfig(args)) => {
                assert_eq!(args.config.unwrap().to_str(), Some("/tmp/c.yml"))
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
