//! Heartbeat Exporter Entry Point

use clap::Parser;
use heartbeat_exporter::cli::serve::{self, ServeArgs};
use heartbeat_exporter::cli::{check_config, Cli, Commands};
use heartbeat_exporter::logging;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::CheckConfig(args)) => match check_config::execute(&args) {
            Ok(summary) => print!("{}", summary),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        Some(Commands::Serve(args)) => {
            logging::init().expect("failed to initialize logging");
            run_server(args).await;
        }
        None => {
            // No subcommand - default to serve
            logging::init().expect("failed to initialize logging");
            run_server(ServeArgs::from_env()).await;
        }
    }
}

async fn run_server(args: ServeArgs) {
    if let Err(e) = serve::execute(&args).await {
        tracing::error!(error = %e, "Heartbeat exporter failed");
        std::process::exit(1);
    }
}
