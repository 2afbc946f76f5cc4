//! AgentDev CLI entry point.

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use agentdev_cli::cli::Cli;
use agentdev_cli::commands;

#[tokio::main]
async fn main() {
    // Load .env.local or .env if present (AGENTDEV_* settings)
    let _ = dotenvy::from_filename(".env.local").or_else(|_| dotenvy::dotenv());

    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level().to_string()));

    // Logs go to stderr so table and JSON output stay clean on stdout.
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = commands::execute(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
