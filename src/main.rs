use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use madcost::api::{Cli, Commands, run_cli_estimate, run_http_server};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();

    match cli.command {
        Commands::Serve(args) => {
            if let Err(e) = run_http_server(args).await {
                tracing::error!("Server error: {e}");
                std::process::exit(1);
            }
        }
        Commands::Estimate(args) => {
            if let Err(e) = run_cli_estimate(args) {
                tracing::error!("{e}");
                std::process::exit(1);
            }
        }
    }
}
