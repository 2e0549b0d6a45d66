use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reelbase_cli::cli::Cli;
use reelbase_cli::config::CliConfig;

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    // Logs go to stderr so stdout carries only the JSON result.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reelbase=info,reelbase_cli=info,reelbase_core=info,reelbase_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = CliConfig::from_env().with_data_dir(cli.data_dir.clone());

    match reelbase_cli::run(cli, &config) {
        Ok(output) => match serde_json::to_string_pretty(&output) {
            Ok(text) => {
                println!("{text}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to render output");
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            tracing::error!("Command failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}
