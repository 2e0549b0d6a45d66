//! Command-line surface for a reelbase store.

pub mod cli;
pub mod commands;
pub mod config;

use anyhow::Context;
use reelbase_core::registry::Registry;
use reelbase_db::FileStore;
use serde_json::Value;

use cli::{Cli, Command};
use config::CliConfig;

/// Load the store, run one command against it and return the JSON output.
///
/// `clear` runs without loading, so a store with a corrupt collection can
/// still be reset.
pub fn run(cli: Cli, config: &CliConfig) -> anyhow::Result<Value> {
    let mut store = FileStore::open(&config.data_dir)
        .with_context(|| format!("cannot open store at {}", config.data_dir.display()))?;
    tracing::debug!(dir = %config.data_dir.display(), "Store opened");

    let mut registry = Registry::new();
    if matches!(cli.command, Command::Clear) {
        return commands::execute(cli.command, &mut store, &mut registry);
    }

    let report = reelbase_db::retrieve_all(&store, &mut registry)?;
    for skipped in &report.skipped {
        tracing::warn!(
            collection = skipped.collection,
            id = %skipped.id,
            reason = %skipped.reason,
            "Skipped stored record"
        );
    }

    commands::execute(cli.command, &mut store, &mut registry)
}
