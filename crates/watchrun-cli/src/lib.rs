//! watchrun CLI library
//!
//! Argument parsing and logging setup for the `watchrun` binary. The watch
//! engine itself lives in `watchrun-watch`.

pub mod cli;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;
use watchrun_watch::{ShellExecutor, WatchConfig};

/// Install the global subscriber. `RUST_LOG` overrides `default_level`.
pub fn init_logging(default_level: LevelFilter) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Watch until the session fails or the process receives Ctrl-C.
pub async fn run(config: WatchConfig) -> Result<()> {
    tokio::select! {
        result = watchrun_watch::run(config, ShellExecutor::new()) => {
            result.context("watch session failed")
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for shutdown signal")?;
            info!("Received interrupt, shutting down");
            Ok(())
        }
    }
}
