use anyhow::Result;
use clap::Parser;

use watchrun_cli::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    watchrun_cli::init_logging(cli.level_filter());

    watchrun_cli::run(cli.into_config()).await
}
