//! Flowwright CLI - turn a goal into a bot-builder workflow and chat about it

mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

pub use error::CliError;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stderr keeps stdout clean for `--output json`
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run_command_async(cli))
}

async fn run_command_async(cli: Cli) -> anyhow::Result<()> {
    let format = cli.output.unwrap_or_default();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Generate { goal } => {
            commands::generate::run(config, goal.join(" "), format).await?;
        }
        Commands::Chat { goal } => {
            let goal = (!goal.is_empty()).then(|| goal.join(" "));
            commands::chat::run(config, goal, format).await?;
        }
        Commands::Copy { file, step } => {
            commands::copy::run(&file, step)?;
        }
    }

    Ok(())
}
