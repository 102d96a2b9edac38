//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use newsbee_core::config::Config;

mod commands;

#[derive(Parser)]
#[command(name = "newsbee")]
#[command(version)]
#[command(about = "NewsBee - terminal news reader")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config = Config::load().context("load config")?;

    // default to the interactive reader
    let Some(command) = cli.command else {
        let _log_guard = crate::logging::init()?;
        tracing::info!("starting interactive reader");
        return newsbee_tui::run_app(&config).await;
    };

    match command {
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        },
    }
}
