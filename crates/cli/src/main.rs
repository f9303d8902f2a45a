mod commands;
mod logging;

use clap::{Parser, Subcommand};
use pt_core::config::loader::load_config;
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser)]
#[command(name = "pushtrack")]
#[command(about = "Follow test pipelines through push notifications")]
#[command(version)]
struct Cli {
    #[arg(long, global = true, default_value = ".", help = "Project root containing .pushtrack/")]
    root: PathBuf,
    #[arg(long, short, global = true, help = "Log debug output to stderr")]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "List configured scenarios")]
    List,
    #[command(about = "Replay a scenario and print its progress")]
    Replay {
        #[arg(help = "Scenario name")]
        name: String,
    },
    #[command(about = "Open the progress dashboard")]
    Tui,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    // When `pushtrack` is called without a subcommand, launch the TUI
    let command = cli.command.unwrap_or(Commands::Tui);

    // The dashboard owns the terminal, so it gets no log output
    if !matches!(command, Commands::Tui) {
        logging::init_logger(cli.verbose);
    }

    let config = load_config(&cli.root).await?;
    debug!(root = %cli.root.display(), scenarios = config.scenarios.len(), "configuration ready");

    match command {
        Commands::List => commands::list(&cli.root, &config),
        Commands::Replay { name } => commands::replay(&config, &name).await?,
        Commands::Tui => pt_tui::run_app(config)
            .await
            .map_err(|e| color_eyre::eyre::eyre!(e))?,
    }

    Ok(())
}
