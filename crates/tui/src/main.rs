//! Main entry point for the pt-tui binary.
//!
//! Loads `.pushtrack/` from the current directory and opens the dashboard.

use anyhow::Result;
use pt_core::config::loader::load_config;
use pt_tui::run_app;

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config(&std::env::current_dir()?).await?;
    run_app(config).await
}
