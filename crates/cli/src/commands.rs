//! Subcommand implementations.

use crate::logging::{format_error, format_progress, format_step, format_success, format_warning};
use color_eyre::Result;
use colored::Colorize;
use pt_core::channel::{LocalChannel, PushChannel};
use pt_core::config::loader::CONFIG_DIR;
use pt_core::config::models::AppConfig;
use pt_core::scenario::{find_scenario, ScenarioPlayer};
use pt_core::tracker::PipelineTracker;
use pt_protocol::ScenarioStep;
use std::path::Path;
use std::sync::Arc;

/// Print every configured scenario.
pub fn list(root: &Path, config: &AppConfig) {
    if config.scenarios.is_empty() {
        println!(
            "No scenarios configured in {}",
            root.join(CONFIG_DIR).join("scenarios").display()
        );
        return;
    }

    for scenario in &config.scenarios {
        println!(
            "{}  game {}  {} steps",
            scenario.name.bold(),
            scenario.game_id,
            scenario.steps.len()
        );
        if !scenario.description.is_empty() {
            println!("    {}", scenario.description.dimmed());
        }
    }
}

/// Replay one scenario, printing each progress change as it happens.
pub async fn replay(config: &AppConfig, name: &str) -> Result<()> {
    let scenario = find_scenario(config, name)?;
    let tracker_config = &config.global.tracker;

    let channel = Arc::new(LocalChannel::with_topic(tracker_config.topic.as_str()));
    let tracker = PipelineTracker::new(
        scenario.game_id,
        Arc::clone(&channel) as Arc<dyn PushChannel>,
        tracker_config.clone(),
    );
    tracker.activate();

    println!(
        "Replaying {} for game {}",
        scenario.name.bold(),
        scenario.game_id
    );

    let total = scenario.steps.len();
    let mut last = tracker.progress();
    println!("{}", format_step(0, total, &format_progress(&last)));

    let player = ScenarioPlayer::new(Arc::clone(&channel));
    for (index, step) in scenario.steps.iter().enumerate() {
        player.apply(scenario.game_id, step).await;

        let progress = tracker.progress();
        if progress != last {
            println!("{}", format_step(index + 1, total, &format_progress(&progress)));
            last = progress;
        } else if matches!(step, ScenarioStep::Close) {
            let state = if channel.is_connected() {
                "connection closed, reconnected"
            } else {
                "connection closed, still down"
            };
            println!("{}", format_step(index + 1, total, &state.yellow().to_string()));
        }
    }

    let summary = format_progress(&last);
    match tracker.stage() {
        Some(stage) if stage.is_failure() => println!("{}", format_error(&summary)),
        Some(stage) if stage.is_terminal() => println!("{}", format_success(&summary)),
        _ => println!("{}", format_warning(&format!("Stalled at {summary}"))),
    }

    Ok(())
}
