//! TUI application state and event loop.
//!
//! This module defines the main `App` struct: a board of trackers on one
//! local push channel, fed by scenario replays running in the background,
//! and rendered as a list of gauges.

use anyhow::Result;
use crossterm::event::KeyEvent;
use pt_core::board::ProgressBoard;
use pt_core::channel::{LocalChannel, PushChannel};
use pt_core::config::models::AppConfig;
use pt_core::scenario::ScenarioPlayer;
use pt_protocol::{ProgressState, Scenario};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::select;
use tokio::sync::watch;
use tokio_stream::StreamExt;

use crate::event_handler;
use crate::tui::{Tui, TuiEvent};
use crate::widgets::gauges::{render_gauges, GaugeRow};

/// How often progress receivers are polled for changes.
const REFRESH_INTERVAL: Duration = Duration::from_millis(100);

/// Pause between scenario steps so progress is visible.
const STEP_DELAY: Duration = Duration::from_millis(800);

struct TrackedRow {
    title: String,
    rx: watch::Receiver<ProgressState>,
}

/// Main TUI application state.
pub struct App {
    /// Push channel shared by all trackers.
    channel: Arc<LocalChannel>,
    /// Keeps the trackers alive while the app runs.
    board: ProgressBoard,
    rows: Vec<TrackedRow>,
    /// Index of the currently selected gauge.
    pub selected_index: usize,
    /// Flag to indicate if the application should exit.
    pub should_exit: bool,
}

impl App {
    /// Create an app tracking every scenario's game.
    pub fn new(config: &AppConfig) -> Self {
        let channel = Arc::new(LocalChannel::with_topic(
            config.global.tracker.topic.as_str(),
        ));
        let board = ProgressBoard::new(
            Arc::clone(&channel) as Arc<dyn PushChannel>,
            config.global.tracker.clone(),
        );

        let rows = config
            .scenarios
            .iter()
            .map(|scenario| TrackedRow {
                title: format!("game {} · {}", scenario.game_id, scenario.name),
                rx: board.track(scenario.game_id),
            })
            .collect();

        Self {
            channel,
            board,
            rows,
            selected_index: 0,
            should_exit: false,
        }
    }

    /// Replay every scenario in the background.
    pub fn spawn_scenarios(&self, scenarios: &[Scenario]) {
        for scenario in scenarios.iter().cloned() {
            let player =
                ScenarioPlayer::new(Arc::clone(&self.channel)).with_step_delay(STEP_DELAY);
            tokio::spawn(async move {
                player.play(&scenario).await;
            });
        }
    }

    /// Main event loop.
    ///
    /// Uses `tokio::select!` to handle keyboard input and progress changes.
    pub async fn run(&mut self, tui: &mut Tui) -> Result<()> {
        let mut tui_events = tui.event_stream();
        let mut refresh = tokio::time::interval(REFRESH_INTERVAL);

        tui.draw(|frame| self.render(frame))?;

        while !self.should_exit {
            select! {
                Some(event) = tui_events.next() => {
                    if let TuiEvent::Key(key_event) = event {
                        self.handle_key_event(key_event);
                    }
                    tui.draw(|frame| self.render(frame))?;
                }
                _ = refresh.tick() => {
                    if self.take_changes() {
                        tui.draw(|frame| self.render(frame))?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Mark every receiver as seen; returns whether any changed.
    fn take_changes(&mut self) -> bool {
        let mut changed = false;
        for row in &mut self.rows {
            if row.rx.has_changed().unwrap_or(false) {
                row.rx.borrow_and_update();
                changed = true;
            }
        }
        changed
    }

    /// Handle keyboard events.
    fn handle_key_event(&mut self, key_event: KeyEvent) {
        self.should_exit = event_handler::handle_keyboard_event(
            key_event,
            &mut self.selected_index,
            self.rows.len(),
            &self.channel,
        );
    }

    /// Render the TUI.
    fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(3)])
            .split(frame.area());

        let gauges: Vec<GaugeRow> = self
            .rows
            .iter()
            .map(|row| GaugeRow {
                title: row.title.clone(),
                progress: row.rx.borrow().clone(),
            })
            .collect();

        render_gauges(frame, chunks[0], &gauges, self.selected_index);
        self.render_status(frame, chunks[1]);
    }

    /// Render the connection status line.
    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let (status, color) = if self.channel.is_connected() {
            ("connected", Color::Green)
        } else {
            ("disconnected", Color::Red)
        };
        let finished = if self.board.all_finished() { " · all finished" } else { "" };

        let text = format!("push channel {status}{finished}  |  x close  f fail reconnect  q quit");
        let paragraph = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title("Status"))
            .style(Style::default().fg(color));
        frame.render_widget(paragraph, area);
    }
}

/// Run the dashboard until the user quits.
pub async fn run_app(config: AppConfig) -> Result<()> {
    let mut app = App::new(&config);
    app.spawn_scenarios(&config.scenarios);

    let mut tui = Tui::init()?;
    let result = app.run(&mut tui).await;
    tui.restore()?;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;
    use pt_protocol::{CorrelationId, LifecycleEvent, PushMessage, ScenarioStep};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn config_with_games(ids: &[u64]) -> AppConfig {
        AppConfig {
            scenarios: ids
                .iter()
                .map(|id| Scenario {
                    name: format!("scenario-{id}"),
                    game_id: CorrelationId(*id),
                    description: String::new(),
                    steps: vec![ScenarioStep::Event(LifecycleEvent::Submitted)],
                })
                .collect(),
            ..AppConfig::default()
        }
    }

    fn rendered(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(90, 16)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_app_renders_tracked_games() {
        let app = App::new(&config_with_games(&[1, 2]));

        let content = rendered(&app);
        assert!(content.contains("Test Progress"));
        assert!(content.contains("scenario-1"));
        assert!(content.contains("16% Submitting Test"));
        assert!(content.contains("push channel connected"));
    }

    #[test]
    fn test_app_reflects_pushed_events() {
        let mut app = App::new(&config_with_games(&[7]));
        assert!(!app.take_changes());

        app.channel
            .deliver(PushMessage::new(7, LifecycleEvent::Submitted));

        assert!(app.take_changes());
        assert!(!app.take_changes());
        assert!(rendered(&app).contains("33% Validating Test"));
    }

    #[test]
    fn test_app_close_key_repairs_connection() {
        let mut app = App::new(&config_with_games(&[7]));

        app.handle_key_event(KeyEvent::from(KeyCode::Char('x')));

        // The tracker reconnected the channel from its close handler.
        assert!(app.channel.is_connected());
        assert_eq!(app.channel.stats().reconnect_calls, 1);
        assert!(!app.should_exit);
    }

    #[test]
    fn test_app_quit_on_q() {
        let mut app = App::new(&config_with_games(&[]));
        assert!(!app.should_exit);

        app.handle_key_event(KeyEvent::from(KeyCode::Char('q')));

        assert!(app.should_exit);
    }
}
