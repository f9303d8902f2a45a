//! Gauge list widget showing the progress of every tracked test.

use pt_core::tracker::CONNECTION_LOST_LABEL;
use pt_protocol::{ProgressState, Stage};
use ratatui::layout::Constraint;
use ratatui::layout::Direction;
use ratatui::layout::Layout;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Gauge;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

/// One gauge to draw.
#[derive(Debug, Clone)]
pub struct GaugeRow {
    /// Block title, e.g. `game 42 · reconnect-mid-flight`.
    pub title: String,
    pub progress: ProgressState,
}

/// Renders one gauge per row, stacked vertically.
///
/// # Arguments
/// * `frame` - The frame to render into
/// * `area` - The area to render the gauges in
/// * `rows` - Gauges to display
/// * `selected` - Index of the highlighted gauge
pub fn render_gauges(frame: &mut Frame, area: Rect, rows: &[GaugeRow], selected: usize) {
    let outer = Block::default()
        .borders(Borders::ALL)
        .title("Test Progress");
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    if rows.is_empty() {
        frame.render_widget(Paragraph::new("No tests tracked."), inner);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(rows.iter().map(|_| Constraint::Length(3)))
        .split(inner);

    for (index, (row, chunk)) in rows.iter().zip(chunks.iter()).enumerate() {
        let mut border_style = Style::default();
        if index == selected {
            border_style = border_style.fg(Color::Blue).add_modifier(Modifier::BOLD);
        }

        let gauge = Gauge::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(row.title.clone())
                    .border_style(border_style),
            )
            .gauge_style(Style::default().fg(gauge_color(&row.progress)))
            .percent(u16::from(row.progress.percent))
            .label(format!("{}% {}", row.progress.percent, row.progress.label));
        frame.render_widget(gauge, *chunk);
    }
}

/// Color a gauge by outcome.
fn gauge_color(progress: &ProgressState) -> Color {
    if progress.label == CONNECTION_LOST_LABEL {
        return Color::Yellow;
    }
    if !progress.is_complete() {
        return Color::Cyan;
    }
    if progress.label == Stage::Done.label() {
        Color::Green
    } else {
        Color::Red
    }
}
