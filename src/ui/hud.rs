use std::time::Duration;

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::score::ScoreSummary;
use crate::snapshot::Snapshot;

const LABEL_COLOR: Color = Color::DarkGray;
const VALUE_COLOR: Color = Color::White;

/// Renders the one-line status bar.
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, snapshot: &Snapshot) {
    let fields = hud_fields(&snapshot.score, snapshot.speed_level);

    let mut spans = Vec::with_capacity(fields.len() * 3);
    for (index, (label, value)) in fields.into_iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled("  ", Style::new().fg(LABEL_COLOR)));
        }
        spans.push(Span::styled(format!("{label} "), Style::new().fg(LABEL_COLOR)));
        spans.push(Span::styled(value, Style::new().fg(VALUE_COLOR)));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        area,
    );
}

/// Label/value pairs shown in the status bar, left to right.
#[must_use]
pub fn hud_fields(score: &ScoreSummary, speed_level: u32) -> Vec<(&'static str, String)> {
    vec![
        ("Score", score.score.to_string()),
        ("Best", score.best_score.to_string()),
        ("Length", score.length.to_string()),
        ("Eaten", score.consumed.to_string()),
        ("Time", format_elapsed(score.elapsed)),
        ("Level", speed_level.to_string()),
    ]
}

/// Formats a duration as `mm:ss`, switching to `h:mm:ss` past an hour.
#[must_use]
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let (hours, minutes, seconds) = (total / 3600, (total / 60) % 60, total % 60);

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}
