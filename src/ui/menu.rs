use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::events::GameOverReason;
use crate::score::ScoreSummary;
use crate::ui::hud::format_elapsed;

/// Draws the start screen as a centered popup.
pub fn render_start_menu(frame: &mut Frame<'_>, area: Rect, best_score: u32) {
    let popup = centered_popup(area, 70, 45);
    frame.render_widget(Clear, popup);

    let [title_row, body_row, footer_row] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(2),
    ])
    .areas(popup);

    frame.render_widget(
        Paragraph::new(Line::from("SNAKE"))
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
        title_row,
    );

    let body = vec![
        Line::from(format!("Best score: {best_score}")),
        Line::from(""),
        Line::from("[Enter]/[Space] Start"),
        Line::from("[Q] Quit"),
    ];
    frame.render_widget(
        Paragraph::new(body)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" start ")),
        body_row,
    );

    frame.render_widget(
        Paragraph::new(Line::from("Arrows/WASD to move, P to pause"))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray)),
        footer_row,
    );
}

/// Draws the pause screen as a centered popup.
pub fn render_pause_menu(frame: &mut Frame<'_>, area: Rect) {
    let popup = centered_popup(area, 60, 30);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from("PAUSED"),
        Line::from(""),
        Line::from("[P]/[Esc] Resume"),
        Line::from("[R] Menu  [Q] Quit"),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" pause ")),
        popup,
    );
}

/// Draws the game-over screen as a centered popup.
pub fn render_game_over_menu(
    frame: &mut Frame<'_>,
    area: Rect,
    summary: &ScoreSummary,
    reason: Option<GameOverReason>,
) {
    let popup = centered_popup(area, 70, 50);
    frame.render_widget(Clear, popup);

    let title = if reason == Some(GameOverReason::BoardFull) {
        "BOARD CLEARED"
    } else {
        "GAME OVER"
    };
    let is_new_best = summary.score > 0 && summary.score == summary.best_score;

    let lines = vec![
        Line::from(title),
        Line::from(""),
        Line::from(format!("Score: {}", summary.score)),
        Line::from(format!("Best score: {}", summary.best_score)),
        Line::from(format!(
            "Length {}  Eaten {}  Time {}",
            summary.length,
            summary.consumed,
            format_elapsed(summary.elapsed)
        )),
        Line::from(reason_text(reason)),
        Line::from(if is_new_best { "New best score!" } else { "" }),
        Line::from(""),
        Line::from("[Enter]/[Space] Play again"),
        Line::from("[R] Menu  [Q] Quit"),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" game over ")),
        popup,
    );
}

fn reason_text(reason: Option<GameOverReason>) -> &'static str {
    match reason {
        Some(GameOverReason::WallCollision) => "Cause: hit wall",
        Some(GameOverReason::SelfCollision) => "Cause: hit yourself",
        Some(GameOverReason::BoardFull) => "The snake fills the board",
        None => "",
    }
}

fn centered_popup(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let [_, mid, _] = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .areas(mid);

    center
}
