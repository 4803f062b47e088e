use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Block;

use crate::engine::EngineState;
use crate::food::FoodKind;
use crate::snake::Position;
use crate::snapshot::Snapshot;
use crate::ui::hud::render_hud;
use crate::ui::menu::{render_game_over_menu, render_pause_menu, render_start_menu};

/// Glyph painted for one board cell; two columns keep cells roughly square.
const CELL_GLYPH: &str = "██";
const CELL_WIDTH: u16 = 2;

const HEAD_COLOR: Color = Color::White;
const BODY_COLOR: Color = Color::Green;
const FOOD_COLOR: Color = Color::Red;
const BONUS_FOOD_COLOR: Color = Color::Yellow;
const BORDER_COLOR: Color = Color::DarkGray;

/// Renders the full frame from an engine snapshot.
pub fn render(frame: &mut Frame<'_>, snapshot: &Snapshot) {
    let [play_area, hud_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());

    render_hud(frame, hud_area, snapshot);

    let board_area = board_rect(play_area, snapshot.grid_size);
    let block = Block::bordered()
        .title(" snake ")
        .border_style(Style::new().fg(BORDER_COLOR));
    let inner = block.inner(board_area);
    frame.render_widget(block, board_area);

    render_food(frame, inner, snapshot);
    render_snake(frame, inner, snapshot);

    match snapshot.state {
        EngineState::Menu => render_start_menu(frame, play_area, snapshot.score.best_score),
        EngineState::Paused => render_pause_menu(frame, play_area),
        EngineState::GameOver => render_game_over_menu(
            frame,
            play_area,
            &snapshot.score,
            snapshot.game_over_reason,
        ),
        EngineState::Playing => {}
    }
}

/// Centres the bordered board inside `area`, shrinking it when the terminal
/// is too small.
fn board_rect(area: Rect, grid_size: u16) -> Rect {
    let width = grid_size
        .saturating_mul(CELL_WIDTH)
        .saturating_add(2)
        .min(area.width);
    let height = grid_size.saturating_add(2).min(area.height);

    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn render_food(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot) {
    let Some(food) = snapshot.food else {
        return;
    };
    let Some((x, y)) = logical_to_terminal(inner, snapshot.grid_size, food.position()) else {
        return;
    };

    let color = match food.kind() {
        FoodKind::Ordinary => FOOD_COLOR,
        FoodKind::Bonus => BONUS_FOOD_COLOR,
    };
    frame
        .buffer_mut()
        .set_string(x, y, CELL_GLYPH, Style::new().fg(color));
}

fn render_snake(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot) {
    let buffer = frame.buffer_mut();

    // Tail first so the head wins when a collision puts both on one cell.
    for segment in snapshot.segments.iter().rev() {
        let Some((x, y)) = logical_to_terminal(inner, snapshot.grid_size, segment.position) else {
            continue;
        };

        let style = if segment.is_head {
            Style::new().fg(HEAD_COLOR).add_modifier(Modifier::BOLD)
        } else {
            Style::new().fg(BODY_COLOR)
        };
        buffer.set_string(x, y, CELL_GLYPH, style);
    }
}

fn logical_to_terminal(inner: Rect, grid_size: u16, position: Position) -> Option<(u16, u16)> {
    let x_offset = u16::try_from(position.x).ok()?;
    let y_offset = u16::try_from(position.y).ok()?;
    if x_offset >= grid_size || y_offset >= grid_size {
        return None;
    }

    let x = inner.x.saturating_add(x_offset.saturating_mul(CELL_WIDTH));
    let y = inner.y.saturating_add(y_offset);
    if x.saturating_add(CELL_WIDTH) > inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}
