use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::Frame;

use crate::food::FoodKind;
use crate::game::{Outcome, SessionState, Snapshot};
use crate::grid::Cell;
use crate::input::Direction;
use crate::progress::LeaderboardEntry;
use crate::ui::hud::{render_hud, HudInfo};
use crate::ui::menu::{render_game_over_menu, render_leaderboard, render_pause_menu};

const GLYPH_BLOCK: &str = "█";
const GLYPH_FOOD: &str = "●";
const GLYPH_SNAKE_BODY: &str = "▓";
const GLYPH_SNAKE_HEAD_UP: &str = "▲";
const GLYPH_SNAKE_HEAD_DOWN: &str = "▼";
const GLYPH_SNAKE_HEAD_LEFT: &str = "◀";
const GLYPH_SNAKE_HEAD_RIGHT: &str = "▶";

const WALL_COLOR: Color = Color::White;
const SNAKE_COLOR: Color = Color::Green;
const ORANGE: Color = Color::Rgb(255, 165, 0);

/// Everything the renderer needs besides the world snapshot.
#[derive(Debug, Clone, Copy)]
pub struct FrameInfo<'a> {
    pub username: &'a str,
    pub leaderboard: &'a [LeaderboardEntry],
    pub final_outcome: Option<Outcome>,
    pub last_error: Option<&'a str>,
}

/// Renders the full game frame from an immutable snapshot.
pub fn render(frame: &mut Frame<'_>, snapshot: &Snapshot, info: FrameInfo<'_>) {
    let area = frame.area();
    let play_area = render_hud(
        frame,
        area,
        snapshot,
        &HudInfo {
            username: info.username,
            last_error: info.last_error,
        },
    );

    render_walls(frame, play_area, snapshot);
    render_food(frame, play_area, snapshot);
    render_snake(frame, play_area, snapshot);

    match snapshot.state {
        SessionState::Running => {}
        SessionState::Paused => render_pause_menu(frame, play_area),
        SessionState::ShowingLeaderboard { .. } => {
            render_leaderboard(frame, play_area, info.leaderboard);
        }
        SessionState::Terminated(outcome) => {
            render_game_over_menu(
                frame,
                play_area,
                info.final_outcome.unwrap_or(outcome),
                info.last_error,
            );
        }
    }
}

/// Color a food item is drawn in, by weight.
#[must_use]
pub fn food_color(kind: FoodKind) -> Color {
    match kind {
        FoodKind::Plain => Color::Red,
        FoodKind::Rich => Color::Yellow,
        FoodKind::Feast => ORANGE,
    }
}

fn render_walls(frame: &mut Frame<'_>, area: Rect, snapshot: &Snapshot) {
    let style = Style::new().fg(WALL_COLOR);
    let buffer = frame.buffer_mut();
    for wall in &snapshot.walls {
        if let Some((x, y)) = cell_to_terminal(area, *wall) {
            buffer.set_string(x, y, GLYPH_BLOCK, style);
        }
    }
}

fn render_food(frame: &mut Frame<'_>, area: Rect, snapshot: &Snapshot) {
    let Some((x, y)) = cell_to_terminal(area, snapshot.food.position) else {
        return;
    };

    let style = Style::new()
        .fg(food_color(snapshot.food_kind))
        .add_modifier(Modifier::BOLD);
    frame.buffer_mut().set_string(x, y, GLYPH_FOOD, style);
}

fn render_snake(frame: &mut Frame<'_>, area: Rect, snapshot: &Snapshot) {
    let buffer = frame.buffer_mut();
    for (index, segment) in snapshot.snake.iter().enumerate() {
        let Some((x, y)) = cell_to_terminal(area, *segment) else {
            continue;
        };

        if index == 0 {
            buffer.set_string(
                x,
                y,
                head_glyph(snapshot.heading),
                Style::new().fg(SNAKE_COLOR).add_modifier(Modifier::BOLD),
            );
        } else {
            buffer.set_string(x, y, GLYPH_SNAKE_BODY, Style::new().fg(SNAKE_COLOR));
        }
    }
}

fn head_glyph(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => GLYPH_SNAKE_HEAD_UP,
        Direction::Down => GLYPH_SNAKE_HEAD_DOWN,
        Direction::Left => GLYPH_SNAKE_HEAD_LEFT,
        Direction::Right => GLYPH_SNAKE_HEAD_RIGHT,
    }
}

/// One terminal cell per grid cell; cells outside `area` are clipped.
fn cell_to_terminal(area: Rect, cell: Cell) -> Option<(u16, u16)> {
    let x_offset = u16::try_from(cell.x).ok()?;
    let y_offset = u16::try_from(cell.y).ok()?;

    let x = area.x.saturating_add(x_offset);
    let y = area.y.saturating_add(y_offset);
    if x >= area.right() || y >= area.bottom() {
        return None;
    }

    Some((x, y))
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;
    use ratatui::style::Color;
    use ratatui::Terminal;

    use crate::config::GameConfig;
    use crate::food::FoodKind;
    use crate::game::GameSession;
    use crate::grid::Cell;
    use crate::progress::StartingProgress;

    use super::{cell_to_terminal, food_color, render, FrameInfo};

    #[test]
    fn cells_map_inside_area_or_clip() {
        let area = Rect::new(2, 3, 10, 5);

        assert_eq!(cell_to_terminal(area, Cell::new(0, 0)), Some((2, 3)));
        assert_eq!(cell_to_terminal(area, Cell::new(9, 4)), Some((11, 7)));
        assert_eq!(cell_to_terminal(area, Cell::new(10, 0)), None);
        assert_eq!(cell_to_terminal(area, Cell::new(-1, 0)), None);
    }

    #[test]
    fn food_colors_follow_weight() {
        assert_eq!(food_color(FoodKind::Plain), Color::Red);
        assert_eq!(food_color(FoodKind::Rich), Color::Yellow);
        assert_eq!(food_color(FoodKind::Feast), Color::Rgb(255, 165, 0));
    }

    #[test]
    fn frame_draws_head_and_hud() {
        let board = GameConfig::default().board().expect("default board");
        let session =
            GameSession::with_seed(board, StartingProgress::default(), 5).expect("open board");
        let snapshot = session.snapshot();
        let mut terminal = Terminal::new(TestBackend::new(64, 44)).expect("test backend");

        terminal
            .draw(|frame| {
                render(
                    frame,
                    &snapshot,
                    FrameInfo {
                        username: "alice",
                        leaderboard: &[],
                        final_outcome: None,
                        last_error: None,
                    },
                );
            })
            .expect("draw should succeed");

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("alice"));
        assert!(text.contains("▶"));
    }
}
