use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::game::Snapshot;

const HUD_HEIGHT: u16 = 1;

/// Supplemental values displayed by the HUD row.
#[derive(Debug, Clone, Copy)]
pub struct HudInfo<'a> {
    pub username: &'a str,
    pub last_error: Option<&'a str>,
}

/// Renders the one-line HUD and returns the play area below it.
#[must_use]
pub fn render_hud(
    frame: &mut Frame<'_>,
    area: Rect,
    snapshot: &Snapshot,
    info: &HudInfo<'_>,
) -> Rect {
    let [hud_area, play_area] =
        Layout::vertical([Constraint::Length(HUD_HEIGHT), Constraint::Min(0)]).areas(area);

    frame.render_widget(
        Paragraph::new(stats_line(info.username, snapshot)).alignment(Alignment::Left),
        hud_area,
    );

    if info.last_error.is_some() {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "store offline",
                Style::default().fg(Color::Red),
            )))
            .alignment(Alignment::Right),
            hud_area,
        );
    }

    play_area
}

fn stats_line(username: &str, snapshot: &Snapshot) -> Line<'static> {
    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);

    Line::from(vec![
        Span::styled("User ", label),
        Span::styled(username.to_owned(), value),
        Span::styled("  Score ", label),
        Span::styled(snapshot.score.to_string(), value),
        Span::styled("  Level ", label),
        Span::styled(snapshot.level.to_string(), value),
        Span::styled("  Speed ", label),
        Span::styled(snapshot.speed.to_string(), value),
        Span::styled("  Length ", label),
        Span::styled(snapshot.snake.len().to_string(), value),
    ])
}
