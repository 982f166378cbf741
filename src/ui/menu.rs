use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Cell, Clear, Paragraph, Row, Table};
use ratatui::Frame;
use unicode_width::UnicodeWidthChar;

use crate::game::{Outcome, TerminationCause};
use crate::progress::LeaderboardEntry;

const USERNAME_COLUMN_WIDTH: usize = 16;

/// Draws the pause screen as a centered popup.
pub fn render_pause_menu(frame: &mut Frame<'_>, area: Rect) {
    let popup = centered_popup(area, 60, 30);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from("PAUSED"),
        Line::from(""),
        Line::from("[P] Resume"),
        Line::from("[L] Leaderboard"),
        Line::from("[Q]/[Esc] Quit"),
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
    outcome: Outcome,
    save_error: Option<&str>,
) {
    let popup = centered_popup(area, 70, 40);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from("GAME OVER"),
        Line::from(""),
        Line::from(format!("Score: {}", outcome.score)),
        Line::from(format!("Level: {}", outcome.level)),
        Line::from(cause_text(outcome.cause)),
        Line::from(save_error.unwrap_or("")).style(Style::default().fg(Color::Red)),
        Line::from(""),
        Line::from("Press any key to exit"),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" game over ")),
        popup,
    );
}

/// Draws the leaderboard table over the play area.
pub fn render_leaderboard(frame: &mut Frame<'_>, area: Rect, entries: &[LeaderboardEntry]) {
    let popup = centered_popup(area, 80, 80);
    frame.render_widget(Clear, popup);

    let header = Row::new(["Rank", "Username", "Score", "Level"]).style(
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    );
    let rows = entries.iter().enumerate().map(|(index, entry)| {
        Row::new([
            Cell::from((index + 1).to_string()),
            Cell::from(truncate_to_width(&entry.username, USERNAME_COLUMN_WIDTH)),
            Cell::from(entry.score.to_string()),
            Cell::from(entry.level.to_string()),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(5),
            Constraint::Length(USERNAME_COLUMN_WIDTH as u16 + 1),
            Constraint::Length(7),
            Constraint::Length(7),
        ],
    )
    .header(header)
    .block(
        Block::bordered()
            .title(" leaderboard ")
            .title_bottom(Line::from(" [L] back ").alignment(Alignment::Center)),
    );

    frame.render_widget(table, popup);
}

/// Draws the username prompt shown before a session starts.
pub fn render_username_prompt(frame: &mut Frame<'_>, input: &str) {
    let popup = centered_popup(frame.area(), 60, 30);
    frame.render_widget(Clear, popup);

    let [title_row, body_row] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(3)]).areas(popup);

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
        Line::from(format!("Enter Username: {input}_")),
        Line::from(""),
        Line::from("[Enter] Start  [Esc] Quit"),
    ];
    frame.render_widget(
        Paragraph::new(body)
            .alignment(Alignment::Center)
            .block(Block::bordered()),
        body_row,
    );
}

fn cause_text(cause: TerminationCause) -> &'static str {
    match cause {
        TerminationCause::WallCollision => "Cause: hit a wall",
        TerminationCause::SelfCollision => "Cause: hit yourself",
        TerminationCause::BoardFull => "Cause: no room left for food",
        TerminationCause::Quit => "Cause: quit",
    }
}

/// Cuts `text` to at most `max_width` terminal columns, marking the cut.
fn truncate_to_width(text: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut out = String::new();

    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width {
            out.pop();
            out.push('…');
            return out;
        }
        width += ch_width;
        out.push(ch);
    }

    out
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

#[cfg(test)]
mod tests {
    use super::truncate_to_width;

    #[test]
    fn short_names_are_untouched() {
        assert_eq!(truncate_to_width("alice", 16), "alice");
    }

    #[test]
    fn long_names_are_cut_with_marker() {
        assert_eq!(truncate_to_width("abcdefghij", 5), "abcd…");
    }

    #[test]
    fn wide_characters_count_double() {
        assert_eq!(truncate_to_width("日本語です", 6), "日本…");
    }
}
