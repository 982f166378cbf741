use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use serde::Deserialize;

/// Canonical movement directions for snake input.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    #[must_use]
    pub fn is_opposite_of(self, other: Self) -> bool {
        self == other.opposite()
    }

    /// Unit step in cell coordinates; y grows downwards.
    #[must_use]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// Discrete intents delivered to a game session.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Intent {
    Move(Direction),
    TogglePause,
    ToggleLeaderboard,
    Quit,
}

/// Returns whether a direction change is legal (no immediate 180° turns).
#[must_use]
pub fn direction_change_is_valid(current: Direction, next: Direction) -> bool {
    !next.is_opposite_of(current)
}

/// Maps a key press to a gameplay intent.
#[must_use]
pub fn intent_from_key(key: KeyEvent) -> Option<Intent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Intent::Quit);
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('w' | 'W') => Some(Intent::Move(Direction::Up)),
        KeyCode::Down | KeyCode::Char('s' | 'S') => Some(Intent::Move(Direction::Down)),
        KeyCode::Left | KeyCode::Char('a' | 'A') => Some(Intent::Move(Direction::Left)),
        KeyCode::Right | KeyCode::Char('d' | 'D') => Some(Intent::Move(Direction::Right)),
        KeyCode::Char('p' | 'P') => Some(Intent::TogglePause),
        KeyCode::Char('l' | 'L') => Some(Intent::ToggleLeaderboard),
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => Some(Intent::Quit),
        _ => None,
    }
}

/// Waits up to `timeout` for the next key press.
pub fn poll_key(timeout: Duration) -> io::Result<Option<KeyEvent>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }

    match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(key)),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

    use super::{direction_change_is_valid, intent_from_key, Direction, Intent};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn opposite_direction_is_correct() {
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Down.opposite(), Direction::Up);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::Right.opposite(), Direction::Left);
    }

    #[test]
    fn deltas_cancel_for_opposites() {
        for direction in [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ] {
            let (dx, dy) = direction.delta();
            let (ox, oy) = direction.opposite().delta();
            assert_eq!((dx + ox, dy + oy), (0, 0));
        }
    }

    #[test]
    fn reverse_turns_are_invalid() {
        assert!(!direction_change_is_valid(Direction::Up, Direction::Down));
        assert!(!direction_change_is_valid(
            Direction::Right,
            Direction::Left
        ));

        assert!(direction_change_is_valid(Direction::Up, Direction::Left));
        assert!(direction_change_is_valid(Direction::Up, Direction::Up));
    }

    #[test]
    fn keys_map_to_intents() {
        assert_eq!(
            intent_from_key(press(KeyCode::Left)),
            Some(Intent::Move(Direction::Left))
        );
        assert_eq!(
            intent_from_key(press(KeyCode::Char('w'))),
            Some(Intent::Move(Direction::Up))
        );
        assert_eq!(
            intent_from_key(press(KeyCode::Char('p'))),
            Some(Intent::TogglePause)
        );
        assert_eq!(
            intent_from_key(press(KeyCode::Char('L'))),
            Some(Intent::ToggleLeaderboard)
        );
        assert_eq!(intent_from_key(press(KeyCode::Esc)), Some(Intent::Quit));
        assert_eq!(intent_from_key(press(KeyCode::Char('x'))), None);
    }

    #[test]
    fn ctrl_c_quits_and_releases_are_ignored() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(intent_from_key(ctrl_c), Some(Intent::Quit));

        let release = KeyEvent {
            code: KeyCode::Up,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(intent_from_key(release), None);
    }
}
