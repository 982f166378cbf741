use std::time::Duration;

use log::{info, warn};
use rand::Rng;

use crate::game::{GameSession, Outcome, SessionState, TickEvent};
use crate::input::Intent;
use crate::progress::{LeaderboardEntry, PersistenceError, ProgressStore, LEADERBOARD_SIZE, top};

/// Ties one session to the persistence collaborator.
///
/// The driver saves the outcome the moment the session terminates and
/// refreshes the leaderboard whenever it is opened. Store failures are
/// logged and kept for display; they never stop the game.
#[derive(Debug)]
pub struct GameDriver<S, R> {
    session: GameSession<R>,
    store: S,
    username: String,
    leaderboard: Vec<LeaderboardEntry>,
    saved: Option<Outcome>,
    last_error: Option<String>,
}

impl<S: ProgressStore, R: Rng> GameDriver<S, R> {
    #[must_use]
    pub fn new(session: GameSession<R>, store: S, username: impl Into<String>) -> Self {
        Self {
            session,
            store,
            username: username.into(),
            leaderboard: Vec::new(),
            saved: None,
            last_error: None,
        }
    }

    /// Forwards an intent, then reacts to the state it produced.
    pub fn handle_intent(&mut self, intent: Intent) {
        let was_showing = matches!(
            self.session.state(),
            SessionState::ShowingLeaderboard { .. }
        );
        self.session.apply_intent(intent);

        if !was_showing
            && matches!(
                self.session.state(),
                SessionState::ShowingLeaderboard { .. }
            )
        {
            self.refresh_leaderboard();
        }

        self.flush_outcome();
    }

    /// Runs one simulation step and persists the outcome if it ended the game.
    pub fn tick(&mut self) -> TickEvent {
        let event = self.session.tick();
        self.flush_outcome();
        event
    }

    /// Reloads the leaderboard from the store.
    pub fn refresh_leaderboard(&mut self) {
        match self.store.fetch_leaderboard() {
            Ok(entries) => self.leaderboard = entries,
            Err(err) => self.record_failure("fetch leaderboard", &err),
        }
    }

    fn flush_outcome(&mut self) {
        let Some(outcome) = self.session.take_outcome() else {
            return;
        };

        self.saved = Some(outcome);
        match self
            .store
            .save_outcome(&self.username, outcome.score, outcome.level)
        {
            Ok(()) => info!(
                "saved score {} at level {} for {}",
                outcome.score, outcome.level, self.username
            ),
            Err(err) => self.record_failure("save outcome", &err),
        }
    }

    fn record_failure(&mut self, action: &str, err: &PersistenceError) {
        warn!("failed to {action}: {err}");
        self.last_error = Some(format!("Failed to {action}: {err}"));
    }
}

impl<S, R> GameDriver<S, R> {
    #[must_use]
    pub fn session(&self) -> &GameSession<R> {
        &self.session
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Top entries for the leaderboard screen.
    #[must_use]
    pub fn leaderboard(&self) -> &[LeaderboardEntry] {
        top(&self.leaderboard, LEADERBOARD_SIZE)
    }

    /// Outcome handed to the store, once the session has ended.
    #[must_use]
    pub fn final_outcome(&self) -> Option<Outcome> {
        self.saved
    }

    /// Most recent persistence failure, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.session.state().is_terminated()
    }

    /// Delay between ticks at the session's current speed.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        tick_interval_for_speed(self.session.speed())
    }
}

/// Speed is in ticks per second.
#[must_use]
pub fn tick_interval_for_speed(speed: u32) -> Duration {
    Duration::from_millis(1000 / u64::from(speed.max(1)))
}
