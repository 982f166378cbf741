use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const APP_DIR_NAME: &str = "walled-snake";
const PROGRESS_FILE_NAME: &str = "progress.json";

/// Entries shown on the leaderboard screen.
pub const LEADERBOARD_SIZE: usize = 10;

/// Failure reported by a progress store. Never fatal to a running game.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("progress file {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("progress file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not encode progress for {path}: {source}")]
    Encode {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("progress store unavailable: {0}")]
    Unavailable(String),
}

pub type UserId = u32;

/// Level and score a player starts a session from.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct StartingProgress {
    pub score: u32,
    pub level: u32,
}

impl Default for StartingProgress {
    fn default() -> Self {
        Self { score: 0, level: 1 }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub score: u32,
    pub level: u32,
}

/// Persistence collaborator used by the game driver.
pub trait ProgressStore {
    fn get_or_create_user(&mut self, username: &str) -> Result<UserId, PersistenceError>;

    /// Best saved record of `username`, or score 0 / level 1 when none.
    fn load_starting_progress(&self, username: &str)
    -> Result<StartingProgress, PersistenceError>;

    /// Appends one finished session to the history of `username`.
    fn save_outcome(
        &mut self,
        username: &str,
        score: u32,
        level: u32,
    ) -> Result<(), PersistenceError>;

    /// Every saved session, best score first, ties broken by level.
    fn fetch_leaderboard(&self) -> Result<Vec<LeaderboardEntry>, PersistenceError>;
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
struct UserRecord {
    id: UserId,
    username: String,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
struct ScoreRecord {
    user_id: UserId,
    score: u32,
    level: u32,
}

/// Users table plus score history, as stored on disk.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
struct ProgressData {
    users: Vec<UserRecord>,
    scores: Vec<ScoreRecord>,
}

impl ProgressData {
    fn user_id(&self, username: &str) -> Option<UserId> {
        self.users
            .iter()
            .find(|user| user.username == username)
            .map(|user| user.id)
    }

    fn get_or_create_user(&mut self, username: &str) -> UserId {
        if let Some(id) = self.user_id(username) {
            return id;
        }

        let id = self.users.iter().map(|user| user.id).max().unwrap_or(0) + 1;
        self.users.push(UserRecord {
            id,
            username: username.to_owned(),
        });
        id
    }

    fn starting_progress(&self, username: &str) -> StartingProgress {
        let Some(id) = self.user_id(username) else {
            return StartingProgress::default();
        };

        let mut best: Option<ScoreRecord> = None;
        for record in self.scores.iter().filter(|record| record.user_id == id) {
            if best.is_none_or(|current| record.score > current.score) {
                best = Some(*record);
            }
        }

        best.map_or_else(StartingProgress::default, |record| StartingProgress {
            score: record.score,
            level: record.level,
        })
    }

    fn push_score(&mut self, username: &str, score: u32, level: u32) {
        let user_id = self.get_or_create_user(username);
        self.scores.push(ScoreRecord {
            user_id,
            score,
            level,
        });
    }

    fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        let mut entries: Vec<LeaderboardEntry> = self
            .scores
            .iter()
            .filter_map(|record| {
                let user = self.users.iter().find(|user| user.id == record.user_id)?;
                Some(LeaderboardEntry {
                    username: user.username.clone(),
                    score: record.score,
                    level: record.level,
                })
            })
            .collect();

        entries.sort_by(|a, b| b.score.cmp(&a.score).then(b.level.cmp(&a.level)));
        entries
    }
}

/// First `n` entries of an already sorted leaderboard.
#[must_use]
pub fn top(entries: &[LeaderboardEntry], n: usize) -> &[LeaderboardEntry] {
    &entries[..entries.len().min(n)]
}

/// Returns the platform-correct progress file path.
#[must_use]
pub fn default_progress_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(PROGRESS_FILE_NAME);
    base
}

/// Progress store backed by a single JSON file.
///
/// Every operation re-reads the file so that concurrent game processes see
/// each other's results.
#[derive(Debug, Clone)]
pub struct JsonProgressStore {
    path: PathBuf,
}

impl JsonProgressStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<ProgressData, PersistenceError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(ProgressData::default()),
            Err(source) => {
                return Err(PersistenceError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_str(&raw).map_err(|source| PersistenceError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn write(&self, data: &ProgressData) -> Result<(), PersistenceError> {
        let io_error = |source: io::Error| PersistenceError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }

        let json = serde_json::to_string_pretty(data).map_err(|source| {
            PersistenceError::Encode {
                path: self.path.clone(),
                source,
            }
        })?;

        fs::write(&self.path, json).map_err(io_error)
    }
}

impl ProgressStore for JsonProgressStore {
    fn get_or_create_user(&mut self, username: &str) -> Result<UserId, PersistenceError> {
        let mut data = self.read()?;
        if let Some(id) = data.user_id(username) {
            return Ok(id);
        }

        let id = data.get_or_create_user(username);
        self.write(&data)?;
        Ok(id)
    }

    fn load_starting_progress(
        &self,
        username: &str,
    ) -> Result<StartingProgress, PersistenceError> {
        Ok(self.read()?.starting_progress(username))
    }

    fn save_outcome(
        &mut self,
        username: &str,
        score: u32,
        level: u32,
    ) -> Result<(), PersistenceError> {
        let mut data = self.read()?;
        data.push_score(username, score, level);
        self.write(&data)
    }

    fn fetch_leaderboard(&self) -> Result<Vec<LeaderboardEntry>, PersistenceError> {
        Ok(self.read()?.leaderboard())
    }
}

/// In-memory progress store; can be switched offline to simulate failures.
#[derive(Debug, Clone, Default)]
pub struct MemoryProgressStore {
    data: ProgressData,
    offline: bool,
    saves: usize,
}

impl MemoryProgressStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following call fail with [`PersistenceError::Unavailable`].
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    /// Number of successful `save_outcome` calls.
    #[must_use]
    pub fn saves(&self) -> usize {
        self.saves
    }

    fn check_online(&self) -> Result<(), PersistenceError> {
        if self.offline {
            return Err(PersistenceError::Unavailable("store is offline".to_owned()));
        }
        Ok(())
    }
}

impl ProgressStore for MemoryProgressStore {
    fn get_or_create_user(&mut self, username: &str) -> Result<UserId, PersistenceError> {
        self.check_online()?;
        Ok(self.data.get_or_create_user(username))
    }

    fn load_starting_progress(
        &self,
        username: &str,
    ) -> Result<StartingProgress, PersistenceError> {
        self.check_online()?;
        Ok(self.data.starting_progress(username))
    }

    fn save_outcome(
        &mut self,
        username: &str,
        score: u32,
        level: u32,
    ) -> Result<(), PersistenceError> {
        self.check_online()?;
        self.data.push_score(username, score, level);
        self.saves += 1;
        Ok(())
    }

    fn fetch_leaderboard(&self) -> Result<Vec<LeaderboardEntry>, PersistenceError> {
        self.check_online()?;
        Ok(self.data.leaderboard())
    }
}
