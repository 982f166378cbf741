use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::grid::{Cell, GridGeometry, PixelRect, SafeZone};
use crate::input::Direction;

/// Default board width in pixels.
pub const DEFAULT_WIDTH_PX: i32 = 600;

/// Default board height in pixels.
pub const DEFAULT_HEIGHT_PX: i32 = 400;

/// Default cell edge in pixels.
pub const DEFAULT_CELL_SIZE: i32 = 10;

/// Minimum snake length at spawn.
pub const MIN_SPAWN_LENGTH: usize = 3;

/// Invalid board or rule configuration. Raised before any session starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: i32 },
    #[error("cell size {cell_size} does not evenly divide a {width}x{height} board")]
    CellSizeMismatch {
        width: i32,
        height: i32,
        cell_size: i32,
    },
    #[error("grid of {columns}x{rows} cells leaves no interior")]
    GridTooSmall { columns: i32, rows: i32 },
    #[error("spawn length must be at least 3, got {0}")]
    SpawnTooShort(usize),
    #[error("spawn length {length} does not fit a grid spanning {span} cells")]
    SpawnTooLong { length: usize, span: i32 },
    #[error("snake spawn body at {0} leaves the board interior")]
    SpawnOutOfBounds(Cell),
    #[error("snake spawn body at {0} lies outside the safe zone")]
    SpawnOutsideSafeZone(Cell),
    #[error("{0} must be non-zero")]
    ZeroRule(&'static str),
    #[error("failed to read config file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Board dimensions in pixels.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub width: i32,
    pub height: i32,
    pub cell_size: i32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH_PX,
            height: DEFAULT_HEIGHT_PX,
            cell_size: DEFAULT_CELL_SIZE,
        }
    }
}

/// Where and how the snake starts.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Head position in pixels.
    pub x: i32,
    pub y: i32,
    pub length: usize,
    pub direction: Direction,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            x: 100,
            y: 100,
            length: MIN_SPAWN_LENGTH,
            direction: Direction::Right,
        }
    }
}

/// Score, speed and obstacle progression constants.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize)]
#[serde(default)]
pub struct LevelRules {
    /// A level-up happens whenever the score lands on a multiple of this.
    pub points_per_level: u32,
    pub speed_increment: u32,
    /// Ticks per second at level 1.
    pub base_speed: u32,
    pub levels_per_obstacle_tier: u32,
    pub obstacles_per_tier: u32,
    pub max_obstacles: u32,
}

impl Default for LevelRules {
    fn default() -> Self {
        Self {
            points_per_level: 3,
            speed_increment: 2,
            base_speed: 10,
            levels_per_obstacle_tier: 5,
            obstacles_per_tier: 3,
            max_obstacles: 30,
        }
    }
}

/// Attempt bounds for rejection sampling.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlacementLimits {
    pub wall_attempts: u32,
    pub food_attempts: u32,
}

impl Default for PlacementLimits {
    fn default() -> Self {
        Self {
            wall_attempts: 300,
            food_attempts: 10_000,
        }
    }
}

/// Complete game configuration as read from disk.
///
/// Every field falls back to the defaults when missing, so an empty JSON
/// object is a valid config file.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub board: BoardConfig,
    pub safe_zone: PixelRect,
    pub spawn: SpawnConfig,
    pub rules: LevelRules,
    pub limits: PlacementLimits,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board: BoardConfig::default(),
            safe_zone: PixelRect {
                x: 40,
                y: 40,
                width: 140,
                height: 140,
            },
            spawn: SpawnConfig::default(),
            rules: LevelRules::default(),
            limits: PlacementLimits::default(),
        }
    }
}

impl GameConfig {
    /// Loads a config file, or the defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Validates the raw values into an immutable [`Board`].
    pub fn board(&self) -> Result<Board, ConfigError> {
        let geometry =
            GridGeometry::new(self.board.width, self.board.height, self.board.cell_size)?;

        if self.rules.points_per_level == 0 {
            return Err(ConfigError::ZeroRule("points_per_level"));
        }
        if self.rules.levels_per_obstacle_tier == 0 {
            return Err(ConfigError::ZeroRule("levels_per_obstacle_tier"));
        }
        if self.rules.base_speed == 0 {
            return Err(ConfigError::ZeroRule("base_speed"));
        }
        if self.spawn.length < MIN_SPAWN_LENGTH {
            return Err(ConfigError::SpawnTooShort(self.spawn.length));
        }

        let head = geometry.cell_at(self.spawn.x, self.spawn.y);
        if !geometry.is_interior(head) {
            return Err(ConfigError::SpawnOutOfBounds(head));
        }

        // Head is interior, so a trailing run shorter than the grid span
        // cannot overflow the cell arithmetic below.
        let span = geometry.columns().max(geometry.rows());
        let trailing = match i32::try_from(self.spawn.length - 1) {
            Ok(trailing) if trailing < span => trailing,
            _ => {
                return Err(ConfigError::SpawnTooLong {
                    length: self.spawn.length,
                    span,
                });
            }
        };

        let (dx, dy) = self.spawn.direction.opposite().delta();
        let tail = head.offset(dx * trailing, dy * trailing);
        if !geometry.is_interior(tail) {
            return Err(ConfigError::SpawnOutOfBounds(tail));
        }

        let safe_zone = geometry.cells_overlapping(self.safe_zone);
        if let Some(end) = [head, tail].into_iter().find(|end| !safe_zone.contains(*end)) {
            return Err(ConfigError::SpawnOutsideSafeZone(end));
        }

        Ok(Board {
            geometry,
            safe_zone,
            spawn_head: head,
            spawn_length: self.spawn.length,
            spawn_direction: self.spawn.direction,
            rules: self.rules,
            limits: self.limits,
        })
    }
}

/// Validated, immutable configuration handed to a session.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Board {
    pub geometry: GridGeometry,
    pub safe_zone: SafeZone,
    pub spawn_head: Cell,
    pub spawn_length: usize,
    pub spawn_direction: Direction,
    pub rules: LevelRules,
    pub limits: PlacementLimits,
}
