use std::collections::HashSet;

use log::warn;
use rand::Rng;

use crate::config::{LevelRules, PlacementLimits};
use crate::grid::{Cell, GridGeometry, SafeZone};

/// Wall cells for one level: the border ring plus interior obstacles.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Walls {
    cells: HashSet<Cell>,
    obstacles: usize,
    shortfall: usize,
}

impl Walls {
    /// Builds a wall set from raw cells, without any border.
    #[must_use]
    pub fn from_cells(cells: impl IntoIterator<Item = Cell>) -> Self {
        Self {
            cells: cells.into_iter().collect(),
            obstacles: 0,
            shortfall: 0,
        }
    }

    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of interior obstacles placed.
    #[must_use]
    pub fn obstacles(&self) -> usize {
        self.obstacles
    }

    /// Obstacles the budget asked for but the attempt bound did not place.
    #[must_use]
    pub fn shortfall(&self) -> usize {
        self.shortfall
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }
}

/// Number of interior obstacles a level asks for.
///
/// Zero below the first tier, then `obstacles_per_tier` more every
/// `levels_per_obstacle_tier` levels, capped at `max_obstacles`.
#[must_use]
pub fn obstacle_budget(level: u32, rules: &LevelRules) -> usize {
    let tiers = level / rules.levels_per_obstacle_tier.max(1);
    let budget = tiers
        .saturating_mul(rules.obstacles_per_tier)
        .min(rules.max_obstacles);
    usize::try_from(budget).unwrap_or(usize::MAX)
}

/// Generates the wall set for `level`.
///
/// Interior obstacles are rejection-sampled and never land in `safe_zone`.
/// Sampling gives up after `limits.wall_attempts` draws, so a crowded board
/// may come back under budget; see [`Walls::shortfall`].
pub fn generate<R: Rng + ?Sized>(
    rng: &mut R,
    level: u32,
    geometry: GridGeometry,
    safe_zone: SafeZone,
    rules: &LevelRules,
    limits: &PlacementLimits,
) -> Walls {
    let mut cells: HashSet<Cell> = geometry.border_cells().collect();
    let budget = obstacle_budget(level, rules);

    let mut placed = 0;
    let mut attempts = 0;
    while placed < budget && attempts < limits.wall_attempts {
        attempts += 1;
        let candidate = Cell {
            x: rng.gen_range(geometry.interior_columns()),
            y: rng.gen_range(geometry.interior_rows()),
        };

        if safe_zone.contains(candidate) {
            continue;
        }

        if cells.insert(candidate) {
            placed += 1;
        }
    }

    let shortfall = budget - placed;
    if shortfall > 0 {
        warn!(
            "level {level}: placed {placed}/{budget} obstacles after {attempts} attempts"
        );
    }

    Walls {
        cells,
        obstacles: placed,
        shortfall,
    }
}
