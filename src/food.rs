use rand::Rng;
use thiserror::Error;

use crate::grid::{Cell, GridGeometry};
use crate::snake::Snake;
use crate::walls::Walls;

/// Heaviest food weight; weights are drawn from `1..=MAX_FOOD_WEIGHT`.
pub const MAX_FOOD_WEIGHT: u8 = 3;

/// No free cell was found within the attempt bound.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
#[error("no free cell found for food after {attempts} attempts")]
pub struct BoardFullError {
    pub attempts: u32,
}

/// Display category derived from the food weight.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum FoodKind {
    Plain,
    Rich,
    Feast,
}

/// Food entity currently active on the board.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Food {
    pub position: Cell,
    weight: u8,
}

impl Food {
    /// Creates food at `position`; the weight is clamped into `1..=3`.
    #[must_use]
    pub fn new(position: Cell, weight: u8) -> Self {
        Self {
            position,
            weight: weight.clamp(1, MAX_FOOD_WEIGHT),
        }
    }

    #[must_use]
    pub fn weight(self) -> u8 {
        self.weight
    }

    /// Returns the score value granted when eaten.
    #[must_use]
    pub fn points(self) -> u32 {
        u32::from(self.weight)
    }

    #[must_use]
    pub fn kind(self) -> FoodKind {
        match self.weight {
            1 => FoodKind::Plain,
            2 => FoodKind::Rich,
            _ => FoodKind::Feast,
        }
    }

    /// Spawns food on a free interior cell with a uniform weight.
    ///
    /// Cells held by the snake or a wall are redrawn, at most
    /// `max_attempts` times in total.
    pub fn spawn<R: Rng + ?Sized>(
        rng: &mut R,
        geometry: GridGeometry,
        snake: &Snake,
        walls: &Walls,
        max_attempts: u32,
    ) -> Result<Self, BoardFullError> {
        for _ in 0..max_attempts {
            let candidate = Cell {
                x: rng.gen_range(geometry.interior_columns()),
                y: rng.gen_range(geometry.interior_rows()),
            };

            if snake.occupies(candidate) || walls.contains(candidate) {
                continue;
            }

            let weight = rng.gen_range(1..=MAX_FOOD_WEIGHT);
            return Ok(Self::new(candidate, weight));
        }

        Err(BoardFullError {
            attempts: max_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::grid::{Cell, GridGeometry};
    use crate::input::Direction;
    use crate::snake::Snake;
    use crate::walls::Walls;

    use super::{BoardFullError, Food, FoodKind};

    #[test]
    fn food_spawn_never_overlaps_snake_or_walls() {
        // 6x5 board leaves a 4x3 interior; snake and walls cover most of it.
        let geometry = GridGeometry::new(60, 50, 10).expect("small board is valid");
        let snake = Snake::from_segments(
            vec![Cell::new(3, 1), Cell::new(2, 1), Cell::new(1, 1)],
            Direction::Right,
        );
        let walls = Walls::from_cells(
            geometry
                .border_cells()
                .chain([Cell::new(1, 2), Cell::new(2, 2), Cell::new(4, 3)]),
        );
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            let food = Food::spawn(&mut rng, geometry, &snake, &walls, 10_000)
                .expect("free cells remain");

            assert!(!snake.occupies(food.position));
            assert!(!walls.contains(food.position));
            assert!(geometry.is_interior(food.position));
            assert!((1..=3).contains(&food.weight()));
        }
    }

    #[test]
    fn all_weights_appear() {
        let geometry = GridGeometry::new(600, 400, 10).expect("default board is valid");
        let snake = Snake::new(Cell::new(10, 10), Direction::Right, 3);
        let walls = Walls::from_cells(geometry.border_cells());
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen = [false; 3];

        for _ in 0..100 {
            let food = Food::spawn(&mut rng, geometry, &snake, &walls, 100).expect("open board");
            seen[usize::from(food.weight()) - 1] = true;
        }

        assert_eq!(seen, [true; 3]);
    }

    #[test]
    fn full_board_reports_error() {
        let geometry = GridGeometry::new(50, 30, 10).expect("small board is valid");
        let snake = Snake::from_segments(
            vec![Cell::new(3, 1), Cell::new(2, 1), Cell::new(1, 1)],
            Direction::Right,
        );
        let walls = Walls::from_cells(geometry.border_cells());
        let mut rng = StdRng::seed_from_u64(9);

        assert_eq!(
            Food::spawn(&mut rng, geometry, &snake, &walls, 50),
            Err(BoardFullError { attempts: 50 })
        );
    }

    #[test]
    fn weight_maps_to_display_kind() {
        let cell = Cell::new(1, 1);

        assert_eq!(Food::new(cell, 1).kind(), FoodKind::Plain);
        assert_eq!(Food::new(cell, 2).kind(), FoodKind::Rich);
        assert_eq!(Food::new(cell, 3).kind(), FoodKind::Feast);
        assert_eq!(Food::new(cell, 9).points(), 3);
        assert_eq!(Food::new(cell, 0).points(), 1);
    }
}
