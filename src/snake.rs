use std::collections::VecDeque;

use crate::grid::Cell;
use crate::input::{direction_change_is_valid, Direction};
use crate::walls::Walls;

/// Snake body and heading.
///
/// The heading used for the next tick may be changed any number of times
/// between ticks, but never to the reverse of the direction the snake last
/// moved in, so two quick turns cannot fold the head back onto the neck.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Snake {
    body: VecDeque<Cell>,
    moved: Direction,
    heading: Direction,
}

impl Snake {
    /// Creates a straight snake of `length` cells with the head at `head`,
    /// trailing away from `direction`.
    #[must_use]
    pub fn new(head: Cell, direction: Direction, length: usize) -> Self {
        let (dx, dy) = direction.opposite().delta();
        let mut body = VecDeque::with_capacity(length);
        let mut cell = head;
        for _ in 0..length.max(1) {
            body.push_back(cell);
            cell = cell.offset(dx, dy);
        }

        Self {
            body,
            moved: direction,
            heading: direction,
        }
    }

    /// Creates a snake from explicit body segments (front is head).
    #[must_use]
    pub fn from_segments(segments: Vec<Cell>, direction: Direction) -> Self {
        debug_assert!(!segments.is_empty());

        Self {
            body: VecDeque::from(segments),
            moved: direction,
            heading: direction,
        }
    }

    /// Head position after one step in `direction`.
    #[must_use]
    pub fn peek_next_head(&self, direction: Direction) -> Cell {
        let (dx, dy) = direction.delta();
        self.head().offset(dx, dy)
    }

    /// True when `next_head` hits a wall or any current segment.
    ///
    /// The tail counts even though a plain move would vacate it this tick.
    #[must_use]
    pub fn would_collide(&self, next_head: Cell, walls: &Walls) -> bool {
        walls.contains(next_head) || self.occupies(next_head)
    }

    /// Pushes `next_head` and drops the tail unless the snake `grew`.
    ///
    /// Also commits the current heading as the direction last moved in.
    pub fn advance(&mut self, next_head: Cell, grew: bool) {
        self.body.push_front(next_head);
        if !grew {
            let _ = self.body.pop_back();
        }
        self.moved = self.heading;
    }

    /// Changes the heading for the next tick. Returns false for reversals.
    ///
    /// Reversal is judged against the direction of the last completed move,
    /// not a heading set earlier in the same tick.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if !direction_change_is_valid(self.moved, direction) {
            return false;
        }

        self.heading = direction;
        true
    }

    /// Direction the next tick will move in.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.heading
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Cell {
        *self
            .body
            .front()
            .expect("snake body must always contain at least one segment")
    }

    #[must_use]
    pub fn tail(&self) -> Cell {
        *self
            .body
            .back()
            .expect("snake body must always contain at least one segment")
    }

    /// Returns true if any segment occupies `cell`.
    #[must_use]
    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Cell> {
        self.body.iter()
    }
}
