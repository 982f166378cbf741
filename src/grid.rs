use std::fmt;

use serde::Deserialize;

use crate::config::ConfigError;

/// Grid position in logical cell coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the neighbouring cell offset by `(dx, dy)`.
    #[must_use]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Axis-aligned rectangle in pixel space, origin at the top-left.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Inclusive rectangle of cells where no obstacle may be placed.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SafeZone {
    pub min: Cell,
    pub max: Cell,
}

impl SafeZone {
    /// A zone that contains no cell at all.
    pub const EMPTY: Self = Self {
        min: Cell::new(0, 0),
        max: Cell::new(-1, -1),
    };

    #[must_use]
    pub fn contains(self, cell: Cell) -> bool {
        cell.x >= self.min.x && cell.x <= self.max.x && cell.y >= self.min.y && cell.y <= self.max.y
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }
}

/// Fixed board dimensions expressed both in pixels and in cells.
///
/// The border ring is part of the grid; it is simply always occupied by
/// walls. "Interior" cells are those at least one cell away from every edge.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GridGeometry {
    width_px: i32,
    height_px: i32,
    cell_size: i32,
}

impl GridGeometry {
    /// Validates pixel dimensions and cell size.
    pub fn new(width_px: i32, height_px: i32, cell_size: i32) -> Result<Self, ConfigError> {
        for (name, value) in [
            ("width", width_px),
            ("height", height_px),
            ("cell_size", cell_size),
        ] {
            if value <= 0 {
                return Err(ConfigError::NonPositive { name, value });
            }
        }

        if width_px % cell_size != 0 || height_px % cell_size != 0 {
            return Err(ConfigError::CellSizeMismatch {
                width: width_px,
                height: height_px,
                cell_size,
            });
        }

        let geometry = Self {
            width_px,
            height_px,
            cell_size,
        };

        // A border ring plus at least one interior cell.
        if geometry.columns() < 3 || geometry.rows() < 3 {
            return Err(ConfigError::GridTooSmall {
                columns: geometry.columns(),
                rows: geometry.rows(),
            });
        }

        Ok(geometry)
    }

    #[must_use]
    pub fn columns(self) -> i32 {
        self.width_px / self.cell_size
    }

    #[must_use]
    pub fn rows(self) -> i32 {
        self.height_px / self.cell_size
    }

    #[must_use]
    pub fn cell_size(self) -> i32 {
        self.cell_size
    }

    #[must_use]
    pub fn pixel_size(self) -> (i32, i32) {
        (self.width_px, self.height_px)
    }

    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::try_from(self.columns() * self.rows()).unwrap_or(0)
    }

    /// Returns true when the cell lies inside the grid, border included.
    #[must_use]
    pub fn in_bounds(self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.columns() && cell.y < self.rows()
    }

    #[must_use]
    pub fn is_border(self, cell: Cell) -> bool {
        self.in_bounds(cell)
            && (cell.x == 0
                || cell.y == 0
                || cell.x == self.columns() - 1
                || cell.y == self.rows() - 1)
    }

    #[must_use]
    pub fn is_interior(self, cell: Cell) -> bool {
        self.in_bounds(cell) && !self.is_border(cell)
    }

    /// Inclusive column range of interior cells.
    #[must_use]
    pub fn interior_columns(self) -> std::ops::RangeInclusive<i32> {
        1..=self.columns() - 2
    }

    /// Inclusive row range of interior cells.
    #[must_use]
    pub fn interior_rows(self) -> std::ops::RangeInclusive<i32> {
        1..=self.rows() - 2
    }

    /// Iterates every cell row by row.
    pub fn cells(self) -> impl Iterator<Item = Cell> {
        let columns = self.columns();
        (0..self.rows()).flat_map(move |y| (0..columns).map(move |x| Cell { x, y }))
    }

    pub fn border_cells(self) -> impl Iterator<Item = Cell> {
        self.cells().filter(move |cell| self.is_border(*cell))
    }

    pub fn interior_cells(self) -> impl Iterator<Item = Cell> {
        self.cells().filter(move |cell| self.is_interior(*cell))
    }

    /// Top-left pixel of `cell`.
    #[must_use]
    pub fn to_pixels(self, cell: Cell) -> (i32, i32) {
        (cell.x * self.cell_size, cell.y * self.cell_size)
    }

    /// Cell containing the pixel `(x, y)`.
    #[must_use]
    pub fn cell_at(self, x: i32, y: i32) -> Cell {
        Cell {
            x: x.div_euclid(self.cell_size),
            y: y.div_euclid(self.cell_size),
        }
    }

    /// Cells whose pixel square overlaps `rect` with a non-zero area.
    ///
    /// Returned as an inclusive cell rectangle; empty for degenerate input.
    #[must_use]
    pub fn cells_overlapping(self, rect: PixelRect) -> SafeZone {
        if rect.width <= 0 || rect.height <= 0 {
            return SafeZone::EMPTY;
        }

        let min = self.cell_at(rect.x, rect.y);
        let max = self.cell_at(rect.x + rect.width - 1, rect.y + rect.height - 1);
        SafeZone { min, max }
    }
}
