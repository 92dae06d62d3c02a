//! Grid module - fixed-size cell space and occupancy
//!
//! The grid is a `width x height` array of cells stored flat in row-major
//! order (`y * width + x`). Each cell holds at most one tile id.
//! Coordinates: x grows left to right, y grows top to bottom, so
//! [`Direction::Up`] points towards row 0.

use arrayvec::ArrayVec;
use rand::Rng;

use crate::error::{EngineError, Result};
use crate::types::{Cell, Direction, TileId};

/// Cell space plus per-cell occupancy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u8,
    height: u8,
    /// Occupant of each cell, row-major
    cells: Vec<Option<TileId>>,
}

impl Grid {
    /// Create an empty grid
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || x >= self.width as i32 || y < 0 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    #[inline(always)]
    fn cell_index(&self, cell: Cell) -> Option<usize> {
        self.index(cell.x as i32, cell.y as i32)
    }

    #[inline(always)]
    fn cell_at(&self, index: usize) -> Cell {
        let width = self.width as usize;
        Cell::new((index % width) as u8, (index / width) as u8)
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Total number of cells
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// Get the cell at (x, y)
    /// Returns None outside `[0, width) x [0, height)`
    pub fn get_cell(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|_| Cell::new(x as u8, y as u8))
    }

    /// Neighbouring cell one step in `direction`, or None at the boundary
    pub fn adjacent_cell(&self, cell: Cell, direction: Direction) -> Option<Cell> {
        let (dx, dy) = direction.delta();
        self.get_cell(cell.x as i32 + dx as i32, cell.y as i32 + dy as i32)
    }

    /// All in-bounds neighbours of `cell` (up, down, left, right)
    pub fn neighbors(&self, cell: Cell) -> ArrayVec<Cell, 4> {
        Direction::ALL
            .iter()
            .filter_map(|&dir| self.adjacent_cell(cell, dir))
            .collect()
    }

    /// Tile occupying `cell`, if any
    pub fn occupant(&self, cell: Cell) -> Option<TileId> {
        self.cell_index(cell).and_then(|idx| self.cells[idx])
    }

    /// Check if `cell` is inside the grid and unoccupied
    pub fn is_empty_cell(&self, cell: Cell) -> bool {
        matches!(self.cell_index(cell).map(|idx| self.cells[idx]), Some(None))
    }

    /// Set the occupant of `cell`
    pub(crate) fn set_occupant(&mut self, cell: Cell, tile: Option<TileId>) -> Result<()> {
        let idx = self.cell_index(cell).ok_or(EngineError::OutOfBoundsCell {
            x: cell.x as i32,
            y: cell.y as i32,
        })?;
        self.cells[idx] = tile;
        Ok(())
    }

    /// Number of unoccupied cells
    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    /// Iterate all cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.cells.len()).map(move |idx| self.cell_at(idx))
    }

    /// Pick an empty cell using a linear scan from a random start index
    ///
    /// Scans `i, i+1, ...` wrapping at the end, and gives up after visiting
    /// every cell once. Returns None when the grid is full.
    pub fn random_empty_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Cell> {
        let size = self.cells.len();
        if size == 0 {
            return None;
        }

        self.first_empty_from(rng.gen_range(0..size))
    }

    /// First empty cell at flat index `start` or after it, wrapping to 0
    fn first_empty_from(&self, start: usize) -> Option<Cell> {
        let size = self.cells.len();
        (0..size)
            .map(|step| (start + step) % size)
            .find(|&idx| self.cells[idx].is_none())
            .map(|idx| self.cell_at(idx))
    }

    /// Clear all occupancy
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }
}
