//! Board module - the grid plus its live tiles
//!
//! The board owns every tile. The grid records which tile sits in each cell
//! and each tile records its own cell; the two always agree.
//! Tiles are created by [`Board::spawn_tile`] and destroyed when absorbed by
//! a merge.

use rand::Rng;

use crate::error::{EngineError, Result};
use crate::grid::Grid;
use crate::snapshot::{BoardSnapshot, TileSnapshot};
use crate::types::{Cell, Direction, Rank, RankLadder, TileId};

/// A live tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub id: TileId,
    pub rank: Rank,
    /// Set once the tile has absorbed a merge during the current move
    pub locked: bool,
    pub cell: Cell,
}

/// Two tiles may merge when their ranks match and the target has not
/// already merged this move
pub fn can_merge(moving: &Tile, target: &Tile) -> bool {
    moving.rank == target.rank && !target.locked
}

/// The game board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    grid: Grid,
    tiles: Vec<Tile>,
    ladder: RankLadder,
    next_id: u32,
}

impl Board {
    /// Create a new empty board
    pub fn new(width: u8, height: u8, ladder: RankLadder) -> Self {
        Self {
            grid: Grid::new(width, height),
            tiles: Vec::with_capacity(width as usize * height as usize),
            ladder,
            next_id: 0,
        }
    }

    /// Build a board from row-major nominal values (0 = empty)
    ///
    /// # Examples
    ///
    /// ```
    /// use tile_merge_core::Board;
    /// use tile_merge_core::types::RankLadder;
    ///
    /// let board = Board::from_values(RankLadder::default(), 2, 2, &[2, 4, 0, 8]).unwrap();
    /// assert_eq!(board.tile_count(), 3);
    /// assert_eq!(board.values(), vec![2, 4, 0, 8]);
    /// ```
    pub fn from_values(ladder: RankLadder, width: u8, height: u8, values: &[u32]) -> Result<Self> {
        let mut board = Self::new(width, height, ladder);
        if values.len() != board.grid.size() {
            return Err(EngineError::DimensionMismatch {
                expected: board.grid.size(),
                actual: values.len(),
            });
        }

        let cells: Vec<Cell> = board.grid.cells().collect();
        for (cell, &value) in cells.into_iter().zip(values) {
            if value == 0 {
                continue;
            }
            let rank = ladder
                .rank_of(value)
                .ok_or(EngineError::InvalidTileValue(value))?;
            board.place_tile(cell, rank)?;
        }
        Ok(board)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn ladder(&self) -> RankLadder {
        self.ladder
    }

    pub fn width(&self) -> u8 {
        self.grid.width()
    }

    pub fn height(&self) -> u8 {
        self.grid.height()
    }

    /// Live tiles (order is not meaningful)
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.id == id)
    }

    fn tile_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.tiles.iter_mut().find(|t| t.id == id)
    }

    /// Tile occupying `cell`, if any
    pub fn tile_at(&self, cell: Cell) -> Option<&Tile> {
        self.grid.occupant(cell).and_then(|id| self.tile(id))
    }

    /// Rank at (x, y); None if empty or out of bounds
    pub fn rank_at(&self, x: i32, y: i32) -> Option<Rank> {
        self.grid
            .get_cell(x, y)
            .and_then(|cell| self.tile_at(cell))
            .map(|t| t.rank)
    }

    pub fn is_full(&self) -> bool {
        self.tiles.len() == self.grid.size()
    }

    /// Highest rank on the board
    pub fn max_rank(&self) -> Option<Rank> {
        self.tiles.iter().map(|t| t.rank).max()
    }

    /// Row-major nominal values, 0 for empty cells
    pub fn values(&self) -> Vec<u32> {
        self.grid
            .cells()
            .map(|cell| self.tile_at(cell).map_or(0, |t| t.rank.value()))
            .collect()
    }

    /// Empty all cells and remove all tiles
    ///
    /// Streak state belongs to the session and is not touched here.
    pub fn clear(&mut self) {
        self.grid.clear();
        self.tiles.clear();
        self.next_id = 0;
    }

    /// Place a new tile at `cell`
    pub fn place_tile(&mut self, cell: Cell, rank: Rank) -> Result<TileId> {
        if !self.ladder.contains(rank) {
            return Err(EngineError::InvalidTileValue(rank.value()));
        }
        match self.grid.get_cell(cell.x as i32, cell.y as i32) {
            None => {
                return Err(EngineError::OutOfBoundsCell {
                    x: cell.x as i32,
                    y: cell.y as i32,
                })
            }
            Some(_) if !self.grid.is_empty_cell(cell) => {
                return Err(EngineError::CellOccupied {
                    x: cell.x,
                    y: cell.y,
                })
            }
            Some(_) => {}
        }

        let id = TileId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.grid.set_occupant(cell, Some(id))?;
        self.tiles.push(Tile {
            id,
            rank,
            locked: false,
            cell,
        });
        Ok(id)
    }

    /// Spawn a tile of `rank` in a random empty cell
    ///
    /// Callers are expected to check [`Board::is_full`] first.
    pub fn spawn_tile<R: Rng + ?Sized>(&mut self, rank: Rank, rng: &mut R) -> Result<(TileId, Cell)> {
        let cell = self
            .grid
            .random_empty_cell(rng)
            .ok_or(EngineError::BoardFullOnSpawn)?;
        let id = self.place_tile(cell, rank)?;
        Ok((id, cell))
    }

    /// Move a tile to an empty cell
    ///
    /// Returns None, leaving the board untouched, if the tile is unknown or
    /// `to` is not an empty in-bounds cell.
    pub(crate) fn relocate(&mut self, id: TileId, to: Cell) -> Option<()> {
        if !self.grid.is_empty_cell(to) {
            return None;
        }
        let from = self.tile(id)?.cell;
        self.grid.set_occupant(from, None).ok()?;
        self.grid.set_occupant(to, Some(id)).ok()?;
        self.tile_mut(id)?.cell = to;
        Some(())
    }

    /// Remove a tile from the board, returning it
    pub(crate) fn remove_tile(&mut self, id: TileId) -> Option<Tile> {
        let pos = self.tiles.iter().position(|t| t.id == id)?;
        let tile = self.tiles.swap_remove(pos);
        // The cell may already belong to another tile if the caller moved one in.
        if self.grid.occupant(tile.cell) == Some(id) {
            self.grid.set_occupant(tile.cell, None).ok()?;
        }
        Some(tile)
    }

    /// Promote a tile one rung (clamped) and lock it for the rest of the move
    pub(crate) fn promote_and_lock(&mut self, id: TileId) -> Option<Rank> {
        let ladder = self.ladder;
        let tile = self.tile_mut(id)?;
        tile.rank = ladder.promote(tile.rank);
        tile.locked = true;
        Some(tile.rank)
    }

    /// Clear every `locked` flag
    pub(crate) fn unlock_all(&mut self) {
        for tile in &mut self.tiles {
            tile.locked = false;
        }
    }

    /// Check whether sliding in `direction` would change the board
    ///
    /// A slide changes the board exactly when some tile has an empty cell
    /// or an equal-rank tile directly ahead of it.
    pub fn can_move(&self, direction: Direction) -> bool {
        self.tiles.iter().any(|tile| {
            self.grid
                .adjacent_cell(tile.cell, direction)
                .is_some_and(|ahead| match self.tile_at(ahead) {
                    None => true,
                    Some(other) => other.rank == tile.rank,
                })
        })
    }

    /// Check if any tile has an orthogonal neighbour of the same rank
    pub fn has_merge_neighbor(&self) -> bool {
        self.tiles.iter().any(|tile| {
            self.grid
                .neighbors(tile.cell)
                .iter()
                .filter_map(|&cell| self.tile_at(cell))
                .any(|other| can_merge(tile, other))
        })
    }

    /// Board is full and no two neighbouring tiles share a rank
    pub fn is_terminal(&self) -> bool {
        self.is_full() && !self.has_merge_neighbor()
    }

    pub fn has_moves(&self) -> bool {
        !self.is_terminal()
    }

    /// Verify grid/tile agreement
    pub fn check_invariants(&self) -> bool {
        if self.tiles.len() > self.grid.size() {
            return false;
        }
        let tiles_agree = self
            .tiles
            .iter()
            .all(|t| self.grid.occupant(t.cell) == Some(t.id));
        let occupied = self.grid.size() - self.grid.empty_count();
        tiles_agree && occupied == self.tiles.len()
    }

    pub fn snapshot_into(&self, out: &mut BoardSnapshot) {
        out.width = self.width();
        out.height = self.height();
        out.tiles.clear();
        out.tiles.extend(self.grid.cells().filter_map(|cell| {
            self.tile_at(cell).map(|t| TileSnapshot {
                id: t.id,
                cell,
                rank: t.rank,
                value: t.rank.value(),
            })
        }));
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let mut s = BoardSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}
