use serde::{Deserialize, Serialize};

use crate::types::{Cell, Rank, TileId};

/// Read-only view of one tile for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileSnapshot {
    pub id: TileId,
    pub cell: Cell,
    pub rank: Rank,
    pub value: u32,
}

/// Read-only view of the board, tiles in row-major cell order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub width: u8,
    pub height: u8,
    pub tiles: Vec<TileSnapshot>,
}

impl BoardSnapshot {
    pub fn clear(&mut self) {
        self.width = 0;
        self.height = 0;
        self.tiles.clear();
    }

    /// `(cell, rank)` pairs for every occupied cell
    pub fn cells(&self) -> impl Iterator<Item = (Cell, Rank)> + '_ {
        self.tiles.iter().map(|t| (t.cell, t.rank))
    }

    pub fn rank_at(&self, cell: Cell) -> Option<Rank> {
        self.tiles.iter().find(|t| t.cell == cell).map(|t| t.rank)
    }

    /// Row-major nominal values, 0 for empty cells
    ///
    /// Tiles whose cell lies outside `width x height` are skipped.
    pub fn values(&self) -> Vec<u32> {
        let width = self.width as usize;
        let mut out = vec![0u32; width * self.height as usize];
        for t in &self.tiles {
            if t.cell.x >= self.width || t.cell.y >= self.height {
                continue;
            }
            out[t.cell.y as usize * width + t.cell.x as usize] = t.value;
        }
        out
    }
}

/// Lifecycle phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Accepting a move
    Idle,
    /// A board-changing move is waiting for `finalize_move`
    Resolving,
    /// No moves remain; only `new_game` is accepted
    GameOver,
}

/// Everything a presentation layer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub board: BoardSnapshot,
    pub score: u32,
    pub best_score: u32,
    pub streak_count: u32,
    pub moves: u32,
    pub phase: Phase,
}

impl SessionSnapshot {
    pub fn playable(&self) -> bool {
        self.phase == Phase::Idle
    }
}
