//! Move resolution - slide and merge every tile in one direction
//!
//! One call resolves one whole move atomically:
//!
//! 1. Cells are visited so that tiles nearest the destination edge settle
//!    first (see [`ScanOrder`]).
//! 2. Each tile walks towards the edge while the next cell is empty.
//! 3. If the walk is blocked by an equal-rank tile that has not merged yet
//!    this move, the two merge: the moving tile disappears, the blocker is
//!    promoted one rank (clamped at the top of the ladder) and locked.
//!    Otherwise the tile settles on the farthest empty cell it reached.
//! 4. Once every tile has been visited all locks are cleared.
//! 5. If anything moved, the streak is updated from the merges.
//!
//! The resolver never spawns tiles and never decides game over; that is the
//! session's finalize step.

use serde::{Deserialize, Serialize};

use crate::board::{can_merge, Board, Tile};
use crate::grid::Grid;
use crate::streak::StreakState;
use crate::types::{Cell, Direction, Rank, TileId};

/// One merge performed during a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MergeEvent {
    /// Tile that stayed and was promoted
    pub survivor: TileId,
    /// Tile that slid in and was destroyed
    pub absorbed: TileId,
    /// Where the merge happened
    pub cell: Cell,
    pub absorbed_rank: Rank,
    pub new_rank: Rank,
    /// Nominal value of `new_rank`
    pub points: u32,
}

/// How one tile travelled during a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileMotion {
    pub tile_id: TileId,
    pub from: Cell,
    pub to: Cell,
    /// Set when the tile ended the move absorbed into another tile
    pub merged_into: Option<TileId>,
}

/// Outcome of one move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResult {
    pub direction: Direction,
    pub board_changed: bool,
    pub merge_events: Vec<MergeEvent>,
    /// Slides and merges, in scan order
    pub motions: Vec<TileMotion>,
    pub streak_incremented: bool,
}

impl MoveResult {
    fn new(direction: Direction) -> Self {
        Self {
            direction,
            board_changed: false,
            merge_events: Vec::new(),
            motions: Vec::new(),
            streak_incremented: false,
        }
    }

    /// Sum of points over all merges
    pub fn points_awarded(&self) -> u32 {
        self.merge_events
            .iter()
            .fold(0u32, |acc, m| acc.saturating_add(m.points))
    }
}

/// Traversal order for a move
///
/// Starts at the edge tiles are moving towards and works backwards, columns
/// in the outer loop and rows in the inner loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOrder {
    pub start_x: i32,
    pub increment_x: i32,
    pub start_y: i32,
    pub increment_y: i32,
}

impl ScanOrder {
    pub fn for_direction(direction: Direction, width: u8, height: u8) -> Self {
        let last_x = width as i32 - 1;
        let last_y = height as i32 - 1;
        match direction {
            Direction::Up | Direction::Left => Self {
                start_x: 0,
                increment_x: 1,
                start_y: 0,
                increment_y: 1,
            },
            Direction::Down => Self {
                start_x: 0,
                increment_x: 1,
                start_y: last_y,
                increment_y: -1,
            },
            Direction::Right => Self {
                start_x: last_x,
                increment_x: -1,
                start_y: 0,
                increment_y: 1,
            },
        }
    }

    /// Every cell of `grid` in traversal order
    pub fn cells(&self, grid: &Grid) -> Vec<Cell> {
        let mut out = Vec::with_capacity(grid.size());
        let mut x = self.start_x;
        while grid.get_cell(x, self.start_y).is_some() {
            let mut y = self.start_y;
            while let Some(cell) = grid.get_cell(x, y) {
                out.push(cell);
                y += self.increment_y;
            }
            x += self.increment_x;
        }
        out
    }
}

/// Resolve one move in `direction`, mutating `board` and `streak`
pub fn resolve_move(
    board: &mut Board,
    streak: &mut StreakState,
    direction: Direction,
    streak_min_value: u32,
) -> MoveResult {
    let mut result = MoveResult::new(direction);

    let order = ScanOrder::for_direction(direction, board.width(), board.height());
    for cell in order.cells(board.grid()) {
        if let Some(id) = board.grid().occupant(cell) {
            move_tile(board, id, direction, &mut result);
        }
    }

    board.unlock_all();

    result.board_changed = !result.motions.is_empty();
    if result.board_changed {
        result.streak_incremented = streak.record_move(&result.merge_events, streak_min_value);
    }

    debug_assert!(board.check_invariants(), "board invariants broken after move");
    result
}

fn move_tile(board: &mut Board, id: TileId, direction: Direction, result: &mut MoveResult) {
    let Some(tile) = board.tile(id).copied() else {
        debug_assert!(false, "grid names {id:?} but the board has no such tile");
        return;
    };

    let mut destination = None;
    let mut next = board.grid().adjacent_cell(tile.cell, direction);

    while let Some(cell) = next {
        if let Some(occupant) = board.tile_at(cell).copied() {
            if can_merge(&tile, &occupant) {
                merge_tiles(board, &tile, &occupant, result);
                return;
            }
            break;
        }

        destination = Some(cell);
        next = board.grid().adjacent_cell(cell, direction);
    }

    if let Some(to) = destination {
        if board.relocate(id, to).is_none() {
            debug_assert!(false, "failed to slide {id:?} to {to:?}");
            return;
        }
        result.motions.push(TileMotion {
            tile_id: id,
            from: tile.cell,
            to,
            merged_into: None,
        });
    }
}

fn merge_tiles(board: &mut Board, moving: &Tile, target: &Tile, result: &mut MoveResult) {
    // A missing target must leave the moving tile in place.
    let Some(new_rank) = board.promote_and_lock(target.id) else {
        debug_assert!(false, "merge target {:?} is not on the board", target.id);
        return;
    };
    if board.remove_tile(moving.id).is_none() {
        debug_assert!(false, "merging tile {:?} is not on the board", moving.id);
        return;
    }

    result.motions.push(TileMotion {
        tile_id: moving.id,
        from: moving.cell,
        to: target.cell,
        merged_into: Some(target.id),
    });
    result.merge_events.push(MergeEvent {
        survivor: target.id,
        absorbed: moving.id,
        cell: target.cell,
        absorbed_rank: moving.rank,
        new_rank,
        points: new_rank.value(),
    });
}
