//! Error types raised by the engine.
//!
//! Every variant is a contract violation by the caller, never an I/O
//! failure: move resolution only touches in-memory state.

use thiserror::Error;

/// Errors surfaced by board and session operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("move rejected: the previous move has not been finalized")]
    InvalidMoveWhileResolving,

    #[error("no move is waiting to be finalized")]
    NoPendingMove,

    #[error("game is over; start a new game first")]
    GameOver,

    #[error("cannot spawn a tile: board is full")]
    BoardFullOnSpawn,

    #[error("cell ({x}, {y}) is outside the grid")]
    OutOfBoundsCell { x: i32, y: i32 },

    #[error("cell ({x}, {y}) is already occupied")]
    CellOccupied { x: u8, y: u8 },

    #[error("tile value {0} is not on the rank ladder")]
    InvalidTileValue(u32),

    #[error("expected {expected} cells, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors reported by [`crate::config::EngineConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("grid dimensions must be non-zero, got {width}x{height}")]
    EmptyGrid { width: u8, height: u8 },

    #[error("rank count must be in 1..={max}, got {actual}")]
    RankCount { actual: u8, max: u8 },

    #[error("{initial} initial tiles do not fit in {size} cells")]
    TooManyInitialTiles { initial: u8, size: usize },

    #[error("board is {board_width}x{board_height} with {board_ranks} ranks, config expects {width}x{height} with {ranks}")]
    BoardMismatch {
        board_width: u8,
        board_height: u8,
        board_ranks: u8,
        width: u8,
        height: u8,
        ranks: u8,
    },
}
