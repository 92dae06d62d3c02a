//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the engine.
//! All types are plain data with no engine logic, making them usable in any
//! context (rules core, renderers, hosts shipping snapshots over a wire).
//!
//! # Board Dimensions
//!
//! Classic 2048 playfield dimensions:
//!
//! - **Width**: 4 columns (indexed 0-3, left to right)
//! - **Height**: 4 rows (indexed 0-3, top to bottom)
//!
//! Both are configurable at runtime; these are only the defaults.
//!
//! # Rank Ladder
//!
//! Tiles carry a [`Rank`], an index into a fixed ladder of nominal values:
//!
//! | Rank | Value |
//! |------|-------|
//! | 0 | 2 |
//! | 1 | 4 |
//! | 2 | 8 |
//! | ... | ... |
//! | 10 | 2048 |
//!
//! Merging two tiles of rank `r` yields rank `r + 1`, clamped at the top of
//! the configured ladder.
//!
//! # Examples
//!
//! ```
//! use tile_merge_types::{Direction, Rank, RankLadder, DEFAULT_WIDTH, DEFAULT_HEIGHT};
//!
//! let ladder = RankLadder::default();
//! assert_eq!(ladder.lowest().value(), 2);
//! assert_eq!(ladder.highest().value(), 2048);
//! assert_eq!(ladder.promote(Rank::new(1)), Rank::new(2));
//!
//! assert_eq!(Direction::from_str("left"), Some(Direction::Left));
//! assert_eq!(Direction::Up.delta(), (0, -1));
//!
//! assert_eq!(DEFAULT_WIDTH, 4);
//! assert_eq!(DEFAULT_HEIGHT, 4);
//! ```

use serde::{Deserialize, Serialize};

/// Default board width in cells (4 columns)
pub const DEFAULT_WIDTH: u8 = 4;

/// Default board height in cells (4 rows)
pub const DEFAULT_HEIGHT: u8 = 4;

/// Default number of rungs on the rank ladder (2 through 2048)
pub const DEFAULT_RANK_COUNT: u8 = 11;

/// Largest rank ladder that still fits nominal values in a `u32`
pub const MAX_RANK_COUNT: u8 = 31;

/// Smallest nominal value a merge must produce to extend a streak
pub const STREAK_MIN_VALUE: u32 = 4;

/// Number of tiles placed by a fresh game
pub const INITIAL_TILES: u8 = 2;


/// The four slide directions
///
/// Coordinates grow rightwards (x) and downwards (y), so `Up` moves
/// tiles towards row 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions, in the order hosts usually try them
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit vector `(dx, dy)` for this direction
    pub fn delta(&self) -> (i8, i8) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Parse direction from string (case-insensitive)
    ///
    /// Accepts full names or single letters: "up" | "u", "down" | "d",
    /// "left" | "l", "right" | "r".
    ///
    /// # Examples
    ///
    /// ```
    /// use tile_merge_types::Direction;
    ///
    /// assert_eq!(Direction::from_str("UP"), Some(Direction::Up));
    /// assert_eq!(Direction::from_str("r"), Some(Direction::Right));
    /// assert_eq!(Direction::from_str("sideways"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" | "u" => Some(Direction::Up),
            "down" | "d" => Some(Direction::Down),
            "left" | "l" => Some(Direction::Left),
            "right" | "r" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

/// A rung on the rank ladder
///
/// Ranks are ordered; two tiles of equal rank may merge. The nominal value
/// of rank `i` is `2^(i + 1)`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Rank(u8);

impl Rank {
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    pub const fn index(&self) -> u8 {
        self.0
    }

    /// Nominal value shown on the tile (2, 4, 8, ...)
    pub const fn value(&self) -> u32 {
        2u32 << self.0
    }
}

/// The configured set of ranks a tile can hold
///
/// Merges promote along the ladder and stop at its top rung.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RankLadder {
    len: u8,
}

impl RankLadder {
    /// Create a ladder with `len` rungs, clamped to `1..=MAX_RANK_COUNT`
    pub fn new(len: u8) -> Self {
        Self {
            len: len.clamp(1, MAX_RANK_COUNT),
        }
    }

    pub fn len(&self) -> u8 {
        self.len
    }

    pub fn lowest(&self) -> Rank {
        Rank(0)
    }

    pub fn highest(&self) -> Rank {
        Rank(self.len - 1)
    }

    /// Rank produced by merging two tiles of `rank`, clamped at the top
    pub fn promote(&self, rank: Rank) -> Rank {
        Rank(rank.0.saturating_add(1).min(self.highest().0))
    }

    pub fn contains(&self, rank: Rank) -> bool {
        rank.0 < self.len
    }

    /// Inverse of [`Rank::value`], restricted to this ladder
    pub fn rank_of(&self, value: u32) -> Option<Rank> {
        if value < 2 || !value.is_power_of_two() {
            return None;
        }
        let rank = Rank((value.trailing_zeros() - 1) as u8);
        self.contains(rank).then_some(rank)
    }
}

impl Default for RankLadder {
    fn default() -> Self {
        Self::new(DEFAULT_RANK_COUNT)
    }
}

/// A grid coordinate
///
/// Cells are fixed for the lifetime of a grid; only their occupancy changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: u8,
    pub y: u8,
}

impl Cell {
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }
}

/// Stable tile identity, unique within one game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(pub u32);
