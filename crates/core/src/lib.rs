//! Core rules engine - pure, deterministic, and testable
//!
//! This crate contains every rule of the tile-merge game: grid topology,
//! move resolution, merge and streak bookkeeping, spawn policy, and game-over
//! detection. It has **no dependencies** on rendering, input or storage:
//!
//! - **Deterministic**: Same seed and same moves produce identical games
//! - **Atomic**: A move is resolved entirely inside one call
//! - **Host-driven**: Spawn timing is left to the caller (two-phase moves)
//!
//! # Module Structure
//!
//! - [`grid`]: Fixed-size cell space, adjacency and random empty-cell scan
//! - [`board`]: Grid plus live tiles; spawn, fullness and terminal checks
//! - [`resolver`]: Slide/merge algorithm producing a [`MoveResult`]
//! - [`streak`]: Escalating-merge streak rules
//! - [`session`]: Score, streak and phase across turns
//! - [`events`]: Listener registration for session events
//! - [`snapshot`]: Read-only views for renderers
//! - [`config`]: Dimensions, rank ladder and seed
//! - [`rng`]: Seeded spawn RNG
//!
//! # Game Rules
//!
//! - **Slides**: Every tile travels as far as it can in the chosen direction
//! - **Merges**: Equal ranks combine into the next rank, awarding its value
//! - **One merge per tile per move**: A merged tile is locked until the move ends
//! - **Spawns**: One lowest-rank tile after each board-changing move
//! - **Game over**: Board full with no equal neighbours
//!
//! # Example
//!
//! ```
//! use tile_merge_core::{EngineConfig, GameSession};
//! use tile_merge_core::types::Direction;
//!
//! let mut game = GameSession::new(EngineConfig::default().with_seed(12345)).unwrap();
//!
//! // Phase 1: resolve the slide.
//! let result = game.apply_move(Direction::Left).unwrap();
//!
//! // Phase 2: spawn and check for game over, once the host is ready.
//! if result.board_changed {
//!     let outcome = game.finalize_move().unwrap();
//!     assert!(outcome.spawned);
//! }
//!
//! assert!(game.board().tile_count() >= 2);
//! ```

pub mod board;
pub mod config;
pub mod error;
pub mod events;
pub mod grid;
pub mod resolver;
pub mod rng;
pub mod session;
pub mod snapshot;
pub mod streak;

pub use tile_merge_types as types;

// Re-export commonly used types for convenience
pub use board::{can_merge, Board, Tile};
pub use config::EngineConfig;
pub use error::{ConfigError, EngineError};
pub use events::{EventBus, GameEvent};
pub use grid::Grid;
pub use resolver::{resolve_move, MergeEvent, MoveResult, ScanOrder, TileMotion};
pub use rng::GameRng;
pub use session::{FinalizeOutcome, GameSession};
pub use snapshot::{BoardSnapshot, Phase, SessionSnapshot, TileSnapshot};
pub use streak::StreakState;
