//! Tile-merge engine (workspace facade crate).
//!
//! This package exposes `tile_merge::{core, types}` as a single dependency
//! while the implementation lives in dedicated crates under `crates/`.

pub use tile_merge_core as core;
pub use tile_merge_types as types;
