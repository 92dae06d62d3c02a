//! Session events and listener registration.
//!
//! Hosts register callbacks on the session they own; there is no global
//! broadcast. Listeners run synchronously, in registration order, from inside
//! the session call that produced the event.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::resolver::MergeEvent;
use crate::types::{Cell, Rank, TileId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// Board cleared and initial tiles placed
    NewGame,
    TileMerged {
        event: MergeEvent,
        /// Streak count after the move that produced this merge
        streak_count: u32,
    },
    ScoreChanged {
        score: u32,
        best: u32,
    },
    TileSpawned {
        tile_id: TileId,
        cell: Cell,
        rank: Rank,
    },
    GameOver {
        score: u32,
    },
}

pub type Listener = Box<dyn FnMut(&GameEvent)>;

/// Ordered set of listeners
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Listener>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&GameEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn emit(&mut self, event: &GameEvent) {
        for listener in &mut self.listeners {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
