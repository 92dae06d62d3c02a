//! Game session - orchestrates the board across turns
//!
//! A session owns the board, score, streak and spawn RNG. Moves follow a
//! two-phase protocol so hosts can play animations between resolution and
//! the follow-up spawn:
//!
//! 1. [`GameSession::apply_move`] resolves the slide synchronously. If the
//!    board changed, the session enters [`Phase::Resolving`] and rejects
//!    further moves.
//! 2. [`GameSession::finalize_move`], called whenever the host is ready,
//!    spawns one lowest-rank tile (if there is room), checks for game over
//!    and returns to [`Phase::Idle`] or [`Phase::GameOver`].
//!
//! Hosts without a presentation delay can use [`GameSession::play`].

use arrayvec::ArrayVec;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::config::EngineConfig;
use crate::error::{ConfigError, EngineError, Result};
use crate::events::{EventBus, GameEvent};
use crate::resolver::{resolve_move, MoveResult};
use crate::rng::GameRng;
use crate::snapshot::{BoardSnapshot, Phase, SessionSnapshot};
use crate::streak::StreakState;
use crate::types::{Direction, TileId};

/// Result of the deferred half of a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizeOutcome {
    pub spawned: bool,
    pub game_over: bool,
}

/// One game, from `new_game` to game over
#[derive(Debug)]
pub struct GameSession<R: RngCore = GameRng> {
    config: EngineConfig,
    board: Board,
    streak: StreakState,
    score: u32,
    best_score: u32,
    /// Board-changing moves accepted this game
    moves: u32,
    phase: Phase,
    rng: R,
    events: EventBus,
}

impl GameSession<GameRng> {
    /// Start a session using the seeded default RNG
    ///
    /// # Examples
    ///
    /// ```
    /// use tile_merge_core::{EngineConfig, GameSession};
    ///
    /// let session = GameSession::new(EngineConfig::default()).unwrap();
    /// assert_eq!(session.board().tile_count(), 2);
    /// assert_eq!(session.score(), 0);
    /// assert_eq!(session.streak_count(), 0);
    /// ```
    pub fn new(config: EngineConfig) -> std::result::Result<Self, ConfigError> {
        Self::with_rng(config, GameRng::new(config.seed))
    }
}

impl<R: RngCore> GameSession<R> {
    /// Start a session with an injected RNG
    pub fn with_rng(config: EngineConfig, rng: R) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let mut session = Self {
            config,
            board: Board::new(config.width, config.height, config.ladder()),
            streak: StreakState::new(),
            score: 0,
            best_score: 0,
            moves: 0,
            phase: Phase::Idle,
            rng,
            events: EventBus::new(),
        };
        session.new_game();
        Ok(session)
    }

    /// Start a session from a prepared board, with no initial spawns
    pub fn with_board(
        config: EngineConfig,
        board: Board,
        rng: R,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        if board.width() != config.width
            || board.height() != config.height
            || board.ladder() != config.ladder()
        {
            return Err(ConfigError::BoardMismatch {
                board_width: board.width(),
                board_height: board.height(),
                board_ranks: board.ladder().len(),
                width: config.width,
                height: config.height,
                ranks: config.rank_count,
            });
        }

        let phase = if board.is_terminal() {
            Phase::GameOver
        } else {
            Phase::Idle
        };
        Ok(Self {
            config,
            board,
            streak: StreakState::new(),
            score: 0,
            best_score: 0,
            moves: 0,
            phase,
            rng,
            events: EventBus::new(),
        })
    }

    /// Seed the best score with a value the host persisted earlier
    pub fn with_best_score(mut self, best: u32) -> Self {
        self.best_score = self.best_score.max(best);
        self
    }

    /// Register a listener for [`GameEvent`]s
    pub fn subscribe(&mut self, listener: impl FnMut(&GameEvent) + 'static) {
        self.events.subscribe(listener);
    }

    /// Reset score and streak, clear the board and place the initial tiles
    pub fn new_game(&mut self) {
        self.score = 0;
        self.moves = 0;
        self.streak.reset();
        self.board.clear();

        for _ in 0..self.config.initial_tiles {
            self.spawn();
        }

        self.phase = if self.board.is_terminal() {
            Phase::GameOver
        } else {
            Phase::Idle
        };
        tracing::info!(
            width = self.config.width,
            height = self.config.height,
            tiles = self.board.tile_count(),
            "new game"
        );
        self.events.emit(&GameEvent::NewGame);
        if self.phase == Phase::GameOver {
            self.events.emit(&GameEvent::GameOver { score: self.score });
        }
    }

    /// Resolve a move synchronously
    ///
    /// A move that changes nothing is returned with `board_changed == false`
    /// and leaves the session idle.
    pub fn apply_move(&mut self, direction: Direction) -> Result<MoveResult> {
        match self.phase {
            Phase::Idle => {}
            Phase::Resolving => {
                tracing::warn!(?direction, "move rejected while resolving");
                return Err(EngineError::InvalidMoveWhileResolving);
            }
            Phase::GameOver => {
                tracing::warn!(?direction, "move rejected after game over");
                return Err(EngineError::GameOver);
            }
        }

        let streak_before = self.streak.count();
        let result = resolve_move(
            &mut self.board,
            &mut self.streak,
            direction,
            self.config.streak_min_value,
        );
        if !result.board_changed {
            tracing::debug!(?direction, "move changed nothing");
            return Ok(result);
        }

        self.moves += 1;
        self.phase = Phase::Resolving;

        let points = result.points_awarded();
        tracing::debug!(
            ?direction,
            merges = result.merge_events.len(),
            points,
            streak = self.streak.count(),
            "move resolved"
        );

        let streak_count = self.streak.count();
        if result.streak_incremented {
            tracing::debug!(from = streak_before, to = streak_count, "streak extended");
        } else if streak_before > 0 {
            tracing::debug!(from = streak_before, "streak reset");
        }

        for event in &result.merge_events {
            self.events.emit(&GameEvent::TileMerged {
                event: *event,
                streak_count,
            });
        }
        if points > 0 {
            self.add_score(points);
        }

        Ok(result)
    }

    /// Spawn the follow-up tile and check for game over
    pub fn finalize_move(&mut self) -> Result<FinalizeOutcome> {
        if self.phase != Phase::Resolving {
            tracing::warn!(phase = ?self.phase, "finalize without a pending move");
            return Err(EngineError::NoPendingMove);
        }

        let spawned = !self.board.is_full() && self.spawn().is_some();
        let game_over = self.board.is_terminal();

        if game_over {
            self.phase = Phase::GameOver;
            tracing::info!(score = self.score, moves = self.moves, "game over");
            self.events.emit(&GameEvent::GameOver { score: self.score });
        } else {
            self.phase = Phase::Idle;
        }

        Ok(FinalizeOutcome { spawned, game_over })
    }

    /// Apply a move and finalize it immediately when it changed the board
    pub fn play(&mut self, direction: Direction) -> Result<(MoveResult, Option<FinalizeOutcome>)> {
        let result = self.apply_move(direction)?;
        let outcome = if result.board_changed {
            Some(self.finalize_move()?)
        } else {
            None
        };
        Ok((result, outcome))
    }

    fn spawn(&mut self) -> Option<TileId> {
        let rank = self.board.ladder().lowest();
        match self.board.spawn_tile(rank, &mut self.rng) {
            Ok((tile_id, cell)) => {
                tracing::debug!(?tile_id, ?cell, "tile spawned");
                self.events.emit(&GameEvent::TileSpawned {
                    tile_id,
                    cell,
                    rank,
                });
                Some(tile_id)
            }
            Err(err) => {
                debug_assert!(false, "spawn on full board: {err}");
                tracing::error!(%err, "spawn failed");
                None
            }
        }
    }

    fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
        self.best_score = self.best_score.max(self.score);
        self.events.emit(&GameEvent::ScoreChanged {
            score: self.score,
            best: self.best_score,
        });
    }

    /// Board is full and no neighbouring tiles share a rank
    pub fn is_game_over(&self) -> bool {
        self.board.is_terminal()
    }

    /// Inside the window between a changing move and its finalize
    pub fn is_resolving(&self) -> bool {
        self.phase == Phase::Resolving
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn streak_count(&self) -> u32 {
        self.streak.count()
    }

    pub fn streak(&self) -> &StreakState {
        &self.streak
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Directions that would change the board right now
    pub fn available_moves(&self) -> ArrayVec<Direction, 4> {
        if self.phase != Phase::Idle {
            return ArrayVec::new();
        }
        Direction::ALL
            .into_iter()
            .filter(|&dir| self.board.can_move(dir))
            .collect()
    }

    pub fn board_snapshot(&self) -> BoardSnapshot {
        self.board.snapshot()
    }

    pub fn snapshot_into(&self, out: &mut SessionSnapshot) {
        self.board.snapshot_into(&mut out.board);
        out.score = self.score;
        out.best_score = self.best_score;
        out.streak_count = self.streak.count();
        out.moves = self.moves;
        out.phase = self.phase;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            board: self.board.snapshot(),
            score: self.score,
            best_score: self.best_score,
            streak_count: self.streak.count(),
            moves: self.moves,
            phase: self.phase,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Cell, Rank};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn session(width: u8, height: u8, values: &[u32]) -> GameSession {
        let config = EngineConfig::default().with_size(width, height);
        let board = Board::from_values(config.ladder(), width, height, values).unwrap();
        GameSession::with_board(config, board, GameRng::new(1)).unwrap()
    }

    #[test]
    fn test_new_game_two_lowest_tiles() {
        let s = GameSession::new(EngineConfig::default()).unwrap();
        assert_eq!(s.board().tile_count(), 2);
        assert!(s.board().tiles().iter().all(|t| t.rank == Rank::new(0)));
        assert_eq!(s.score(), 0);
        assert_eq!(s.streak_count(), 0);
        assert_eq!(s.phase(), Phase::Idle);
    }

    #[test]
    fn test_resolving_window_rejects_moves() {
        let mut s = session(4, 1, &[2, 2, 0, 0]);
        let result = s.apply_move(Direction::Left).unwrap();
        assert!(result.board_changed);
        assert!(s.is_resolving());

        assert_eq!(
            s.apply_move(Direction::Right),
            Err(EngineError::InvalidMoveWhileResolving)
        );
        assert!(s.available_moves().is_empty());

        let outcome = s.finalize_move().unwrap();
        assert!(outcome.spawned);
        assert!(!outcome.game_over);
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(s.board().tile_count(), 2);
    }

    #[test]
    fn test_finalize_without_pending_move() {
        let mut s = session(4, 1, &[2, 0, 0, 0]);
        assert_eq!(s.finalize_move(), Err(EngineError::NoPendingMove));

        // A no-op move does not open the window either.
        let result = s.apply_move(Direction::Left).unwrap();
        assert!(!result.board_changed);
        assert_eq!(s.finalize_move(), Err(EngineError::NoPendingMove));
        assert_eq!(s.moves(), 0);
    }

    #[test]
    fn test_score_and_best_score() {
        let mut s = session(4, 1, &[2, 2, 4, 4]).with_best_score(10);
        assert_eq!(s.best_score(), 10);

        let (result, _) = s.play(Direction::Left).unwrap();
        assert_eq!(result.points_awarded(), 12);
        assert_eq!(s.score(), 12);
        assert_eq!(s.best_score(), 12);
    }

    #[test]
    fn test_spawn_fills_last_gap() {
        // Left merges the 2s, leaving one gap which the spawn fills.
        let mut s = session(2, 2, &[2, 2, 4, 8]);
        let (_, outcome) = s.play(Direction::Left).unwrap();
        let outcome = outcome.unwrap();
        assert!(outcome.spawned);
        assert!(s.board().is_full());
        assert_eq!(s.board().rank_at(1, 0), Some(Rank::new(0)));
        // [4, 2] over [4, 8]: the 4s can still merge vertically.
        assert!(!outcome.game_over);
        assert_eq!(s.phase(), Phase::Idle);
    }

    #[test]
    fn test_finalize_detects_game_over() {
        let over = Rc::new(RefCell::new(false));
        let mut s = session(2, 2, &[4, 2, 8, 0]);
        let flag = Rc::clone(&over);
        s.subscribe(move |e| {
            if matches!(e, GameEvent::GameOver { .. }) {
                *flag.borrow_mut() = true;
            }
        });

        // Right slides the 8 over; the spawned 2 lands in the only gap.
        s.apply_move(Direction::Right).unwrap();
        let outcome = s.finalize_move().unwrap();

        assert!(outcome.spawned);
        assert!(outcome.game_over);
        assert_eq!(s.board().values(), vec![4, 2, 2, 8]);
        assert_eq!(s.phase(), Phase::GameOver);
        assert!(*over.borrow());
        assert!(s.available_moves().is_empty());
    }

    #[test]
    fn test_terminal_board_rejects_moves() {
        let mut s = session(2, 2, &[2, 4, 4, 2]);
        assert!(s.is_game_over());
        assert_eq!(s.phase(), Phase::GameOver);
        assert_eq!(s.apply_move(Direction::Up), Err(EngineError::GameOver));

        s.new_game();
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(s.board().tile_count(), 2);
    }

    #[test]
    fn test_events_are_delivered() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut s = session(3, 1, &[2, 2, 0]);
        let sink = Rc::clone(&seen);
        s.subscribe(move |e| sink.borrow_mut().push(*e));

        s.play(Direction::Left).unwrap();

        let seen = seen.borrow();
        assert!(matches!(seen[0], GameEvent::TileMerged { streak_count: 1, .. }));
        assert_eq!(seen[1], GameEvent::ScoreChanged { score: 4, best: 4 });
        assert!(matches!(seen[2], GameEvent::TileSpawned { rank, .. } if rank == Rank::new(0)));
    }

    #[test]
    fn test_with_board_rejects_mismatched_config() {
        let board = Board::from_values(EngineConfig::default().ladder(), 2, 2, &[0; 4]).unwrap();
        let err = GameSession::with_board(EngineConfig::default(), board, GameRng::new(1));
        assert!(matches!(err, Err(ConfigError::BoardMismatch { .. })));
    }

    #[test]
    fn test_snapshot_reflects_session() {
        let mut s = session(2, 1, &[2, 2]);
        s.play(Direction::Left).unwrap();

        let snap = s.snapshot();
        assert_eq!(snap.score, 4);
        assert_eq!(snap.moves, 1);
        assert_eq!(snap.board.rank_at(Cell::new(0, 0)), Some(Rank::new(1)));
        assert_eq!(snap.board.values().len(), 2);

        let mut into = SessionSnapshot {
            board: BoardSnapshot::default(),
            score: 0,
            best_score: 0,
            streak_count: 0,
            moves: 0,
            phase: Phase::GameOver,
        };
        s.snapshot_into(&mut into);
        assert_eq!(into, snap);
    }
}
