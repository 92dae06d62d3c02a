//! Session tests - two-phase moves, scoring, streaks and lifecycle

use rand::RngCore;

use tile_merge::core::{
    Board, EngineConfig, EngineError, GameRng, GameSession, Phase, SessionSnapshot,
};
use tile_merge::types::{Direction, Rank};

/// RNG that always yields zero, so spawns land in the first empty cell
/// in row-major order.
struct FirstEmpty;

impl RngCore for FirstEmpty {
    fn next_u32(&mut self) -> u32 {
        0
    }

    fn next_u64(&mut self) -> u64 {
        0
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(0);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        dest.fill(0);
        Ok(())
    }
}

fn session(width: u8, height: u8, values: &[u32]) -> GameSession<FirstEmpty> {
    let config = EngineConfig::default().with_size(width, height);
    let board = Board::from_values(config.ladder(), width, height, values).unwrap();
    GameSession::with_board(config, board, FirstEmpty).unwrap()
}

fn step(game: &mut GameSession<FirstEmpty>, direction: Direction) {
    let (result, outcome) = game.play(direction).unwrap();
    assert!(result.board_changed, "{:?} should change the board", direction);
    assert!(outcome.is_some());
}

#[test]
fn test_new_game_initial_state() {
    for seed in [1, 2, 3, 99, 12345] {
        let game = GameSession::new(EngineConfig::default().with_seed(seed)).unwrap();
        assert_eq!(game.board().tile_count(), 2);
        assert!(game.board().tiles().iter().all(|t| t.rank == Rank::new(0)));
        assert_eq!(game.score(), 0);
        assert_eq!(game.streak_count(), 0);
        assert_eq!(game.phase(), Phase::Idle);
    }
}

#[test]
fn test_new_game_resets_progress() {
    let mut game = session(4, 1, &[2, 2, 4, 4]);
    step(&mut game, Direction::Left);
    assert_eq!(game.score(), 12);
    assert!(game.streak_count() > 0);

    game.new_game();
    assert_eq!(game.score(), 0);
    assert_eq!(game.streak_count(), 0);
    assert_eq!(game.moves(), 0);
    assert_eq!(game.board().tile_count(), 2);
    // Best score survives a new game.
    assert_eq!(game.best_score(), 12);
}

#[test]
fn test_top_row_pair_merges_left() {
    #[rustfmt::skip]
    let mut game = session(4, 4, &[
        2, 2, 0, 0,
        0, 0, 0, 0,
        0, 0, 0, 0,
        0, 0, 0, 0,
    ]);

    let result = game.apply_move(Direction::Left).unwrap();
    assert!(result.board_changed);
    assert_eq!(result.merge_events.len(), 1);
    assert_eq!(result.merge_events[0].points, 4);
    assert_eq!(result.points_awarded(), 4);
    assert_eq!(&game.board().values()[..4], &[4, 0, 0, 0]);
    assert_eq!(game.score(), 4);
}

#[test]
fn test_triple_row_leaves_lone_survivor() {
    #[rustfmt::skip]
    let mut game = session(4, 4, &[
        2, 2, 2, 0,
        0, 0, 0, 0,
        0, 0, 0, 0,
        0, 0, 0, 0,
    ]);

    let result = game.apply_move(Direction::Left).unwrap();
    assert_eq!(result.merge_events.len(), 1);
    assert_eq!(&game.board().values()[..4], &[4, 2, 0, 0]);
}

#[test]
fn test_no_op_move_is_idempotent() {
    #[rustfmt::skip]
    let mut game = session(4, 4, &[
        2, 4, 0, 0,
        8, 0, 0, 0,
        0, 0, 0, 0,
        0, 0, 0, 0,
    ]);
    let before = game.board().clone();

    let result = game.apply_move(Direction::Left).unwrap();
    assert!(!result.board_changed);
    assert!(result.merge_events.is_empty());
    assert_eq!(game.board(), &before);
    assert_eq!(game.phase(), Phase::Idle);
    assert_eq!(game.finalize_move(), Err(EngineError::NoPendingMove));
}

#[test]
fn test_streak_grows_with_escalating_merges() {
    let mut game = session(4, 1, &[2, 2, 4, 8]);

    // [2,2,4,8] -> [4,4,8,_] + spawn
    step(&mut game, Direction::Left);
    assert_eq!(game.board().values(), vec![4, 4, 8, 2]);
    assert_eq!(game.streak_count(), 1);

    // [4,4,8,2] -> [8,8,2,_] + spawn
    step(&mut game, Direction::Left);
    assert_eq!(game.board().values(), vec![8, 8, 2, 2]);
    assert_eq!(game.streak_count(), 2);

    // [8,8,2,2] -> [16,4,_,_]: the 16 extends, the trailing 4 does not break it
    let (result, _) = game.play(Direction::Left).unwrap();
    assert!(result.streak_incremented);
    assert_eq!(game.streak_count(), 3);
    assert_eq!(game.score(), 4 + 8 + 16 + 4);
}

#[test]
fn test_streak_breaks_on_move_without_qualifying_merge() {
    let mut game = session(5, 1, &[2, 2, 0, 0, 0]);

    step(&mut game, Direction::Left);
    assert_eq!(game.board().values(), vec![4, 2, 0, 0, 0]);
    assert_eq!(game.streak_count(), 1);

    // Pure slide: breaks the streak.
    step(&mut game, Direction::Right);
    assert_eq!(game.board().values(), vec![2, 0, 0, 4, 2]);
    assert_eq!(game.streak_count(), 0);

    step(&mut game, Direction::Right);
    assert_eq!(game.board().values(), vec![2, 0, 2, 4, 2]);
    assert_eq!(game.streak_count(), 0);

    // Next qualifying merge starts over at one.
    step(&mut game, Direction::Left);
    assert_eq!(game.board().values(), vec![4, 4, 2, 2, 0]);
    assert_eq!(game.streak_count(), 1);
}

#[test]
fn test_streak_breaks_on_lower_merge() {
    let mut game = session(4, 1, &[2, 2, 2, 2]);

    step(&mut game, Direction::Left);
    assert_eq!(game.board().values(), vec![4, 4, 2, 0]);
    assert_eq!(game.streak_count(), 1);

    step(&mut game, Direction::Left);
    assert_eq!(game.board().values(), vec![8, 2, 2, 0]);
    assert_eq!(game.streak_count(), 2);

    // Merging two 2s into a 4 merges something, but 4 < 8.
    let (result, _) = game.play(Direction::Left).unwrap();
    assert_eq!(result.merge_events.len(), 1);
    assert!(!result.streak_incremented);
    assert_eq!(game.streak_count(), 0);
}

#[test]
fn test_no_op_does_not_touch_streak() {
    let mut game = session(4, 1, &[2, 2, 0, 0]);
    step(&mut game, Direction::Left);
    assert_eq!(game.board().values(), vec![4, 2, 0, 0]);
    assert_eq!(game.streak_count(), 1);

    let result = game.apply_move(Direction::Left).unwrap();
    assert!(!result.board_changed);
    assert_eq!(game.streak_count(), 1);
}

#[test]
fn test_moves_rejected_until_finalized() {
    let mut game = session(4, 1, &[2, 2, 0, 0]);
    game.apply_move(Direction::Left).unwrap();

    for dir in Direction::ALL {
        assert_eq!(
            game.apply_move(dir),
            Err(EngineError::InvalidMoveWhileResolving)
        );
    }

    let outcome = game.finalize_move().unwrap();
    assert!(outcome.spawned);
    assert_eq!(game.finalize_move(), Err(EngineError::NoPendingMove));
    assert!(game.apply_move(Direction::Right).is_ok());
}

#[test]
fn test_game_over_is_terminal_until_new_game() {
    let mut game = session(2, 2, &[4, 2, 8, 0]);
    step(&mut game, Direction::Right);

    assert!(game.is_game_over());
    assert_eq!(game.phase(), Phase::GameOver);
    for dir in Direction::ALL {
        assert_eq!(game.apply_move(dir), Err(EngineError::GameOver));
    }

    game.new_game();
    assert!(!game.is_game_over());
    assert_eq!(game.phase(), Phase::Idle);
}

#[test]
fn test_same_seed_same_game() {
    let play = |seed: u64| {
        let mut game = GameSession::new(EngineConfig::default().with_seed(seed)).unwrap();
        let mut turn = 0usize;
        while !game.is_game_over() && turn < 500 {
            let dir = Direction::ALL[turn % 4];
            let _ = game.play(dir);
            turn += 1;
        }
        (game.board().values(), game.score(), game.moves())
    };

    assert_eq!(play(77), play(77));
}

#[test]
fn test_injected_rng_matches_default() {
    let config = EngineConfig::default().with_seed(5);
    let a = GameSession::new(config).unwrap();
    let b = GameSession::with_rng(config, GameRng::new(5)).unwrap();
    assert_eq!(a.board(), b.board());
}

#[test]
fn test_snapshot_serializes() {
    let mut game = session(4, 1, &[2, 2, 0, 0]);
    step(&mut game, Direction::Left);

    let snap = game.snapshot();
    let json = serde_json::to_string(&snap).unwrap();
    let back: SessionSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back, snap);

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["score"], 4);
    assert_eq!(value["phase"], "idle");
    assert_eq!(value["board"]["tiles"][0]["value"], 4);
}

#[derive(Clone, Default)]
struct LogBuffer(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

impl std::io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_streak_transitions_are_logged() {
    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let mut game = session(5, 1, &[2, 2, 0, 0, 0]);
        step(&mut game, Direction::Left);
        step(&mut game, Direction::Right);
    });

    let text = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
    assert!(text.contains("streak extended"), "{text}");
    assert!(text.contains("streak reset"), "{text}");
}
