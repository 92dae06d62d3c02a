//! Headless tile-merge runner (default binary).
//!
//! Plays one seeded game to completion with a fixed direction preference
//! (up, left, right, down: first one that changes the board) and prints the
//! final board. Configuration comes from `TILE_MERGE_*` environment variables,
//! log verbosity from `RUST_LOG`.

use anyhow::{Context, Result};

use tile_merge::core::{Board, EngineConfig, GameSession};
use tile_merge::types::Direction;

const PREFERENCE: [Direction; 4] = [
    Direction::Up,
    Direction::Left,
    Direction::Right,
    Direction::Down,
];

const DEFAULT_MAX_MOVES: u32 = 100_000;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = EngineConfig::from_env();
    let max_moves = std::env::var("TILE_MERGE_MAX_MOVES")
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(DEFAULT_MAX_MOVES);

    let mut game = GameSession::new(config).context("invalid engine configuration")?;
    run(&mut game, max_moves)?;

    let best = game.board().max_rank().map_or(0, |r| r.value());
    println!(
        "score {}  best tile {}  moves {}",
        game.score(),
        best,
        game.moves()
    );
    print!("{}", render(game.board()));
    Ok(())
}

fn run(game: &mut GameSession, max_moves: u32) -> Result<()> {
    while !game.is_game_over() && game.moves() < max_moves {
        let available = game.available_moves();
        let Some(&direction) = PREFERENCE.iter().find(|d| available.contains(d)) else {
            break;
        };

        let (result, outcome) = game
            .play(direction)
            .with_context(|| format!("move {} failed", direction.as_str()))?;
        tracing::debug!(
            direction = direction.as_str(),
            points = result.points_awarded(),
            streak = game.streak_count(),
            game_over = outcome.is_some_and(|o| o.game_over),
            "step"
        );
    }

    tracing::info!(score = game.score(), moves = game.moves(), "finished");
    Ok(())
}

fn render(board: &Board) -> String {
    let width = board.width() as usize;
    let values = board.values();
    let cell_width = values
        .iter()
        .map(|v| v.to_string().len())
        .max()
        .unwrap_or(1);

    let mut out = String::new();
    for row in values.chunks(width) {
        let line: Vec<String> = row
            .iter()
            .map(|&v| {
                let label = if v == 0 { ".".to_string() } else { v.to_string() };
                format!("{label:>cell_width$}")
            })
            .collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }
    out
}
