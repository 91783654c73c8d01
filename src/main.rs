//! Othello-Rust: an Othello search engine.
//!
//! ## Usage
//!
//! - `othello-rust` - Self-play demo between two default levels
//! - `othello-rust demo --black 100 --white 3` - Self-play between levels
//! - `othello-rust best-move --board <cells> --side black` - Analyse a position
//!
//! Set `RUST_LOG=debug` (or `info`, `trace`) to see search statistics.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use othello_rust::board::{Board, Side};
use othello_rust::config::SearchConfig;
use othello_rust::constants::{MAX_SIZE, SIZE};
use othello_rust::engine::Engine;
use othello_rust::game::{Game, Turn};

/// Othello-Rust: an Othello search engine
#[derive(Parser)]
#[command(name = "othello-rust")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a full game between two engine levels
    Demo {
        /// Level for Black
        #[arg(long, default_value_t = 3)]
        black: u32,
        /// Level for White
        #[arg(long, default_value_t = 100)]
        white: u32,
        /// Board size (even, 4 to 26)
        #[arg(long, default_value_t = SIZE)]
        size: usize,
    },
    /// Search a single position and print the chosen move
    BestMove {
        /// Board cells row by row: `.` empty, `X` black, `O` white
        #[arg(long)]
        board: String,
        /// Side to move
        #[arg(long, default_value = "black")]
        side: String,
        /// Opponent level preset
        #[arg(long, default_value_t = 100, conflicts_with = "config")]
        level: u32,
        /// JSON search configuration
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Demo { black, white, size }) => run_demo(black, white, size),
        Some(Commands::BestMove {
            board,
            side,
            level,
            config,
        }) => run_best_move(&board, &side, level, config),
        None => run_demo(3, 100, SIZE),
    }
}

fn run_demo(black_level: u32, white_level: u32, size: usize) -> Result<()> {
    if !(4..=MAX_SIZE).contains(&size) || size % 2 != 0 {
        anyhow::bail!("board size must be even and between 4 and {MAX_SIZE}, got {size}");
    }
    println!("Othello-Rust self-play: level {black_level} (X) vs level {white_level} (O)\n");

    let mut black = Engine::new(SearchConfig::level(black_level));
    let mut white = Engine::new(SearchConfig::level(white_level));
    let mut game = Game::new(size);

    while !game.is_over() {
        let side = game.to_move();
        let engine = match side {
            Side::Black => &mut black,
            Side::White => &mut white,
        };
        let result = engine.choose_move(game.board(), side);
        let turn = match &result.best_move {
            Some(mv) => {
                println!("{side} plays {} ({:?}, {}ms)", mv.pos, result.kind, result.time_ms);
                game.play(mv)?
            }
            None => {
                println!("{side} passes");
                game.pass()?
            }
        };
        if let Turn::Pass { passed, .. } = turn {
            println!("{passed} has no move and passes");
        }
        println!("{}", game.board());
    }

    println!("\n{game}");
    Ok(())
}

fn run_best_move(cells: &str, side: &str, level: u32, config: Option<PathBuf>) -> Result<()> {
    let board: Board = cells.parse().context("invalid board")?;
    let side: Side = side.parse()?;
    let config = match config {
        Some(path) => SearchConfig::load(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SearchConfig::level(level),
    };

    let mut engine = Engine::new(config);
    let result = engine.choose_move(&board, side);
    print!("{board}");
    match result.best_move {
        Some(mv) => println!(
            "{side}: {} (score {}, {:?}, depth {}, {} nodes, {}ms)",
            mv.pos,
            result
                .score
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string()),
            result.kind,
            result.depth,
            result.nodes,
            result.time_ms
        ),
        None => println!("{side}: pass"),
    }
    Ok(())
}
