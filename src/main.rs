//! maxmin-chess command line front end
//!
//! Usage:
//!     maxmin-chess play --color black --time-ms 500
//!     maxmin-chess selfplay --time-ms 100 --max-moves 80
//!
//! In `play` mode moves are read from stdin in coordinate notation
//! ("e2e4", "e7e8n" to underpromote). Set RUST_LOG=debug to follow the
//! search.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use maxmin_chess::board::{Board, Move};
use maxmin_chess::config::{GameConfig, DEFAULT_TIME_PER_MOVE_MS};
use maxmin_chess::game::Game;
use maxmin_chess::search::Computer;
use maxmin_chess::types::{Color, PieceType};

#[derive(Parser)]
#[command(name = "maxmin-chess")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play against the computer on the terminal
    Play {
        /// Side you play: white, black or random
        #[arg(long, default_value = "white")]
        color: String,
        /// Thinking time per computer move; 0 plays random moves
        #[arg(long, default_value_t = DEFAULT_TIME_PER_MOVE_MS)]
        time_ms: u64,
        /// Do not use the opening book
        #[arg(long)]
        no_book: bool,
    },
    /// Let two computers play each other
    Selfplay {
        #[arg(long, default_value_t = 100)]
        time_ms: u64,
        /// Stop after this many half-moves
        #[arg(long, default_value_t = 200)]
        max_moves: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Play {
            color,
            time_ms,
            no_book,
        }) => play(&color, time_ms, !no_book),
        Some(Commands::Selfplay { time_ms, max_moves }) => selfplay(time_ms, max_moves),
        None => play("white", DEFAULT_TIME_PER_MOVE_MS, true),
    }
}

fn parse_side(color: &str) -> Result<Color> {
    if color.eq_ignore_ascii_case("random") {
        return Ok(Color::None);
    }
    Ok(color.parse()?)
}

/// Split an optional promotion letter off a coordinate move ("e7e8q")
fn parse_input(token: &str) -> Result<(Move, Option<PieceType>)> {
    if !token.is_ascii() {
        bail!("expected a move like e2e4, got {token:?}");
    }
    let (coords, promotion) = match token.len() {
        5 => (&token[..4], Some(token[4..].parse::<PieceType>()?)),
        4 => (token, None),
        _ => bail!("expected a move like e2e4, got {token:?}"),
    };
    Ok((coords.parse()?, promotion))
}

fn play(color: &str, time_ms: u64, use_book: bool) -> Result<()> {
    let config = GameConfig::new(parse_side(color)?, time_ms, use_book);
    let mut game = Game::with_config(config);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!("You play {}.", game.human_color());

    while !game.status().is_over() {
        if game.turn() == game.computer_color() {
            let info = game.request_opponent_move();
            if let Some(last) = info.last_move {
                println!("Computer plays {}", last.mv);
            }
            continue;
        }

        println!("{}", game.board());
        print!("{} to move> ", game.turn());
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            return Ok(());
        };
        let line = line.context("failed to read a move")?;
        let token = line.trim();

        match token {
            "" => continue,
            "quit" | "exit" => return Ok(()),
            _ => {}
        }

        let (mv, promotion) = match parse_input(token) {
            Ok(parsed) => parsed,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };

        if let Some(piece_type) = promotion {
            if let Err(err) = game.set_promotion_choice(piece_type) {
                println!("{err}");
                continue;
            }
        }

        let played = game.board().history().len();
        game.legal_moves(mv.start_row as i32, mv.start_col as i32);
        game.apply_move(
            mv.start_row as i32,
            mv.start_col as i32,
            mv.end_row as i32,
            mv.end_col as i32,
        );
        if game.board().history().len() == played {
            println!("Illegal move: {mv}");
        }
    }

    println!("{}", game.board());
    println!("{}", game.status());
    Ok(())
}

fn selfplay(time_ms: u64, max_moves: usize) -> Result<()> {
    let budget = Duration::from_millis(time_ms);
    let mut white = Computer::new(Color::White, budget);
    let mut black = Computer::new(Color::Black, budget);
    let mut board = Board::new();

    while !board.status().is_over() && board.history().len() < max_moves {
        let computer = if board.turn() == Color::White {
            &mut white
        } else {
            &mut black
        };

        let Some(mv) = computer.find_move(&board) else {
            break;
        };
        board.make_move(mv);
        println!("{:>3}. {} {}", board.history().len(), computer.color(), mv);
    }

    println!("{board}");
    println!("{}", board.status());
    Ok(())
}
