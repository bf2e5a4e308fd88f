//! Computer opponent tests

use maxmin_chess::board::{Board, Move};
use maxmin_chess::piece::Piece;
use maxmin_chess::search::{Computer, MATE_SCORE};
use maxmin_chess::types::{Color, PieceType};
use std::time::Duration;

fn board_after(line: &str) -> Board {
    let mut board = Board::new();
    for token in line.split_whitespace() {
        let info = board.make_move(token.parse().expect("valid move token"));
        assert!(info.last_move.is_some(), "move {token} was rejected");
    }
    board
}

#[test]
fn test_finds_mate_in_one() {
    let board = board_after("e2-e4 e7-e5 Qd1-h5 a7-a6 Bf1-c4 a6-a5");
    let mut computer = Computer::new(Color::White, Duration::from_millis(1000));

    let best = computer.max_min_move(&board).unwrap();
    assert_eq!(best.mv, Move::new(3, 7, 1, 5));
    assert_eq!(best.score, MATE_SCORE);
    assert_eq!(computer.rounds, 0);
}

#[test]
fn test_black_finds_mate_in_one() {
    let board = board_after("f2-f3 e7-e5 g2-g4");
    let mut computer = Computer::new(Color::Black, Duration::from_millis(1000));

    assert_eq!(computer.find_move(&board), Some(Move::new(0, 3, 4, 7)));
}

#[test]
fn test_takes_hanging_queen() {
    let board = Board::from_placement(
        &[
            (7, 4, Piece::new(PieceType::King, Color::White)),
            (7, 0, Piece::new(PieceType::Rook, Color::White)),
            (0, 0, Piece::new(PieceType::Queen, Color::Black)),
            (0, 7, Piece::new(PieceType::King, Color::Black)),
        ],
        Color::White,
    );
    let mut computer = Computer::new(Color::White, Duration::from_millis(1));

    assert_eq!(computer.find_move(&board), Some(Move::new(7, 0, 0, 0)));
}

#[test]
fn test_returns_none_on_opponents_turn() {
    let board = Board::new();
    let mut computer = Computer::new(Color::Black, Duration::from_millis(50));
    assert_eq!(computer.find_move(&board), None);
}

#[test]
fn test_returns_none_when_game_over() {
    let board = board_after("f2-f3 e7-e5 g2-g4 Qd8-h4");
    let mut computer = Computer::new(Color::White, Duration::from_millis(50));
    assert_eq!(computer.find_move(&board), None);

    let mut random = Computer::new(Color::White, Duration::ZERO);
    assert_eq!(random.find_move(&board), None);
}

#[test]
fn test_short_budget_returns_legal_move() {
    let board = board_after("e2-e4 e7-e5");
    let legal = board.all_legal_moves();
    let mut computer = Computer::new(Color::White, Duration::from_millis(1));

    let mv = computer.find_move(&board).unwrap();
    assert!(legal.contains(&mv));
    assert!(computer.nodes_searched > 0);
}

#[test]
fn test_deepening_runs_rounds() {
    let board = Board::new();
    let mut computer = Computer::new(Color::White, Duration::from_millis(1000));

    let best = computer.max_min_move(&board).unwrap();
    assert!(board.all_legal_moves().contains(&best.mv));
    assert!(computer.rounds >= 1);
}

#[test]
fn test_random_play_is_reproducible() {
    let board = Board::new();
    let mut first = Computer::with_seed(Color::White, Duration::ZERO, 42);
    let mut second = Computer::with_seed(Color::White, Duration::ZERO, 42);

    for _ in 0..10 {
        assert_eq!(first.find_move(&board), second.find_move(&board));
    }
}

#[test]
fn test_random_games_stay_legal() {
    let mut board = Board::new();
    let mut white = Computer::with_seed(Color::White, Duration::ZERO, 1);
    let mut black = Computer::with_seed(Color::Black, Duration::ZERO, 2);

    while !board.status().is_over() && board.history().len() < 120 {
        let computer = if board.turn() == Color::White {
            &mut white
        } else {
            &mut black
        };
        let mv = computer.find_move(&board).expect("a move while the game is on");
        assert!(board.all_legal_moves().contains(&mv));

        let info = board.make_move(mv);
        assert_eq!(info.last_move.map(|record| record.mv), Some(mv));
    }
}
