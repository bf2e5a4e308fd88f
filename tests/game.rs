//! Game facade and opening book tests

use maxmin_chess::config::GameConfig;
use maxmin_chess::game::Game;
use maxmin_chess::opening_book::OpeningBook;
use maxmin_chess::board::{GameStatus, Move};
use maxmin_chess::types::{Color, PieceType};

fn random_opponent(human_color: Color, use_book: bool) -> Game {
    Game::with_config(GameConfig::new(human_color, 0, use_book))
}

// ============================================================================
// Game flow
// ============================================================================

#[test]
fn test_human_and_computer_alternate() {
    let mut game = random_opponent(Color::White, true);

    assert_eq!(game.legal_moves(6, 4).len(), 2);
    game.apply_move(6, 4, 4, 4);
    assert_eq!(game.board_snapshot()[4][4].piece().piece_type(), PieceType::Pawn);
    assert_eq!(game.turn(), Color::Black);

    let info = game.request_opponent_move();
    assert_eq!(game.turn(), Color::White);
    let reply = info.last_move.unwrap();
    assert_eq!(reply.mover, Color::Black);
    // Every book reply to e4 starts from the black pawn rank
    assert_eq!(reply.mv.start_row, 1);
}

#[test]
fn test_human_cannot_move_on_computers_turn() {
    let mut game = random_opponent(Color::Black, false);

    assert!(game.legal_moves(6, 4).is_empty());
    let info = game.apply_move(6, 4, 4, 4);
    assert!(info.last_move.is_none());
    assert_eq!(game.turn(), Color::White);
}

#[test]
fn test_computer_waits_for_human() {
    let mut game = random_opponent(Color::White, true);
    let info = game.request_opponent_move();
    assert!(info.last_move.is_none());
    assert_eq!(game.turn(), Color::White);
}

#[test]
fn test_computer_opens_as_white() {
    let mut game = random_opponent(Color::Black, true);
    assert_eq!(game.computer_color(), Color::White);

    let info = game.request_opponent_move();
    let opening = info.last_move.unwrap().mv;
    assert!((6..=7).contains(&opening.start_row));
    assert!((4..=5).contains(&opening.end_row));
    assert_eq!(game.turn(), Color::Black);
}

#[test]
fn test_leaving_the_book() {
    let mut game = random_opponent(Color::White, true);

    game.legal_moves(6, 0);
    game.apply_move(6, 0, 5, 0);
    assert!(game.opening_book().out_of_moves());

    let info = game.request_opponent_move();
    assert_eq!(info.last_move.unwrap().mover, Color::Black);
    assert_eq!(game.turn(), Color::White);
}

#[test]
fn test_book_switched_off() {
    let game = random_opponent(Color::White, false);
    assert!(!game.opening_book().is_active());
}

#[test]
fn test_computer_keeps_human_promotion_choice() {
    let mut game = random_opponent(Color::White, false);
    game.set_promotion_choice(PieceType::Knight).unwrap();
    assert!(game.set_promotion_choice(PieceType::Pawn).is_err());

    game.legal_moves(6, 4);
    game.apply_move(6, 4, 4, 4);
    game.request_opponent_move();
    assert_eq!(game.board().promotion_choice(), PieceType::Knight);
}

#[test]
fn test_new_game_resets() {
    let mut game = random_opponent(Color::White, true);
    game.legal_moves(6, 4);
    game.apply_move(6, 4, 4, 4);
    game.request_opponent_move();
    assert_eq!(game.board().history().len(), 2);

    game.new_game(Color::Black, 0, false);
    assert_eq!(game.human_color(), Color::Black);
    assert_eq!(game.turn(), Color::White);
    assert!(game.board().history().is_empty());
    assert_eq!(game.status(), GameStatus::InProgress);
    assert!(!game.opening_book().is_active());
}

#[test]
fn test_random_side_assignment() {
    let game = Game::with_config(GameConfig::default().with_human_color(Color::None));
    assert_ne!(game.human_color(), Color::None);
    assert_eq!(game.computer_color(), game.human_color().opposite());
}

#[test]
fn test_full_game_against_random_computer() {
    let mut game = random_opponent(Color::White, true);

    while !game.status().is_over() && game.board().history().len() < 60 {
        if game.turn() == Color::White {
            let mv = game.board().all_legal_moves()[0];
            game.legal_moves(mv.start_row as i32, mv.start_col as i32);
            let info = game.apply_move(
                mv.start_row as i32,
                mv.start_col as i32,
                mv.end_row as i32,
                mv.end_col as i32,
            );
            assert_eq!(info.last_move.map(|record| record.mv), Some(mv));
        } else {
            let played = game.board().history().len();
            game.request_opponent_move();
            assert_eq!(game.board().history().len(), played + 1);
        }
    }
}

// ============================================================================
// Opening book
// ============================================================================

#[test]
fn test_book_white_move() {
    let mut book = OpeningBook::new();
    let mv = book.find_move().unwrap();
    assert!((6..=7).contains(&mv.start_row));
    assert!((4..=7).contains(&mv.end_row));
}

#[test]
fn test_book_black_move() {
    let mut book = OpeningBook::new();
    book.traverse(Move::new(6, 4, 4, 4));
    let mv = book.find_move().unwrap();
    assert!((0..=1).contains(&mv.start_row));
    assert!((0..=3).contains(&mv.end_row));
}

#[test]
fn test_book_reset() {
    let mut book = OpeningBook::new();
    book.traverse(Move::new(6, 4, 4, 4));
    book.reset(true);
    let mv = book.find_move().unwrap();
    assert!((6..=7).contains(&mv.start_row));
    assert!((4..=7).contains(&mv.end_row));
}

#[test]
fn test_custom_book_lines() {
    let mut book = OpeningBook::from_lines(["e2-e4 e7-e5", "e2-e4 c7-c5"]).unwrap();
    assert_eq!(book.root().children.len(), 1);
    assert_eq!(book.find_move(), Some(Move::new(6, 4, 4, 4)));

    assert!(OpeningBook::from_lines(["e2-e4 zz"]).is_err());
}
