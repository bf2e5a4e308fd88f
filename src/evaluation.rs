//! Position Evaluation Module
//!
//! Static evaluation from one side's point of view:
//! - Material, using the value stored on each piece
//! - Piece placement, using piece-square tables
//! - A fixed bonus or penalty once a side has been checkmated

use crate::board::Board;
use crate::piece::Piece;
use crate::types::*;

/// Added for the winner and subtracted for the loser of a finished game
pub const CHECKMATE_BONUS: i32 = 1000;

// ============================================================================
// PIECE-SQUARE TABLES
// ============================================================================
//
// Tables are laid out from White's side, rank 1 first. Black reads them
// mirrored across the middle of the board.

const PAWN_PST: [i32; 64] = [
    0,  0,  0,  0,  0,  0,  0,  0,   // Rank 1
    0,  1,  1, -2, -2,  1,  1,  0,   // Rank 2
    0,  0, -1,  0,  0, -1,  0,  0,   // Rank 3
    0,  0,  0,  2,  2,  0,  0,  0,   // Rank 4
    0,  0,  1,  2,  2,  1,  0,  0,   // Rank 5
    1,  1,  2,  3,  3,  2,  1,  1,   // Rank 6
    5,  5,  5,  5,  5,  5,  5,  5,   // Rank 7
    0,  0,  0,  0,  0,  0,  0,  0,   // Rank 8
];

const KNIGHT_PST: [i32; 64] = [
   -5, -4, -3, -3, -3, -3, -4, -5,
   -4, -2,  0,  0,  0,  0, -2, -4,
   -3,  0,  1,  2,  2,  1,  0, -3,
   -3,  0,  2,  2,  2,  2,  0, -3,
   -3,  0,  2,  2,  2,  2,  0, -3,
   -3,  0,  1,  2,  2,  1,  0, -3,
   -4, -2,  0,  0,  0,  0, -2, -4,
   -5, -4, -3, -3, -3, -3, -4, -5,
];

const BISHOP_PST: [i32; 64] = [
   -2, -1, -1, -1, -1, -1, -1, -2,
   -1,  0,  0,  0,  0,  0,  0, -1,
   -1,  1,  1,  1,  1,  1,  1, -1,
   -1,  0,  1,  1,  1,  1,  0, -1,
   -1,  0,  0,  1,  1,  0,  0, -1,
   -1,  0,  0,  1,  1,  0,  0, -1,
   -1,  0,  0,  0,  0,  0,  0, -1,
   -2, -1, -1, -1, -1, -1, -1, -2,
];

// Rooks like the seventh rank
const ROOK_PST: [i32; 64] = [
    0,  0,  0,  0,  0,  0,  0,  0,
    0,  0,  0,  0,  0,  0,  0,  0,
    0,  0,  0,  0,  0,  0,  0,  0,
    0,  0,  0,  0,  0,  0,  0,  0,
    0,  0,  0,  0,  0,  0,  0,  0,
    0,  0,  0,  0,  0,  0,  0,  0,
    0,  1,  1,  1,  1,  1,  1,  0,
    0,  0,  0,  0,  0,  0,  0,  0,
];

const QUEEN_PST: [i32; 64] = [
   -2, -1, -1,  0,  0, -1, -1, -2,
   -1,  0,  0,  0,  0,  0,  0, -1,
   -1,  0,  0,  0,  0,  0,  0, -1,
    0,  0,  0,  0,  0,  0,  0,  0,
    0,  0,  0,  0,  0,  0,  0,  0,
   -1,  0,  0,  0,  0,  0,  0, -1,
   -1,  0,  0,  0,  0,  0,  0, -1,
   -2, -1, -1,  0,  0, -1, -1, -2,
];

// King stays home behind its pawns
const KING_PST: [i32; 64] = [
    2,  3,  1,  0,  0,  1,  3,  2,
    2,  2,  0,  0,  0,  0,  2,  2,
   -1, -2, -2, -2, -2, -2, -2, -1,
   -2, -3, -3, -4, -4, -3, -3, -2,
   -3, -4, -4, -5, -5, -4, -4, -3,
   -3, -4, -4, -5, -5, -4, -4, -3,
   -3, -4, -4, -5, -5, -4, -4, -3,
   -3, -4, -4, -5, -5, -4, -4, -3,
];

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Get the piece-square table value for a piece standing on (row, col)
fn pst_value(piece: &Piece, row: usize, col: usize) -> i32 {
    let pst = match piece.piece_type() {
        PieceType::Pawn => &PAWN_PST,
        PieceType::Knight => &KNIGHT_PST,
        PieceType::Bishop => &BISHOP_PST,
        PieceType::Rook => &ROOK_PST,
        PieceType::Queen => &QUEEN_PST,
        PieceType::King => &KING_PST,
        PieceType::None => return 0,
    };

    // Row 0 is rank 8, so White reads the table upside down
    let rank_index = if piece.color() == Color::White {
        BOARD_LENGTH - 1 - row
    } else {
        row
    };

    pst[rank_index * BOARD_LENGTH + col]
}

// ============================================================================
// MAIN EVALUATION
// ============================================================================

/// Evaluate the position for `color`: its pieces count for it and the
/// opponent's against it
pub fn evaluate(board: &Board, color: Color) -> i32 {
    let mut score = 0;

    for square in board.squares().iter().flatten() {
        let piece = square.piece();
        if piece.is_empty() {
            continue;
        }

        let worth = piece.value() + pst_value(&piece, square.row(), square.col());
        if piece.color() == color {
            score += worth;
        } else {
            score -= worth;
        }
    }

    match board.status().winner() {
        Some(winner) if winner == color => score.saturating_add(CHECKMATE_BONUS),
        Some(_) => score.saturating_sub(CHECKMATE_BONUS),
        None => score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Move;

    fn play(board: &mut Board, line: &str) {
        for token in line.split_whitespace() {
            board.make_move(token.parse::<Move>().unwrap());
        }
    }

    #[test]
    fn test_starting_position_is_balanced() {
        let board = Board::new();
        assert_eq!(evaluate(&board, Color::White), 0);
        assert_eq!(evaluate(&board, Color::Black), 0);
    }

    #[test]
    fn test_evaluation_is_antisymmetric() {
        let mut board = Board::new();
        play(&mut board, "e2-e4 d7-d5 e4-d5");
        let white = evaluate(&board, Color::White);
        assert!(white > 0);
        assert_eq!(evaluate(&board, Color::Black), -white);
    }

    #[test]
    fn test_mirrored_tables() {
        let white_knight = Piece::new(PieceType::Knight, Color::White);
        let black_knight = Piece::new(PieceType::Knight, Color::Black);
        assert_eq!(pst_value(&white_knight, 5, 5), pst_value(&black_knight, 2, 5));
        let white_pawn = Piece::new(PieceType::Pawn, Color::White);
        assert_eq!(pst_value(&white_pawn, 1, 0), 5);
    }

    #[test]
    fn test_checkmate_bonus() {
        let mut board = Board::new();
        play(&mut board, "f2-f3 e7-e5 g2-g4 Qd8-h4");
        assert_eq!(board.status().winner(), Some(Color::Black));

        let mut material = 0;
        for square in board.squares().iter().flatten() {
            let piece = square.piece();
            if piece.is_empty() {
                continue;
            }
            let worth = piece.value() + pst_value(&piece, square.row(), square.col());
            material += if piece.color() == Color::Black { worth } else { -worth };
        }
        assert_eq!(evaluate(&board, Color::Black), material + CHECKMATE_BONUS);
        assert_eq!(evaluate(&board, Color::White), -material - CHECKMATE_BONUS);
    }
}
