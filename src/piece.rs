//! Pieces and squares
//!
//! A `Piece` carries its identity (type, color, value) and the "has moved"
//! flag castling depends on. A `Square` is a board cell holding a piece or
//! nothing. Both are plain values that are copied freely.

use crate::types::{square_color, Color, PieceType, SquareColor};

/// A chess piece, or the empty piece when `piece_type` is `None`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Piece {
    piece_type: PieceType,
    color: Color,
    value: i32,
    has_moved: bool,
}

impl Piece {
    /// Create a piece. A missing type or color yields the empty piece.
    pub fn new(piece_type: PieceType, color: Color) -> Self {
        if piece_type == PieceType::None || color == Color::None {
            return Piece::empty();
        }
        Piece {
            piece_type,
            color,
            value: piece_type.value(),
            has_moved: false,
        }
    }

    pub fn empty() -> Self {
        Piece::default()
    }

    pub fn piece_type(&self) -> PieceType {
        self.piece_type
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn has_moved(&self) -> bool {
        self.has_moved
    }

    pub fn is_empty(&self) -> bool {
        self.piece_type == PieceType::None
    }

    /// Check for a piece of the given type and color
    #[inline]
    pub fn is(&self, piece_type: PieceType, color: Color) -> bool {
        self.piece_type == piece_type && self.color == color
    }

    pub(crate) fn mark_moved(&mut self) {
        self.has_moved = true;
    }

    /// FEN-style letter: upper case for White, lower case for Black
    pub fn symbol(&self) -> Option<char> {
        let letter = self.piece_type.letter()?;
        Some(if self.color == Color::White {
            letter
        } else {
            letter.to_ascii_lowercase()
        })
    }
}

/// A board cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Square {
    row: usize,
    col: usize,
    piece: Piece,
}

impl Square {
    pub fn new(row: usize, col: usize, piece: Piece) -> Self {
        Square { row, col, piece }
    }

    pub fn empty(row: usize, col: usize) -> Self {
        Square::new(row, col, Piece::empty())
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    pub fn color(&self) -> SquareColor {
        square_color(self.row, self.col)
    }

    pub fn piece(&self) -> Piece {
        self.piece
    }

    pub fn is_empty(&self) -> bool {
        self.piece.is_empty()
    }

    /// Squares are matched by coordinates only, never by their contents
    #[inline]
    pub fn is_at(&self, row: usize, col: usize) -> bool {
        self.row == row && self.col == col
    }

    pub fn replace_piece(&mut self, piece: Piece) {
        self.piece = piece;
    }

    /// Remove the piece and return it
    pub fn take_piece(&mut self) -> Piece {
        std::mem::take(&mut self.piece)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_piece() {
        let pawn = Piece::new(PieceType::Pawn, Color::White);
        assert_eq!(pawn.piece_type(), PieceType::Pawn);
        assert_eq!(pawn.color(), Color::White);
        assert_eq!(pawn.value(), 10);
        assert!(!pawn.has_moved());
        assert_eq!(pawn.symbol(), Some('P'));

        let knight = Piece::new(PieceType::Knight, Color::Black);
        assert_eq!(knight.symbol(), Some('n'));
    }

    #[test]
    fn test_incomplete_piece_is_empty() {
        assert!(Piece::new(PieceType::Queen, Color::None).is_empty());
        assert_eq!(Piece::new(PieceType::None, Color::White).color(), Color::None);
        assert_eq!(Piece::empty().value(), 0);
    }

    #[test]
    fn test_square_with_piece() {
        let square = Square::new(1, 0, Piece::new(PieceType::Pawn, Color::White));
        assert_eq!(square.color(), SquareColor::Dark);
        assert_eq!(square.row(), 1);
        assert_eq!(square.col(), 0);
        assert!(square.piece().is(PieceType::Pawn, Color::White));
    }

    #[test]
    fn test_replace_and_take_piece() {
        let mut square = Square::new(1, 0, Piece::new(PieceType::Pawn, Color::White));
        square.replace_piece(Piece::new(PieceType::Pawn, Color::Black));
        assert_eq!(square.piece().color(), Color::Black);

        let taken = square.take_piece();
        assert_eq!(taken.piece_type(), PieceType::Pawn);
        assert!(square.is_empty());
        assert!(square.is_at(1, 0));
    }
}
