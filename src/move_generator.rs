//! Move Generator Module
//!
//! This module generates piece moves on a bare grid. It works in two modes:
//! - Normal: the moves a piece may make, including castling and en passant
//! - Control: the squares a piece attacks, used for check detection
//!
//! Legal moves are the normal-mode moves that do not leave the mover's king
//! inside the opponent's control set.

use crate::board::{find_king, move_on_grid, Grid, Move, MoveRecord};
use crate::piece::Square;
use crate::types::*;

/// Direction offsets as (row, col) steps
const ROOK_DIRECTIONS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, -1), (0, 1)];
const BISHOP_DIRECTIONS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const QUEEN_DIRECTIONS: [(i32, i32); 8] = [
    (1, 0),
    (-1, 0),
    (0, -1),
    (0, 1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];
const KING_DIRECTIONS: [(i32, i32); 8] = QUEEN_DIRECTIONS;
const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

/// What a generated move set describes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerationMode {
    /// Squares the piece may move to
    Normal,
    /// Squares the piece attacks
    Control,
}

/// Union of the squares controlled by one side
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControlMap([[bool; BOARD_LENGTH]; BOARD_LENGTH]);

impl ControlMap {
    #[inline]
    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.0[row][col]
    }

    fn mark(&mut self, square: &Square) {
        self.0[square.row()][square.col()] = true;
    }
}

/// Move generator for chess positions
#[derive(Clone, Copy, Debug, Default)]
pub struct MoveGenerator;

impl MoveGenerator {
    /// Create a new move generator
    pub fn new() -> Self {
        MoveGenerator
    }

    /// Generate the legal destinations of the piece on (row, col).
    ///
    /// `history` supplies the previous move for en passant. An empty square
    /// yields no moves. Whose turn it is is not checked here.
    pub fn legal_moves(&self, grid: &Grid, history: &[MoveRecord], row: usize, col: usize) -> Vec<Square> {
        let from = grid[row][col];
        if from.is_empty() {
            return Vec::new();
        }

        self.possible_moves(grid, history, &from, GenerationMode::Normal)
            .into_iter()
            .filter(|to| !self.leaves_king_attacked(grid, &from, to))
            .collect()
    }

    /// Generate moves for a piece without checking its own king's safety
    pub fn possible_moves(
        &self,
        grid: &Grid,
        history: &[MoveRecord],
        from: &Square,
        mode: GenerationMode,
    ) -> Vec<Square> {
        let mut moves = Vec::with_capacity(28);

        match from.piece().piece_type() {
            PieceType::Pawn => self.generate_pawn_moves(grid, history, from, mode, &mut moves),
            PieceType::Knight => self.generate_knight_moves(grid, from, &mut moves),
            PieceType::Bishop => self.generate_sliding_moves(grid, from, &BISHOP_DIRECTIONS, &mut moves),
            PieceType::Rook => self.generate_sliding_moves(grid, from, &ROOK_DIRECTIONS, &mut moves),
            PieceType::Queen => self.generate_sliding_moves(grid, from, &QUEEN_DIRECTIONS, &mut moves),
            PieceType::King => self.generate_king_moves(grid, from, mode, &mut moves),
            PieceType::None => {}
        }

        moves
    }

    /// Union of the control sets of every piece of color `by`
    pub fn controlled_squares(&self, grid: &Grid, by: Color) -> ControlMap {
        let mut control = ControlMap::default();

        for square in grid.iter().flatten() {
            if square.piece().color() != by {
                continue;
            }
            for target in self.possible_moves(grid, &[], square, GenerationMode::Control) {
                control.mark(&target);
            }
        }

        control
    }

    /// Check if a square is attacked by the given side
    pub fn is_square_attacked(&self, grid: &Grid, row: usize, col: usize, by: Color) -> bool {
        self.controlled_squares(grid, by).contains(row, col)
    }

    /// Play the move on a copy of the grid and test the mover's king.
    /// A moving king is tested on its destination.
    fn leaves_king_attacked(&self, grid: &Grid, from: &Square, to: &Square) -> bool {
        let mover = from.piece();
        let mut copy = *grid;
        move_on_grid(
            &mut copy,
            Move::new(from.row(), from.col(), to.row(), to.col()),
            PieceType::Queen,
        );

        let king = if mover.piece_type() == PieceType::King {
            *to
        } else {
            find_king(&copy, mover.color()).expect("each side keeps its king")
        };

        self.is_square_attacked(&copy, king.row(), king.col(), mover.color().opposite())
    }

    /// Add the square if it is empty or holds an enemy piece.
    /// Returns whether a sliding piece may continue past it.
    #[inline]
    fn add_possible_move(&self, grid: &Grid, row: i32, col: i32, color: Color, moves: &mut Vec<Square>) -> bool {
        if !is_inside_board(row, col) {
            return false;
        }

        let square = grid[row as usize][col as usize];
        let occupant = square.piece().color();
        if occupant == color {
            return false;
        }

        moves.push(square);
        occupant == Color::None
    }

    /// Generate pawn moves from the given square
    fn generate_pawn_moves(
        &self,
        grid: &Grid,
        history: &[MoveRecord],
        from: &Square,
        mode: GenerationMode,
        moves: &mut Vec<Square>,
    ) {
        let color = from.piece().color();
        let direction = color.pawn_direction();
        let row = from.row() as i32;
        let col = from.col() as i32;
        let ahead = row + direction;

        if mode == GenerationMode::Control {
            // Diagonals count as controlled even when empty
            for side in [-1, 1] {
                self.add_possible_move(grid, ahead, col + side, color, moves);
            }
            return;
        }

        if !is_inside_board(ahead, col) {
            return;
        }

        // Pushes
        let one_step = grid[ahead as usize][col as usize];
        if one_step.is_empty() {
            moves.push(one_step);

            let two_ahead = row + 2 * direction;
            if from.row() == color.pawn_start_row() && is_inside_board(two_ahead, col) {
                let two_step = grid[two_ahead as usize][col as usize];
                if two_step.is_empty() {
                    moves.push(two_step);
                }
            }
        }

        // Captures
        for side in [-1, 1] {
            if !is_inside_board(ahead, col + side) {
                continue;
            }
            let target = grid[ahead as usize][(col + side) as usize];
            if target.piece().color() == color.opposite() {
                moves.push(target);
            }
        }

        // En passant
        if let Some(last) = history.last() {
            let double_push_beside = last.mover == color.opposite()
                && last.piece_type_moved == PieceType::Pawn
                && last.mv.end_row == from.row()
                && last.mv.start_row as i32 == row + 2 * direction
                && last.mv.end_col.abs_diff(from.col()) == 1;

            if double_push_beside {
                moves.push(grid[ahead as usize][last.mv.end_col]);
            }
        }
    }

    /// Generate knight moves from the given square
    fn generate_knight_moves(&self, grid: &Grid, from: &Square, moves: &mut Vec<Square>) {
        let color = from.piece().color();
        let row = from.row() as i32;
        let col = from.col() as i32;

        for &(dr, dc) in &KNIGHT_OFFSETS {
            self.add_possible_move(grid, row + dr, col + dc, color, moves);
        }
    }

    /// Generate sliding moves (bishop, rook, queen)
    fn generate_sliding_moves(&self, grid: &Grid, from: &Square, directions: &[(i32, i32)], moves: &mut Vec<Square>) {
        let color = from.piece().color();

        for &(dr, dc) in directions {
            let mut row = from.row() as i32 + dr;
            let mut col = from.col() as i32 + dc;

            while self.add_possible_move(grid, row, col, color, moves) {
                row += dr;
                col += dc;
            }
        }
    }

    /// Generate king moves including castling
    fn generate_king_moves(&self, grid: &Grid, from: &Square, mode: GenerationMode, moves: &mut Vec<Square>) {
        let color = from.piece().color();
        let row = from.row() as i32;
        let col = from.col() as i32;

        if mode == GenerationMode::Control {
            for &(dr, dc) in &KING_DIRECTIONS {
                self.add_possible_move(grid, row + dr, col + dc, color, moves);
            }
            return;
        }

        let enemy_control = self.controlled_squares(grid, color.opposite());

        for &(dr, dc) in &KING_DIRECTIONS {
            let (to_row, to_col) = (row + dr, col + dc);
            if is_inside_board(to_row, to_col) && enemy_control.contains(to_row as usize, to_col as usize) {
                continue;
            }
            self.add_possible_move(grid, to_row, to_col, color, moves);
        }

        self.add_castle(grid, from, 7, &[5, 6], &[4, 5, 6], 6, &enemy_control, moves);
        self.add_castle(grid, from, 0, &[1, 2, 3], &[4, 3, 2], 2, &enemy_control, moves);
    }

    /// Castling needs an unmoved king and rook of the mover's color on their
    /// home squares, an empty path between them and no controlled square on
    /// the king's path.
    #[allow(clippy::too_many_arguments)]
    fn add_castle(
        &self,
        grid: &Grid,
        from: &Square,
        rook_col: usize,
        between: &[usize],
        king_path: &[usize],
        king_to: usize,
        enemy_control: &ControlMap,
        moves: &mut Vec<Square>,
    ) {
        let color = from.piece().color();
        let row = color.home_row();
        let king = grid[row][4].piece();
        let rook = grid[row][rook_col].piece();

        let unmoved = from.is_at(row, 4)
            && king.is(PieceType::King, color)
            && !king.has_moved()
            && rook.is(PieceType::Rook, color)
            && !rook.has_moved();
        let path_empty = between.iter().all(|&c| grid[row][c].is_empty());
        let path_safe = king_path.iter().all(|&c| !enemy_control.contains(row, c));

        if unmoved && path_empty && path_safe {
            moves.push(grid[row][king_to]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::piece::Piece;

    fn targets(moves: &[Square]) -> Vec<(usize, usize)> {
        let mut coords: Vec<_> = moves.iter().map(|s| (s.row(), s.col())).collect();
        coords.sort();
        coords
    }

    #[test]
    fn test_initial_position_move_count() {
        let board = Board::new();
        assert_eq!(board.all_legal_moves().len(), 20);
    }

    #[test]
    fn test_knight_from_start() {
        let board = Board::new();
        let moves = MoveGenerator::new().legal_moves(board.squares(), board.history(), 7, 6);
        assert_eq!(targets(&moves), vec![(5, 5), (5, 7)]);
    }

    #[test]
    fn test_pawn_controls_both_diagonals() {
        let board = Board::new();
        let from = board.square(6, 4);
        let control = MoveGenerator::new().possible_moves(board.squares(), &[], &from, GenerationMode::Control);
        assert_eq!(targets(&control), vec![(5, 3), (5, 5)]);
    }

    #[test]
    fn test_control_excludes_own_pieces() {
        let board = Board::new();
        let control = MoveGenerator::new().controlled_squares(board.squares(), Color::White);
        // Only the third rank: pawns cover it, everything else is blocked
        let controlled = control.0.iter().flatten().filter(|&&c| c).count();
        assert_eq!(controlled, 8);
        assert!(!control.contains(7, 4));
        assert!(control.contains(5, 0));
    }

    #[test]
    fn test_king_cannot_capture_protected_piece() {
        let board = Board::from_placement(
            &[
                (7, 4, Piece::new(PieceType::King, Color::White)),
                (6, 4, Piece::new(PieceType::Queen, Color::Black)),
                (5, 4, Piece::new(PieceType::Rook, Color::Black)),
                (0, 0, Piece::new(PieceType::King, Color::Black)),
            ],
            Color::White,
        );
        let moves = MoveGenerator::new().legal_moves(board.squares(), board.history(), 7, 4);
        assert!(moves.is_empty());
        assert!(board.is_in_check(Color::White));
    }

    #[test]
    fn test_king_takes_unprotected_piece() {
        let board = Board::from_placement(
            &[
                (7, 4, Piece::new(PieceType::King, Color::White)),
                (6, 4, Piece::new(PieceType::Queen, Color::Black)),
                (0, 0, Piece::new(PieceType::King, Color::Black)),
            ],
            Color::White,
        );
        let moves = MoveGenerator::new().legal_moves(board.squares(), board.history(), 7, 4);
        assert_eq!(targets(&moves), vec![(6, 4)]);
    }

    #[test]
    fn test_castling_from_placement() {
        let board = Board::from_placement(
            &[
                (7, 4, Piece::new(PieceType::King, Color::White)),
                (7, 0, Piece::new(PieceType::Rook, Color::White)),
                (7, 7, Piece::new(PieceType::Rook, Color::White)),
                (0, 4, Piece::new(PieceType::King, Color::Black)),
            ],
            Color::White,
        );
        let moves = MoveGenerator::new().legal_moves(board.squares(), board.history(), 7, 4);
        let coords = targets(&moves);
        assert!(coords.contains(&(7, 6)));
        assert!(coords.contains(&(7, 2)));
        assert_eq!(coords.len(), 7);
    }

    #[test]
    fn test_long_castle_needs_b_file_empty() {
        let board = Board::from_placement(
            &[
                (7, 4, Piece::new(PieceType::King, Color::White)),
                (7, 0, Piece::new(PieceType::Rook, Color::White)),
                (7, 1, Piece::new(PieceType::Knight, Color::White)),
                (0, 4, Piece::new(PieceType::King, Color::Black)),
            ],
            Color::White,
        );
        let moves = MoveGenerator::new().legal_moves(board.squares(), board.history(), 7, 4);
        assert!(!targets(&moves).contains(&(7, 2)));
    }
}
