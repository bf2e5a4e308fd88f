//! Board Representation Module
//!
//! This module provides the board itself: the 8x8 grid of squares, the side
//! to move, the move history and the repetition counters. It validates and
//! applies moves, and recomputes the game status after every applied move.

use crate::error::{ChessError, ChessResult};
use crate::move_generator::MoveGenerator;
use crate::piece::{Piece, Square};
use crate::types::*;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, trace};

/// The 8x8 grid. Row 0 is Black's back rank, column 0 is the a-file.
pub type Grid = [[Square; BOARD_LENGTH]; BOARD_LENGTH];

/// Number of trailing half-moves without a pawn move or capture that draws the game
pub const FIFTY_MOVE_WINDOW: usize = 50;

/// Occurrences of the same position that draw the game
pub const REPETITION_LIMIT: u32 = 3;

/// Back rank layout from the a-file to the h-file
const BACK_RANK: [PieceType; BOARD_LENGTH] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

/// A move from one square to another
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub start_row: usize,
    pub start_col: usize,
    pub end_row: usize,
    pub end_col: usize,
}

impl Move {
    pub fn new(start_row: usize, start_col: usize, end_row: usize, end_col: usize) -> Self {
        Move {
            start_row,
            start_col,
            end_row,
            end_col,
        }
    }

    /// Build a move from caller-supplied coordinates, clamping each into [0, 7]
    pub fn sanitized(start_row: i32, start_col: i32, end_row: i32, end_col: i32) -> Self {
        Move::new(
            sanitize_coordinate(start_row),
            sanitize_coordinate(start_col),
            sanitize_coordinate(end_row),
            sanitize_coordinate(end_col),
        )
    }

    /// Convert move to coordinate notation (e.g., "e2e4")
    pub fn to_algebraic(&self) -> String {
        format!(
            "{}{}",
            square_name(self.start_row, self.start_col),
            square_name(self.end_row, self.end_col)
        )
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}

impl FromStr for Move {
    type Err = ChessError;

    /// Parse a single move token. Piece prefixes and separators are ignored,
    /// so "e2-e4", "e2e4", "Kng1-f3" and "Bf1-c4" are all accepted.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let coords: String = token
            .chars()
            .filter(|c| matches!(c, 'a'..='h' | '1'..='8'))
            .collect();

        let invalid = || ChessError::InvalidNotation {
            token: token.to_string(),
        };

        if coords.len() != 4 {
            return Err(invalid());
        }

        let (start_row, start_col) = parse_square(&coords[0..2]).ok_or_else(invalid)?;
        let (end_row, end_col) = parse_square(&coords[2..4]).ok_or_else(invalid)?;
        Ok(Move::new(start_row, start_col, end_row, end_col))
    }
}

/// A move as logged in the history
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveRecord {
    pub mover: Color,
    pub mv: Move,
    pub piece_type_moved: PieceType,
    /// `PieceType::None` when nothing was captured
    pub piece_type_captured: PieceType,
}

impl MoveRecord {
    pub fn is_pawn_move_or_capture(&self) -> bool {
        self.piece_type_moved == PieceType::Pawn || self.piece_type_captured != PieceType::None
    }
}

/// Outcome of the game so far
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GameStatus {
    #[default]
    InProgress,
    WhiteWon,
    BlackWon,
    DrawStalemate,
    DrawInsufficientMaterial,
    DrawRepetition,
    Draw50Move,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        self != GameStatus::InProgress
    }

    pub fn is_draw(self) -> bool {
        matches!(
            self,
            GameStatus::DrawStalemate
                | GameStatus::DrawInsufficientMaterial
                | GameStatus::DrawRepetition
                | GameStatus::Draw50Move
        )
    }

    /// The side that delivered checkmate, if any
    pub fn winner(self) -> Option<Color> {
        match self {
            GameStatus::WhiteWon => Some(Color::White),
            GameStatus::BlackWon => Some(Color::Black),
            _ => None,
        }
    }

    fn won_by(color: Color) -> GameStatus {
        if color == Color::White {
            GameStatus::WhiteWon
        } else {
            GameStatus::BlackWon
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            GameStatus::InProgress => "In progress",
            GameStatus::WhiteWon => "White won",
            GameStatus::BlackWon => "Black won",
            GameStatus::DrawStalemate => "Draw by stalemate",
            GameStatus::DrawInsufficientMaterial => "Draw by insufficient mating material",
            GameStatus::DrawRepetition => "Draw by repetition",
            GameStatus::Draw50Move => "Draw by 50 move rule",
        };
        write!(f, "{}", text)
    }
}

/// Result of applying (or attempting) a move
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameInfo {
    pub status: GameStatus,
    pub squares: Grid,
    pub last_move: Option<MoveRecord>,
}

/// Move a piece on a bare grid, handling en passant, promotion and the
/// castling rook. Returns the types of the moved and the captured piece.
///
/// The move is not validated; callers only pass moves produced by the
/// move generator.
pub(crate) fn move_on_grid(
    grid: &mut Grid,
    mv: Move,
    promotion: PieceType,
) -> (PieceType, PieceType) {
    let mut moved = grid[mv.start_row][mv.start_col].take_piece();
    moved.mark_moved();
    let moved_type = moved.piece_type();

    let landing = grid[mv.end_row][mv.end_col].piece();
    let mut captured = landing.piece_type();

    // A pawn moving diagonally onto an empty square captures en passant.
    // The captured pawn sits beside the start square.
    if moved_type == PieceType::Pawn && mv.start_col != mv.end_col && landing.is_empty() {
        captured = grid[mv.start_row][mv.end_col].take_piece().piece_type();
    }

    if moved_type == PieceType::Pawn && (mv.end_row == 0 || mv.end_row == BOARD_LENGTH - 1) {
        let mut promoted = Piece::new(promotion, moved.color());
        promoted.mark_moved();
        moved = promoted;
    }
    grid[mv.end_row][mv.end_col].replace_piece(moved);

    if moved_type == PieceType::King && mv.start_col.abs_diff(mv.end_col) == 2 {
        let (rook_start, rook_end) = if mv.end_col == 6 { (7, 5) } else { (0, 3) };
        let mut rook = grid[mv.end_row][rook_start].take_piece();
        rook.mark_moved();
        grid[mv.end_row][rook_end].replace_piece(rook);
    }

    (moved_type, captured)
}

/// Find the king of the given color on a grid
pub fn find_king(grid: &Grid, color: Color) -> Option<Square> {
    grid.iter()
        .flatten()
        .find(|square| square.piece().is(PieceType::King, color))
        .copied()
}

/// Chess board with full game state
#[derive(Clone, Debug)]
pub struct Board {
    squares: Grid,
    turn: Color,
    /// Square of the last legal-move query; a move must start here
    selection: Option<Square>,
    /// Destinations computed for the selection
    legal_moves: Vec<Square>,
    history: Vec<MoveRecord>,
    promotion: PieceType,
    status: GameStatus,
    /// Occurrences of each position signature after an applied move
    positions: HashMap<String, u32>,
    move_generator: MoveGenerator,
}

impl Board {
    /// Create a new board with the starting position
    pub fn new() -> Self {
        let mut pieces = Vec::with_capacity(32);
        for (col, &piece_type) in BACK_RANK.iter().enumerate() {
            pieces.push((0, col, Piece::new(piece_type, Color::Black)));
            pieces.push((1, col, Piece::new(PieceType::Pawn, Color::Black)));
            pieces.push((6, col, Piece::new(PieceType::Pawn, Color::White)));
            pieces.push((7, col, Piece::new(piece_type, Color::White)));
        }
        Board::from_placement(&pieces, Color::White)
    }

    /// Create a board holding only the given pieces.
    ///
    /// Both kings must be present. Pieces count as unmoved, so a king and rook
    /// placed on their home squares may still castle.
    pub fn from_placement(pieces: &[(usize, usize, Piece)], turn: Color) -> Self {
        let mut squares: Grid = [[Square::default(); BOARD_LENGTH]; BOARD_LENGTH];
        for (row, cols) in squares.iter_mut().enumerate() {
            for (col, square) in cols.iter_mut().enumerate() {
                *square = Square::empty(row, col);
            }
        }
        for &(row, col, piece) in pieces {
            squares[row][col].replace_piece(piece);
        }

        assert!(
            find_king(&squares, Color::White).is_some() && find_king(&squares, Color::Black).is_some(),
            "a board needs one king of each color"
        );

        Board {
            squares,
            turn,
            selection: None,
            legal_moves: Vec::new(),
            history: Vec::new(),
            promotion: PieceType::Queen,
            status: GameStatus::InProgress,
            positions: HashMap::new(),
            move_generator: MoveGenerator::new(),
        }
    }

    pub fn squares(&self) -> &Grid {
        &self.squares
    }

    /// Square at the given coordinates, clamped onto the board
    pub fn square(&self, row: usize, col: usize) -> Square {
        self.squares[row.min(BOARD_LENGTH - 1)][col.min(BOARD_LENGTH - 1)]
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn last_move(&self) -> Option<MoveRecord> {
        self.history.last().copied()
    }

    pub fn selection(&self) -> Option<Square> {
        self.selection
    }

    pub fn promotion_choice(&self) -> PieceType {
        self.promotion
    }

    /// Set the type pawns promote to. Anything other than a knight, bishop,
    /// rook or queen is rejected and the previous choice is kept.
    pub fn set_promotion_choice(&mut self, piece_type: PieceType) -> ChessResult<()> {
        if !piece_type.is_promotion_target() {
            return Err(ChessError::InvalidPromotion(piece_type));
        }
        self.promotion = piece_type;
        Ok(())
    }

    /// Swap in an already valid promotion type, returning the old one
    pub(crate) fn replace_promotion_choice(&mut self, piece_type: PieceType) -> PieceType {
        debug_assert!(piece_type.is_promotion_target());
        std::mem::replace(&mut self.promotion, piece_type)
    }

    pub fn game_info(&self) -> GameInfo {
        GameInfo {
            status: self.status,
            squares: self.squares,
            last_move: self.last_move(),
        }
    }

    /// Select a square and compute the legal destinations of its piece.
    ///
    /// Returns nothing when the square does not hold a piece of the side to
    /// move or when the game is over. The selection and the result are
    /// remembered for the next `apply_move`.
    pub fn calc_legal_moves(&mut self, row: i32, col: i32) -> Vec<Square> {
        let (row, col) = (sanitize_coordinate(row), sanitize_coordinate(col));
        let square = self.squares[row][col];

        self.selection = Some(square);
        self.legal_moves.clear();

        if square.piece().color() != self.turn || self.status.is_over() {
            return Vec::new();
        }

        self.legal_moves = self
            .move_generator
            .legal_moves(&self.squares, &self.history, row, col);
        self.legal_moves.clone()
    }

    /// Apply a move from the selected square to one of its legal destinations.
    ///
    /// A move that does not match the last `calc_legal_moves` call is ignored
    /// and the unchanged state is returned.
    pub fn apply_move(&mut self, start_row: i32, start_col: i32, end_row: i32, end_col: i32) -> GameInfo {
        let mv = Move::sanitized(start_row, start_col, end_row, end_col);

        if !self.verify_move(mv) {
            trace!(%mv, "ignoring move that was not offered");
            return self.game_info();
        }

        self.commit_move(mv);
        self.game_info()
    }

    /// Select the start square of `mv` and apply it in one step
    pub fn make_move(&mut self, mv: Move) -> GameInfo {
        self.calc_legal_moves(mv.start_row as i32, mv.start_col as i32);
        self.apply_move(
            mv.start_row as i32,
            mv.start_col as i32,
            mv.end_row as i32,
            mv.end_col as i32,
        )
    }

    fn verify_move(&self, mv: Move) -> bool {
        let Some(selected) = self.selection else {
            return false;
        };

        let is_selected = selected.is_at(mv.start_row, mv.start_col);
        let is_offered = self
            .legal_moves
            .iter()
            .any(|square| square.is_at(mv.end_row, mv.end_col));
        let is_players_piece = selected.piece().color() == self.turn;

        is_selected && is_offered && is_players_piece
    }

    /// Apply a move known to be legal, flip the turn and recompute the status.
    pub(crate) fn commit_move(&mut self, mv: Move) -> GameStatus {
        let mover = self.turn;
        let (piece_type_moved, piece_type_captured) =
            move_on_grid(&mut self.squares, mv, self.promotion);

        self.history.push(MoveRecord {
            mover,
            mv,
            piece_type_moved,
            piece_type_captured,
        });
        self.selection = None;
        self.legal_moves.clear();
        self.turn = self.turn.opposite();
        self.status = self.calc_game_status();

        debug!(%mover, %mv, status = %self.status, "applied move");
        self.status
    }

    /// Every legal move of the side to move, scanning rows then columns.
    /// Empty once the game is over.
    pub fn all_legal_moves(&self) -> Vec<Move> {
        self.movable_pieces()
            .into_iter()
            .flat_map(|(from, targets)| {
                targets
                    .into_iter()
                    .map(move |to| Move::new(from.row(), from.col(), to.row(), to.col()))
            })
            .collect()
    }

    /// Squares of the side to move that have at least one legal destination,
    /// with those destinations. Empty once the game is over.
    pub fn movable_pieces(&self) -> Vec<(Square, Vec<Square>)> {
        if self.status.is_over() {
            return Vec::new();
        }

        self.squares
            .iter()
            .flatten()
            .filter(|square| square.piece().color() == self.turn)
            .filter_map(|square| {
                let targets =
                    self.move_generator
                        .legal_moves(&self.squares, &self.history, square.row(), square.col());
                (!targets.is_empty()).then_some((*square, targets))
            })
            .collect()
    }

    /// Check whether the king of `color` is attacked
    pub fn is_in_check(&self, color: Color) -> bool {
        let king = find_king(&self.squares, color).expect("each side keeps its king");
        self.move_generator
            .is_square_attacked(&self.squares, king.row(), king.col(), color.opposite())
    }

    /// Canonical text of the piece placement plus the side to move.
    /// Castling and en passant rights are not part of it.
    pub fn signature(&self) -> String {
        let mut signature = String::with_capacity(100);
        for square in self.squares.iter().flatten() {
            if let Some(symbol) = square.piece().symbol() {
                signature.push(symbol);
                signature.push_str(&square.row().to_string());
                signature.push_str(&square.col().to_string());
            }
        }
        signature.push_str(&self.turn.to_string());
        signature
    }

    /// Number of times the current position has been reached by an applied move
    pub fn repetition_count(&self) -> u32 {
        self.positions.get(&self.signature()).copied().unwrap_or(0)
    }

    fn calc_game_status(&mut self) -> GameStatus {
        if self.record_position() >= REPETITION_LIMIT {
            return GameStatus::DrawRepetition;
        }

        let in_check = self.is_in_check(self.turn);
        let can_move = self.side_can_move();

        if !can_move {
            return if in_check {
                GameStatus::won_by(self.turn.opposite())
            } else {
                GameStatus::DrawStalemate
            };
        }

        if !self.has_mating_material(Color::White) && !self.has_mating_material(Color::Black) {
            return GameStatus::DrawInsufficientMaterial;
        }

        if self.is_fifty_moves() {
            return GameStatus::Draw50Move;
        }

        GameStatus::InProgress
    }

    /// Count the current position and return how often it has occurred
    fn record_position(&mut self) -> u32 {
        let count = self.positions.entry(self.signature()).or_insert(0);
        *count += 1;
        *count
    }

    fn side_can_move(&self) -> bool {
        self.squares
            .iter()
            .flatten()
            .filter(|square| square.piece().color() == self.turn)
            .any(|square| {
                !self
                    .move_generator
                    .legal_moves(&self.squares, &self.history, square.row(), square.col())
                    .is_empty()
            })
    }

    /// Coarse mating potential of one side: knight 1, bishop 2, rook, queen
    /// or pawn 3. Accumulation stops once the side reaches 3.
    pub fn mating_material(&self, color: Color) -> u32 {
        let mut material = 0;
        for square in self.squares.iter().flatten() {
            if material > 2 {
                break;
            }
            let piece = square.piece();
            if piece.color() != color {
                continue;
            }
            material += match piece.piece_type() {
                PieceType::Knight => 1,
                PieceType::Bishop => 2,
                PieceType::Rook | PieceType::Queen | PieceType::Pawn => 3,
                PieceType::King | PieceType::None => 0,
            };
        }
        material
    }

    fn has_mating_material(&self, color: Color) -> bool {
        self.mating_material(color) > 2
    }

    /// Check if the last 50 half-moves had no pawn move and no capture
    pub fn is_fifty_moves(&self) -> bool {
        self.history.len() >= FIFTY_MOVE_WINDOW
            && self.history[self.history.len() - FIFTY_MOVE_WINDOW..]
                .iter()
                .all(|record| !record.is_pawn_move_or_capture())
    }

    /// Display the board as a string
    pub fn display(&self) -> String {
        let mut lines = Vec::new();
        lines.push("  +---+---+---+---+---+---+---+---+".to_string());

        for (row, cols) in self.squares.iter().enumerate() {
            let mut line = format!("{} |", RANK_NAMES[row] as char);
            for square in cols {
                match square.piece().symbol() {
                    Some(c) => line.push_str(&format!(" {} |", c)),
                    None => line.push_str("   |"),
                }
            }
            lines.push(line);
            lines.push("  +---+---+---+---+---+---+---+---+".to_string());
        }
        lines.push("    a   b   c   d   e   f   g   h".to_string());

        lines.join("\n")
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}
