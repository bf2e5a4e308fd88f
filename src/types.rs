//! Type definitions and constants
//!
//! This module provides the core type definitions for representing piece
//! types, colors and board coordinates, along with the helpers that convert
//! between grid coordinates and algebraic square names.

use crate::error::ChessError;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// Number of rows and columns on the board
pub const BOARD_LENGTH: usize = 8;

/// File and rank names for algebraic notation. Row 0 is rank 8.
pub const FILE_NAMES: &[u8; 8] = b"abcdefgh";
pub const RANK_NAMES: &[u8; 8] = b"87654321";

/// Side of a piece or of the player to move
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
    #[default]
    None,
}

impl Color {
    /// The other side. `None` stays `None`.
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
            Color::None => Color::None,
        }
    }

    /// Direction a pawn of this color advances in, in rows
    pub fn pawn_direction(self) -> i32 {
        if self == Color::White {
            -1
        } else {
            1
        }
    }

    /// Row the pawns of this color start on
    pub fn pawn_start_row(self) -> usize {
        if self == Color::White {
            6
        } else {
            1
        }
    }

    /// Row the king and rooks of this color start on
    pub fn home_row(self) -> usize {
        if self == Color::White {
            7
        } else {
            0
        }
    }

    /// Pick White or Black with equal probability
    pub fn random(rng: &mut impl Rng) -> Color {
        if rng.gen_bool(0.5) {
            Color::White
        } else {
            Color::Black
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Color::White => "White",
            Color::Black => "Black",
            Color::None => "",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Color {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "white" | "w" => Ok(Color::White),
            "black" | "b" => Ok(Color::Black),
            _ => Err(ChessError::UnknownColor(s.to_string())),
        }
    }
}

/// Kind of a piece. `None` marks an empty square.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
    #[default]
    None,
}

impl PieceType {
    /// Static material value of the piece type
    pub fn value(self) -> i32 {
        match self {
            PieceType::Pawn => 10,
            PieceType::Knight => 32,
            PieceType::Bishop => 34,
            PieceType::Rook => 50,
            PieceType::Queen => 90,
            PieceType::King => 1000,
            PieceType::None => 0,
        }
    }

    /// Upper-case letter of the piece type as used in FEN
    pub fn letter(self) -> Option<char> {
        match self {
            PieceType::Pawn => Some('P'),
            PieceType::Knight => Some('N'),
            PieceType::Bishop => Some('B'),
            PieceType::Rook => Some('R'),
            PieceType::Queen => Some('Q'),
            PieceType::King => Some('K'),
            PieceType::None => None,
        }
    }

    /// Whether a pawn may promote to this type
    pub fn is_promotion_target(self) -> bool {
        matches!(
            self,
            PieceType::Knight | PieceType::Bishop | PieceType::Rook | PieceType::Queen
        )
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceType::Pawn => "Pawn",
            PieceType::Knight => "Knight",
            PieceType::Bishop => "Bishop",
            PieceType::Rook => "Rook",
            PieceType::Queen => "Queen",
            PieceType::King => "King",
            PieceType::None => "",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for PieceType {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pawn" | "p" => Ok(PieceType::Pawn),
            "knight" | "n" => Ok(PieceType::Knight),
            "bishop" | "b" => Ok(PieceType::Bishop),
            "rook" | "r" => Ok(PieceType::Rook),
            "queen" | "q" => Ok(PieceType::Queen),
            "king" | "k" => Ok(PieceType::King),
            _ => Err(ChessError::UnknownPieceType(s.to_string())),
        }
    }
}

/// Color of a board cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SquareColor {
    Light,
    Dark,
}

/// Light when row + col is even, dark otherwise
#[inline]
pub fn square_color(row: usize, col: usize) -> SquareColor {
    if (row + col) % 2 == 0 {
        SquareColor::Light
    } else {
        SquareColor::Dark
    }
}

/// Clamp a caller-supplied coordinate into [0, 7]
#[inline]
pub fn sanitize_coordinate(n: i32) -> usize {
    n.clamp(0, BOARD_LENGTH as i32 - 1) as usize
}

/// Check whether a signed coordinate pair lies on the board
#[inline]
pub fn is_inside_board(row: i32, col: i32) -> bool {
    (0..BOARD_LENGTH as i32).contains(&row) && (0..BOARD_LENGTH as i32).contains(&col)
}

/// Convert grid coordinates to algebraic notation (e.g., row 6, col 4 is "e2")
pub fn square_name(row: usize, col: usize) -> String {
    format!("{}{}", FILE_NAMES[col] as char, RANK_NAMES[row] as char)
}

/// Convert algebraic notation to grid coordinates
pub fn parse_square(name: &str) -> Option<(usize, usize)> {
    let bytes = name.as_bytes();
    if bytes.len() != 2 {
        return None;
    }

    let col = match bytes[0] {
        b'a'..=b'h' => (bytes[0] - b'a') as usize,
        _ => return None,
    };

    let row = match bytes[1] {
        b'1'..=b'8' => (b'8' - bytes[1]) as usize,
        _ => return None,
    };

    Some((row, col))
}
