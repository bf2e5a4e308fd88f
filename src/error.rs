//! Error types for the input surfaces of the engine.
//!
//! The rules engine itself never fails: illegal moves and out-of-range
//! coordinates are reported as no-ops. These errors cover parsing move
//! notation and rejecting configuration values.

use crate::types::PieceType;

/// Errors raised while parsing or configuring the engine
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChessError {
    /// A move token that does not name a start and an end square
    #[error("Invalid move notation: {token:?}")]
    InvalidNotation { token: String },

    /// Pawns can only promote to a knight, bishop, rook or queen
    #[error("Cannot promote a pawn to {0:?}")]
    InvalidPromotion(PieceType),

    #[error("Unknown color: {0:?}")]
    UnknownColor(String),

    #[error("Unknown piece type: {0:?}")]
    UnknownPieceType(String),
}

/// Result type alias for fallible engine operations
pub type ChessResult<T> = Result<T, ChessError>;
