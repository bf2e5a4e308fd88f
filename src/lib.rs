//! maxmin_chess - Chess rules engine with a computer opponent
//!
//! A chess engine written in Rust with support for:
//! - Full rules of movement including castling, en passant and promotion
//! - Check, checkmate, stalemate and the usual draw rules
//! - A time-bounded greedy-min search or random play for the computer
//! - An opening book of common lines
//! - A game facade that lets a human play one side

pub mod types;
pub mod error;
pub mod piece;
pub mod board;
pub mod move_generator;
pub mod evaluation;
pub mod search;
pub mod opening_book;
pub mod config;
pub mod game;
