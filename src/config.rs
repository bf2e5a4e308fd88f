//! Game configuration

use crate::types::Color;
use std::time::Duration;

/// Thinking time given to the computer when nothing else is configured
pub const DEFAULT_TIME_PER_MOVE_MS: u64 = 1000;

/// Settings chosen when a game starts
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    /// `Color::None` lets a coin flip pick the human's side
    pub human_color: Color,
    /// Zero makes the computer play random moves
    pub time_per_move: Duration,
    pub use_opening_book: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            human_color: Color::White,
            time_per_move: Duration::from_millis(DEFAULT_TIME_PER_MOVE_MS),
            use_opening_book: true,
        }
    }
}

impl GameConfig {
    pub fn new(human_color: Color, time_per_move_ms: u64, use_opening_book: bool) -> Self {
        GameConfig {
            human_color,
            time_per_move: Duration::from_millis(time_per_move_ms),
            use_opening_book,
        }
    }

    pub fn with_human_color(mut self, color: Color) -> Self {
        self.human_color = color;
        self
    }

    pub fn with_time_per_move_ms(mut self, time_per_move_ms: u64) -> Self {
        self.time_per_move = Duration::from_millis(time_per_move_ms);
        self
    }

    pub fn with_opening_book(mut self, use_opening_book: bool) -> Self {
        self.use_opening_book = use_opening_book;
        self
    }

    pub fn computer_color(&self) -> Color {
        self.human_color.opposite()
    }
}
