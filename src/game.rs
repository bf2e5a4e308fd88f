//! Game Module
//!
//! The facade a front end talks to. It owns the board, the computer
//! opponent and the opening book, and makes sure the human only moves on
//! their own turn.

use crate::board::{Board, GameInfo, GameStatus, Grid, Move};
use crate::config::GameConfig;
use crate::error::ChessResult;
use crate::opening_book::OpeningBook;
use crate::piece::Square;
use crate::search::Computer;
use crate::types::{Color, PieceType};
use tracing::{debug, info, warn};

/// A game between a human and the computer
pub struct Game {
    board: Board,
    computer: Computer,
    opening_book: OpeningBook,
    config: GameConfig,
}

impl Game {
    /// Start a game with the default configuration
    pub fn new() -> Self {
        Game::with_config(GameConfig::default())
    }

    /// Start a game with the given configuration
    pub fn with_config(config: GameConfig) -> Self {
        let config = resolve_colors(config);
        let mut opening_book = OpeningBook::new();
        opening_book.reset(config.use_opening_book);

        info!(
            human = %config.human_color,
            time_per_move_ms = config.time_per_move.as_millis() as u64,
            opening_book = config.use_opening_book,
            "new game"
        );

        Game {
            board: Board::new(),
            computer: Computer::new(config.computer_color(), config.time_per_move),
            opening_book,
            config,
        }
    }

    /// Reset to the starting position with new settings
    pub fn new_game(&mut self, human_color: Color, time_per_move_ms: u64, use_opening_book: bool) {
        *self = Game::with_config(GameConfig::new(human_color, time_per_move_ms, use_opening_book));
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn human_color(&self) -> Color {
        self.config.human_color
    }

    pub fn computer_color(&self) -> Color {
        self.computer.color()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_snapshot(&self) -> Grid {
        *self.board.squares()
    }

    pub fn turn(&self) -> Color {
        self.board.turn()
    }

    pub fn status(&self) -> GameStatus {
        self.board.status()
    }

    pub fn game_info(&self) -> GameInfo {
        self.board.game_info()
    }

    pub fn opening_book(&self) -> &OpeningBook {
        &self.opening_book
    }

    /// Legal destinations of a human piece; empty on the computer's turn
    pub fn legal_moves(&mut self, row: i32, col: i32) -> Vec<Square> {
        if !self.is_human_turn() {
            return Vec::new();
        }
        self.board.calc_legal_moves(row, col)
    }

    /// Apply a human move previously offered by `legal_moves`
    pub fn apply_move(&mut self, start_row: i32, start_col: i32, end_row: i32, end_col: i32) -> GameInfo {
        if !self.is_human_turn() {
            debug!("ignoring human move on the computer's turn");
            return self.board.game_info();
        }

        let played = self.board.history().len();
        let game_info = self.board.apply_move(start_row, start_col, end_row, end_col);
        if self.board.history().len() > played {
            self.after_move(&game_info);
        }
        game_info
    }

    pub fn set_promotion_choice(&mut self, piece_type: PieceType) -> ChessResult<()> {
        self.board.set_promotion_choice(piece_type)
    }

    /// Let the computer move, from the book while it lasts, by search after.
    /// The computer always promotes to a queen; the human's choice is put
    /// back afterwards.
    pub fn request_opponent_move(&mut self) -> GameInfo {
        if self.board.turn() != self.computer.color() || self.board.status().is_over() {
            return self.board.game_info();
        }

        let human_choice = self.board.replace_promotion_choice(PieceType::Queen);
        let game_info = self.play_computer_turn();
        self.board.replace_promotion_choice(human_choice);
        game_info
    }

    fn play_computer_turn(&mut self) -> GameInfo {
        if self.opening_book.is_active() && !self.opening_book.out_of_moves() {
            if let Some(mv) = self.opening_book.find_move() {
                if let Some(game_info) = self.play_computer_move(mv) {
                    debug!(%mv, "played book move");
                    return game_info;
                }
                warn!(%mv, "book move rejected, switching the book off");
                self.opening_book.reset(false);
            }
        }

        match self.computer.find_move(&self.board) {
            Some(mv) => self
                .play_computer_move(mv)
                .unwrap_or_else(|| self.board.game_info()),
            None => self.board.game_info(),
        }
    }

    /// `None` if the board refused the move
    fn play_computer_move(&mut self, mv: Move) -> Option<GameInfo> {
        let played = self.board.history().len();
        let game_info = self.board.make_move(mv);
        if self.board.history().len() == played {
            return None;
        }
        self.after_move(&game_info);
        Some(game_info)
    }

    fn after_move(&mut self, game_info: &GameInfo) {
        if let Some(record) = game_info.last_move {
            if self.opening_book.is_active() {
                self.opening_book.traverse(record.mv);
            }
        }
        if game_info.status.is_over() {
            info!(status = %game_info.status, moves = self.board.history().len(), "game over");
        }
    }

    fn is_human_turn(&self) -> bool {
        self.board.turn() == self.config.human_color
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}

/// Replace an unset human color with a random side
fn resolve_colors(config: GameConfig) -> GameConfig {
    if config.human_color == Color::None {
        let color = Color::random(&mut rand::thread_rng());
        config.with_human_color(color)
    } else {
        config
    }
}
