//! Search Engine Module
//!
//! The computer opponent. With a time budget it runs a greedy-min search:
//! - Every own move is answered by the reply that is worst for us
//! - Only the best few lines survive between rounds
//! - Surviving lines are deepened by one own move and one reply per round
//!   until the budget runs out
//!
//! With a zero budget it plays a uniformly random legal move.

use crate::board::{Board, Move};
use crate::evaluation::evaluate;
use crate::types::Color;
use rand::prelude::*;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Score of a line that checkmates the opponent
pub const MATE_SCORE: i32 = i32::MAX;

/// Lines kept after the first round
const FIRST_BATCH_SIZE: usize = 4;

/// Pool size that triggers pruning in later rounds
const POOL_LIMIT: usize = 27;

/// Lines kept after pruning
const POOL_KEEP: usize = 3;

/// A candidate line: the position it reaches, the root move it started
/// with and that position's score
#[derive(Clone, Debug)]
pub struct EvalInfo {
    pub board: Board,
    pub root_move: Move,
    pub score: i32,
}

/// A chosen move with the score of its line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoredMove {
    pub mv: Move,
    pub score: i32,
}

enum FirstBatch {
    Mate(ScoredMove),
    Pool(Vec<EvalInfo>),
}

/// Computer opponent for one color
pub struct Computer {
    color: Color,
    time_per_move: Duration,
    rng: StdRng,
    /// Positions evaluated by the last search
    pub nodes_searched: u64,
    /// Deepening rounds completed by the last search
    pub rounds: u32,
}

impl Computer {
    pub fn new(color: Color, time_per_move: Duration) -> Self {
        Computer::with_rng(color, time_per_move, StdRng::from_entropy())
    }

    /// Computer with a fixed random seed, for reproducible random play
    pub fn with_seed(color: Color, time_per_move: Duration, seed: u64) -> Self {
        Computer::with_rng(color, time_per_move, StdRng::seed_from_u64(seed))
    }

    fn with_rng(color: Color, time_per_move: Duration, rng: StdRng) -> Self {
        Computer {
            color,
            time_per_move,
            rng,
            nodes_searched: 0,
            rounds: 0,
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Pick a move for the position, or `None` when it is not this
    /// computer's turn or there is nothing to play
    pub fn find_move(&mut self, board: &Board) -> Option<Move> {
        if self.time_per_move.is_zero() {
            self.random_move(board)
        } else {
            self.max_min_move(board).map(|best| best.mv)
        }
    }

    /// Uniformly pick a movable piece, then one of its destinations
    pub fn random_move(&mut self, board: &Board) -> Option<Move> {
        if board.turn() != self.color {
            return None;
        }

        let movable = board.movable_pieces();
        let (from, targets) = movable.choose(&mut self.rng)?;
        let to = targets.choose(&mut self.rng)?;
        Some(Move::new(from.row(), from.col(), to.row(), to.col()))
    }

    /// Time-bounded greedy-min search.
    ///
    /// Returns the best root move and the score of its line. A move that
    /// checkmates at once is returned immediately with `MATE_SCORE`.
    pub fn max_min_move(&mut self, board: &Board) -> Option<ScoredMove> {
        self.nodes_searched = 0;
        self.rounds = 0;

        if board.turn() != self.color || board.status().is_over() {
            return None;
        }

        let start = Instant::now();

        let mut pool = match self.first_batch(board) {
            FirstBatch::Mate(mate) => {
                debug!(mv = %mate.mv, "found mate in one");
                return Some(mate);
            }
            FirstBatch::Pool(pool) => pool,
        };

        while start.elapsed() <= self.time_per_move {
            let mut next = Vec::with_capacity(pool.len() * 32);
            let mut expanded = false;

            for info in &pool {
                expanded |= self.expand(info, &mut next);
            }
            pool = next;
            prune(&mut pool);

            self.rounds += 1;
            debug!(
                round = self.rounds,
                lines = pool.len(),
                best_score = pool.iter().map(|info| info.score).max().unwrap_or(i32::MIN),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "greedy-min round"
            );

            if !expanded {
                break;
            }
        }

        rank(&mut pool);
        let best = pool.first()?;
        debug!(
            mv = %best.root_move,
            score = best.score,
            rounds = self.rounds,
            nodes = self.nodes_searched,
            "search finished"
        );

        Some(ScoredMove {
            mv: best.root_move,
            score: best.score,
        })
    }

    /// Score every root move by its worst reply, keeping the best few
    fn first_batch(&mut self, board: &Board) -> FirstBatch {
        let mut pool: Vec<EvalInfo> = Vec::with_capacity(FIRST_BATCH_SIZE + 1);

        for mv in board.all_legal_moves() {
            let mut after = board.clone();
            after.commit_move(mv);

            if after.status().winner() == Some(self.color) {
                return FirstBatch::Mate(ScoredMove {
                    mv,
                    score: MATE_SCORE,
                });
            }

            let (reached, score) = self.worst_reply(after);
            trace!(%mv, score, "root candidate");
            pool.push(EvalInfo {
                board: reached,
                root_move: mv,
                score,
            });

            if pool.len() > FIRST_BATCH_SIZE {
                rank(&mut pool);
                pool.pop();
            }
        }

        FirstBatch::Pool(pool)
    }

    /// Extend a line by each own move and its worst reply. Finished lines
    /// are carried over as they are. Returns whether the line grew.
    fn expand(&mut self, info: &EvalInfo, next: &mut Vec<EvalInfo>) -> bool {
        if info.board.status().is_over() || info.board.turn() != self.color {
            next.push(info.clone());
            return false;
        }

        for mv in info.board.all_legal_moves() {
            let mut after = info.board.clone();
            after.commit_move(mv);

            let (reached, score) = if after.status().winner() == Some(self.color) {
                (after, MATE_SCORE)
            } else {
                self.worst_reply(after)
            };

            trace!(root = %info.root_move, %mv, score, "line extended");
            next.push(EvalInfo {
                board: reached,
                root_move: info.root_move,
                score,
            });
        }

        true
    }

    /// The opponent's reply that minimizes our evaluation. Ties keep the
    /// first reply found. Without a reply the position itself is scored.
    fn worst_reply(&mut self, after_own: Board) -> (Board, i32) {
        let mut worst: Option<(Board, i32)> = None;

        for reply in after_own.all_legal_moves() {
            let mut after_reply = after_own.clone();
            after_reply.commit_move(reply);
            let score = evaluate(&after_reply, self.color);
            self.nodes_searched += 1;

            if worst.as_ref().map_or(true, |(_, lowest)| score < *lowest) {
                worst = Some((after_reply, score));
            }
        }

        match worst {
            Some(found) => found,
            None => {
                self.nodes_searched += 1;
                let score = evaluate(&after_own, self.color);
                (after_own, score)
            }
        }
    }
}

/// Sort lines best first. The sort is stable, so equal scores keep their
/// generation order.
fn rank(pool: &mut [EvalInfo]) {
    pool.sort_by(|a, b| b.score.cmp(&a.score));
}

/// Cut an oversized pool down to its best lines
fn prune(pool: &mut Vec<EvalInfo>) {
    if pool.len() > POOL_LIMIT {
        rank(pool);
        pool.truncate(POOL_KEEP);
    }
}
