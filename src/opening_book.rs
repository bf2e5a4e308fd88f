//! Opening Book Module
//!
//! A tree of well-known opening lines. The book follows the game move by
//! move; once a move leaves the tree the book stays silent until reset.

use crate::board::Move;
use crate::error::ChessResult;
use rand::prelude::*;
use tracing::info;

/// Built-in opening lines in piece-prefixed shorthand
pub const OPENINGS: &[(&str, &str)] = &[
    ("Ruy Lopez", "e2-e4 e7-e5 Kng1-f3 Knb8-c6 Bf1-b5 a7-a6"),
    ("Italian Game", "e2-e4 e7-e5 Kng1-f3 Knb8-c6 Bf1-c4 Bf8-c5"),
    ("Sicilian Defence", "e2-e4 c7-c5 Kng1-f3 Knb8-c6"),
    ("French Defence", "e2-e4 e7-e6 d2-d4 d7-d5"),
    ("Caro-Kann Defence", "e2-e4 c7-c6 d2-d4 d7-d5"),
    ("Queen's Pawn Game", "d2-d4 d7-d5"),
    ("English Opening", "c2-c4 e7-e5"),
    ("Reti Opening", "Kng1-f3 d7-d5"),
];

/// Parse a whitespace-separated line of moves such as "e2-e4 e7-e5 Kng1-f3"
pub fn parse_line(line: &str) -> ChessResult<Vec<Move>> {
    line.split_whitespace().map(str::parse).collect()
}

/// A node of the opening tree. Only the root has no move.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Node {
    pub mv: Option<Move>,
    pub children: Vec<Node>,
}

impl Node {
    fn child(&self, mv: Move) -> Option<usize> {
        self.children.iter().position(|child| child.mv == Some(mv))
    }

    /// Insert a line below this node, sharing any common prefix
    fn add_line(&mut self, moves: &[Move]) {
        let Some((&first, rest)) = moves.split_first() else {
            return;
        };

        let index = match self.child(first) {
            Some(index) => index,
            None => {
                self.children.push(Node {
                    mv: Some(first),
                    children: Vec::new(),
                });
                self.children.len() - 1
            }
        };
        self.children[index].add_line(rest);
    }
}

/// Opening tree with a cursor into it
#[derive(Clone, Debug)]
pub struct OpeningBook {
    root: Node,
    /// Child indices from the root to the current node; `None` once off-book
    cursor: Option<Vec<usize>>,
    active: bool,
    rng: StdRng,
}

impl OpeningBook {
    /// Book of the built-in openings
    pub fn new() -> Self {
        OpeningBook::from_lines(OPENINGS.iter().map(|&(_, line)| line))
            .expect("built-in opening lines are valid")
    }

    /// Build a book from lines of shorthand moves
    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> ChessResult<Self> {
        let mut root = Node::default();
        for line in lines {
            root.add_line(&parse_line(line)?);
        }

        Ok(OpeningBook {
            root,
            cursor: Some(Vec::new()),
            active: true,
            rng: StdRng::from_entropy(),
        })
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Return the cursor to the root and switch the book on or off
    pub fn reset(&mut self, active: bool) {
        self.cursor = Some(Vec::new());
        self.active = active;
    }

    fn current(&self) -> Option<&Node> {
        let path = self.cursor.as_ref()?;
        path.iter()
            .try_fold(&self.root, |node, &index| node.children.get(index))
    }

    /// True once the game has left the book or the line has ended
    pub fn out_of_moves(&self) -> bool {
        self.current().map_or(true, |node| node.children.is_empty())
    }

    /// A uniformly random continuation of the current line
    pub fn find_move(&mut self) -> Option<Move> {
        let count = self.current()?.children.len();
        if count == 0 {
            return None;
        }
        let index = self.rng.gen_range(0..count);
        self.current()?.children.get(index)?.mv
    }

    /// Follow a played move. A move the book does not know leaves the book
    /// for good.
    pub fn traverse(&mut self, mv: Move) {
        let next = self.current().and_then(|node| node.child(mv));

        match (next, self.cursor.as_mut()) {
            (Some(index), Some(path)) => path.push(index),
            _ => {
                if self.cursor.take().is_some() {
                    info!(%mv, "left the opening book");
                }
            }
        }
    }
}

impl Default for OpeningBook {
    fn default() -> Self {
        OpeningBook::new()
    }
}
