//! Letter grid with 8-way adjacency.
//!
//! Letters are laid out row-major: `letters[i]` is cell `(i % width, i / width)`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::lexicon::fold_case;

/// Why a board description was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("board dimensions must be positive (got {width}x{height})")]
    InvalidDimensions { width: i32, height: i32 },
    #[error("board has no letters")]
    NoLetters,
    #[error("{width}x{height} board needs {expected} letters, got {actual}")]
    AreaMismatch {
        width: i32,
        height: i32,
        expected: i64,
        actual: usize,
    },
}

/// Position on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// King-move adjacency: Chebyshev distance exactly 1
    pub fn is_adjacent(self, other: Position) -> bool {
        let dx = (self.x - other.x).abs();
        let dy = (self.y - other.y).abs();
        dx <= 1 && dy <= 1 && (dx, dy) != (0, 0)
    }
}

/// Offsets of the 8 surrounding cells
const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Board description as read from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    pub width: i32,
    pub height: i32,
    pub letters: String,
}

impl BoardConfig {
    pub fn into_board(self) -> Result<Board, BoardError> {
        Board::new(self.width, self.height, &self.letters)
    }
}

/// Immutable rectangular grid of lower-cased letters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: i32,
    height: i32,
    letters: Vec<char>,
}

impl Board {
    pub fn new(width: i32, height: i32, letters: &str) -> Result<Self, BoardError> {
        if width <= 0 || height <= 0 {
            return Err(BoardError::InvalidDimensions { width, height });
        }
        if letters.is_empty() {
            return Err(BoardError::NoLetters);
        }

        let letters: Vec<char> = letters.chars().map(fold_case).collect();

        let expected = i64::from(width) * i64::from(height);
        if expected != letters.len() as i64 {
            return Err(BoardError::AreaMismatch {
                width,
                height,
                expected,
                actual: letters.len(),
            });
        }

        Ok(Self {
            width,
            height,
            letters,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.letters.len()
    }

    /// Check if a position lies on the board
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    /// Linear (row-major) index of an in-bounds position
    pub fn index_of(&self, pos: Position) -> usize {
        assert!(self.contains(pos), "position {pos:?} is off the board");
        (pos.y * self.width + pos.x) as usize
    }

    pub fn position_of(&self, index: usize) -> Position {
        assert!(index < self.letters.len(), "cell index {index} is off the board");
        let index = index as i32;
        Position::new(index % self.width, index / self.width)
    }

    /// Letter at an in-bounds position. Panics when `pos` is off the board.
    pub fn char_at(&self, pos: Position) -> char {
        self.letters[self.index_of(pos)]
    }

    /// All on-board cells surrounding `pos`; fewer than 8 on edges and corners
    pub fn neighbors(&self, pos: Position) -> SmallVec<[Position; 8]> {
        NEIGHBOR_OFFSETS
            .iter()
            .map(|&(dx, dy)| Position::new(pos.x + dx, pos.y + dy))
            .filter(|&p| self.contains(p))
            .collect()
    }

    /// Concatenate the letters along `path`, in order
    pub fn word_for_path(&self, path: &[Position]) -> String {
        path.iter().map(|&pos| self.char_at(pos)).collect()
    }

    /// Every cell, row by row
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.letters.len()).map(move |i| self.position_of(i))
    }
}
