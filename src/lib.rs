//! Word finder for Boggle-style letter grids.
//!
//! A [`Lexicon`] trie is built once from a word list; a [`Solver`] then walks
//! every simple path of 8-adjacent cells on a board, cutting each branch as
//! soon as its letters stop being a prefix of any lexicon word.
//!
//! ```
//! use boggle_solver::Solver;
//!
//! let solver = Solver::new(["cat", "cats", "at", "ca"]);
//! let words = solver.solve_board(2, 2, "catS");
//! assert_eq!(words.len(), 2);
//! assert!(words.contains("cats"));
//! ```

pub mod board;
pub mod lexicon;
pub mod solver;

// Re-export main types
pub use board::{Board, BoardConfig, BoardError, Position};
pub use lexicon::{Lexicon, LexiconError, TrieNode};
pub use solver::{SolveReport, Solver, SolverConfig, MAX_BOARD_CELLS, MIN_WORD_LENGTH};
