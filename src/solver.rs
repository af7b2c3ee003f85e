//! Backtracking board solver with trie-prefix pruning.
//!
//! Every cell roots its own depth-first search. A branch is cut as soon as
//! the letters along it stop being a prefix of some lexicon word, so the
//! search only ever walks paths that the trie can still extend. Hits are
//! recorded on the way down; finding a word never stops descent, because it
//! may also be the prefix of a longer one.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use smallvec::SmallVec;

use crate::board::{Board, Position};
use crate::lexicon::{Lexicon, TrieNode};

/// Shortest path length that counts as a word
pub const MIN_WORD_LENGTH: usize = 3;

/// Largest board (in cells) the solver accepts
pub const MAX_BOARD_CELLS: usize = 4096;

/// How many search nodes to visit between deadline checks
const DEADLINE_CHECK_INTERVAL: usize = 1024;

/// Configuration for the solver
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Minimum letters in a reported word
    pub min_word_length: usize,
    /// Boards with more cells than this are rejected
    pub max_board_cells: usize,
    /// Optional deadline for one solve; the search unwinds when it passes
    pub timeout: Option<Duration>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            min_word_length: MIN_WORD_LENGTH,
            max_board_cells: MAX_BOARD_CELLS,
            timeout: None,
        }
    }
}

/// Result of one solve
#[derive(Debug, Clone, Default)]
pub struct SolveReport {
    /// Every word found, with the first path that spelled it
    pub found: HashMap<String, Vec<Position>>,
    /// True only when every starting cell was searched to the end. False
    /// when the timeout cut the search short or the board was rejected.
    pub search_exhausted: bool,
    /// Why the board was not searched at all
    pub rejection: Option<String>,
    /// Cells entered whose letters were still a viable prefix
    pub nodes_explored: usize,
    /// Cells rejected by the prefix check
    pub branches_pruned: usize,
    /// Time elapsed in milliseconds
    pub time_elapsed_ms: u64,
}

impl SolveReport {
    fn rejected(reason: String) -> Self {
        Self {
            search_exhausted: false,
            rejection: Some(reason),
            ..Default::default()
        }
    }

    /// Copy of the distinct words found
    pub fn words(&self) -> HashSet<String> {
        self.found.keys().cloned().collect()
    }

    /// Consume the report, keeping only the words
    pub fn into_words(self) -> HashSet<String> {
        self.found.into_keys().collect()
    }

    /// Path that spelled `word`, if it was found
    pub fn path_for(&self, word: &str) -> Option<&[Position]> {
        self.found.get(word).map(Vec::as_slice)
    }
}

/// Word finder bound to one lexicon. Holds no per-solve state, so a single
/// solver can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct Solver {
    lexicon: Lexicon,
    config: SolverConfig,
}

impl Solver {
    /// Build the lexicon from a word list and use the default configuration
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_config(Lexicon::new(words), SolverConfig::default())
    }

    /// Use an already built lexicon with an explicit configuration
    pub fn with_config(lexicon: Lexicon, config: SolverConfig) -> Self {
        Self { lexicon, config }
    }

    /// Lexicon the solver matches against
    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Configuration this solver was built with
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// All lexicon words spelled by simple 8-adjacent paths on the board.
    /// Malformed boards give an empty set.
    pub fn solve_board(&self, width: i32, height: i32, letters: &str) -> HashSet<String> {
        self.solve_board_with_report(width, height, letters)
            .into_words()
    }

    /// Like [`Solver::solve_board`], but keeps paths, counters and any
    /// rejection reason
    pub fn solve_board_with_report(&self, width: i32, height: i32, letters: &str) -> SolveReport {
        match Board::new(width, height, letters) {
            Ok(board) => self.solve(&board),
            Err(err) => {
                tracing::debug!(%err, "rejecting board");
                SolveReport::rejected(err.to_string())
            }
        }
    }

    /// Run the search from every cell of an already validated board
    pub fn solve(&self, board: &Board) -> SolveReport {
        if board.cell_count() > self.config.max_board_cells {
            tracing::warn!(
                cells = board.cell_count(),
                max = self.config.max_board_cells,
                "board exceeds the cell limit"
            );
            return SolveReport::rejected(format!(
                "board has {} cells, limit is {}",
                board.cell_count(),
                self.config.max_board_cells
            ));
        }

        let start_time = Instant::now();
        let mut search = Search::new(board, &self.config, start_time);

        // Nothing to find; skip the walk
        if !self.lexicon.is_empty() {
            for pos in board.positions() {
                if search.timed_out {
                    break;
                }
                search.visit(pos, self.lexicon.root());
            }
        }

        let report = SolveReport {
            search_exhausted: !search.timed_out,
            rejection: None,
            nodes_explored: search.nodes_explored,
            branches_pruned: search.branches_pruned,
            time_elapsed_ms: start_time.elapsed().as_millis() as u64,
            found: search.found,
        };

        if report.search_exhausted {
            tracing::debug!(
                width = board.width(),
                height = board.height(),
                words = report.found.len(),
                explored = report.nodes_explored,
                pruned = report.branches_pruned,
                "board solved"
            );
        } else {
            tracing::warn!(
                words = report.found.len(),
                elapsed_ms = report.time_elapsed_ms,
                "search timed out"
            );
        }
        report
    }
}

/// Mutable state of one solve. Never outlives the call that created it.
struct Search<'a> {
    board: &'a Board,
    min_word_length: usize,
    deadline: Option<Instant>,
    /// Cells of the current candidate, in order
    path: SmallVec<[Position; 16]>,
    /// Letters of the current candidate
    word: String,
    /// Path membership, indexed by linear cell index
    visited: Vec<bool>,
    found: HashMap<String, Vec<Position>>,
    nodes_explored: usize,
    branches_pruned: usize,
    timed_out: bool,
}

impl<'a> Search<'a> {
    fn new(board: &'a Board, config: &SolverConfig, start_time: Instant) -> Self {
        Self {
            board,
            min_word_length: config.min_word_length,
            deadline: config.timeout.map(|t| start_time + t),
            path: SmallVec::new(),
            word: String::new(),
            visited: vec![false; board.cell_count()],
            found: HashMap::new(),
            nodes_explored: 0,
            branches_pruned: 0,
            timed_out: false,
        }
    }

    fn deadline_passed(&mut self) -> bool {
        if let Some(deadline) = self.deadline {
            if (self.nodes_explored + self.branches_pruned) % DEADLINE_CHECK_INTERVAL == 0
                && Instant::now() >= deadline
            {
                self.timed_out = true;
            }
        }
        self.timed_out
    }

    /// Extend the current path with `pos`. `parent` is the trie node for the
    /// letters already on the path.
    fn visit(&mut self, pos: Position, parent: &TrieNode) {
        if self.deadline_passed() {
            return;
        }

        let letter = self.board.char_at(pos);
        // Not a prefix of any word: drop the whole subtree
        let Some(node) = parent.child(letter) else {
            self.branches_pruned += 1;
            return;
        };
        self.nodes_explored += 1;

        debug_assert!(self.path.last().map_or(true, |&last| last.is_adjacent(pos)));
        let index = self.board.index_of(pos);
        self.visited[index] = true;
        self.path.push(pos);
        self.word.push(letter);

        if self.path.len() >= self.min_word_length
            && node.is_terminal()
            && !self.found.contains_key(&self.word)
        {
            self.found.insert(self.word.clone(), self.path.to_vec());
        }

        if node.has_children() {
            for next in self.board.neighbors(pos) {
                if !self.visited[self.board.index_of(next)] {
                    self.visit(next, node);
                }
            }
        }

        // Backtrack
        self.word.pop();
        self.path.pop();
        self.visited[index] = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cat_solver() -> Solver {
        Solver::new(["cat", "cats", "at", "ca"])
    }

    #[test]
    fn test_small_board() {
        let words = cat_solver().solve_board(2, 2, "catS");
        let expected: HashSet<String> = ["cat", "cats"].iter().map(|s| s.to_string()).collect();
        assert_eq!(words, expected);
    }

    #[test]
    fn test_short_words_excluded() {
        let words = cat_solver().solve_board(2, 2, "cats");
        assert!(!words.contains("ca"));
        assert!(!words.contains("at"));
    }

    #[test]
    fn test_empty_lexicon() {
        let solver = Solver::new(Vec::<&str>::new());
        assert!(solver.solve_board(2, 2, "cats").is_empty());
    }

    #[test]
    fn test_malformed_input() {
        let solver = cat_solver();
        assert!(solver.solve_board(-1, 2, "cats").is_empty());
        assert!(solver.solve_board(2, -2, "cats").is_empty());
        assert!(solver.solve_board(0, 0, "").is_empty());
        assert!(solver.solve_board(2, 2, "").is_empty());
        assert!(solver.solve_board(3, 2, "cats").is_empty());
        assert_eq!(solver.solve_board(4, 1, "cats").len(), 2);
    }

    #[test]
    fn test_board_and_lexicon_fold_case_alike() {
        let solver = Solver::new(["İab", "ΟΔΟΣ"]);
        assert_eq!(solver.solve_board(3, 1, "İAB").len(), 1);
        assert_eq!(solver.solve_board(2, 2, "ΟΔΣΟ").len(), 1);
    }

    #[test]
    fn test_cells_not_reused() {
        // "aba" needs the single 'a' twice
        let solver = Solver::new(["aba", "ab"]);
        assert!(solver.solve_board(2, 1, "ab").is_empty());
        assert_eq!(solver.solve_board(3, 1, "aba").len(), 1);
    }

    #[test]
    fn test_non_adjacent_cells_not_joined() {
        // a . c in a row: 'a' and 'c' are two apart
        let solver = Solver::new(["acb", "abc"]);
        let words = solver.solve_board(3, 1, "abc");
        assert!(words.contains("abc"));
        assert!(!words.contains("acb"));
    }

    #[test]
    fn test_diagonal_adjacency() {
        // a b
        // c d   -> "adb" goes diagonally then up
        let solver = Solver::new(["adb", "dca"]);
        let words = solver.solve_board(2, 2, "abcd");
        assert_eq!(words.len(), 2);
    }

    #[test]
    fn test_configurable_min_length() {
        let config = SolverConfig {
            min_word_length: 2,
            ..Default::default()
        };
        let solver = Solver::with_config(Lexicon::new(["cat", "cats", "at", "ca"]), config);
        assert_eq!(solver.solve_board(2, 2, "cats").len(), 4);
    }

    #[test]
    fn test_cell_limit() {
        let config = SolverConfig {
            max_board_cells: 3,
            ..Default::default()
        };
        let solver = Solver::with_config(Lexicon::new(["cat"]), config);
        let report = solver.solve_board_with_report(2, 2, "cats");
        assert!(report.found.is_empty());
        assert!(!report.search_exhausted);
        assert!(report.rejection.unwrap().contains("limit is 3"));
    }

    #[test]
    fn test_oversize_board_not_reported_as_searched() {
        // 65x65 is over the default limit even though it starts with "cat"
        let letters = format!("cat{}", "x".repeat(65 * 65 - 3));
        let report = Solver::new(["cat"]).solve_board_with_report(65, 65, &letters);
        assert!(report.found.is_empty());
        assert!(!report.search_exhausted);
        assert_eq!(report.nodes_explored, 0);
        assert!(report.rejection.is_some());
    }

    #[test]
    fn test_malformed_board_report() {
        let report = cat_solver().solve_board_with_report(3, 2, "cats");
        assert!(report.found.is_empty());
        assert!(!report.search_exhausted);
        assert!(report.rejection.unwrap().contains("needs 6 letters"));

        let report = cat_solver().solve_board_with_report(2, 2, "cats");
        assert!(report.search_exhausted);
        assert!(report.rejection.is_none());
    }

    #[test]
    fn test_report_paths() {
        let report = cat_solver().solve_board_with_report(2, 2, "cats");
        assert!(report.search_exhausted);
        assert!(report.nodes_explored > 0);
        assert_eq!(report.words().len(), 2);

        let path = report.path_for("cats").unwrap();
        assert_eq!(path.len(), 4);
        assert!(path.windows(2).all(|w| w[0].is_adjacent(w[1])));
        let board = Board::new(2, 2, "cats").unwrap();
        assert_eq!(board.word_for_path(path), "cats");
    }

    #[test]
    fn test_pruning_counts() {
        // No lexicon word starts with 'x', so every 'x' start is cut immediately
        let solver = Solver::new(["cat"]);
        let report = solver.solve_board_with_report(2, 2, "xxxx");
        assert_eq!(report.nodes_explored, 0);
        assert_eq!(report.branches_pruned, 4);
    }

    #[test]
    fn test_zero_timeout_stops_search() {
        let config = SolverConfig {
            timeout: Some(Duration::ZERO),
            ..Default::default()
        };
        let solver = Solver::with_config(Lexicon::new(["cat"]), config);
        let report = solver.solve_board_with_report(2, 2, "cats");
        assert!(!report.search_exhausted);
        assert!(report.found.is_empty());
    }
}
