//! Prefix-tree lexicon used to prune the board search.
//!
//! The trie answers two questions: whether a string is a complete word, and
//! whether it is a prefix of at least one word. The second one is what keeps
//! the search tractable: the solver abandons a branch as soon as its letters
//! stop being a prefix of anything in the lexicon.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while loading a word list
#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("failed to read word list {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read word list line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: io::Error,
    },
}

/// Lower-case a single letter. Board cells and lexicon words both go through
/// this, so a letter whose lowercase form is several chars keeps only the
/// first on either side.
pub fn fold_case(letter: char) -> char {
    letter.to_lowercase().next().unwrap_or(letter)
}

/// One letter position shared by every word with a common prefix
#[derive(Debug, Clone, Default)]
pub struct TrieNode {
    terminal: bool,
    children: HashMap<char, TrieNode>,
}

impl TrieNode {
    /// True if some inserted word ends exactly at this node
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Follow the edge for `letter`, if any word continues with it
    pub fn child(&self, letter: char) -> Option<&TrieNode> {
        self.children.get(&letter)
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Returns true if the word was not already present
    fn insert(&mut self, word: &str) -> bool {
        let mut node = self;
        for letter in word.chars() {
            node = node.children.entry(letter).or_default();
        }
        let added = !node.terminal;
        node.terminal = true;
        added
    }
}

/// Immutable, lower-cased word index
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    root: TrieNode,
    words: usize,
}

impl Lexicon {
    /// Build a lexicon from a word list. Words are lower-cased; empty entries
    /// are ignored, so an empty list gives an empty (but usable) lexicon.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut lexicon = Self::default();
        for word in words {
            lexicon.insert(word.as_ref());
        }
        lexicon
    }

    /// Read one word per line. Whitespace around each line is trimmed and
    /// blank lines are skipped.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, LexiconError> {
        let mut lexicon = Self::default();
        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| LexiconError::Read {
                line: index + 1,
                source,
            })?;
            lexicon.insert(line.trim());
        }
        Ok(lexicon)
    }

    /// Load a word list file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LexiconError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LexiconError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let lexicon = Self::from_reader(BufReader::new(file))?;
        tracing::debug!(path = %path.display(), words = lexicon.len(), "loaded word list");
        Ok(lexicon)
    }

    fn insert(&mut self, word: &str) {
        if word.is_empty() {
            return;
        }
        let word: String = word.chars().map(fold_case).collect();
        if self.root.insert(&word) {
            self.words += 1;
        }
    }

    /// Number of distinct words
    pub fn len(&self) -> usize {
        self.words
    }

    pub fn is_empty(&self) -> bool {
        self.words == 0
    }

    /// Root of the trie. It carries no letter of its own.
    pub fn root(&self) -> &TrieNode {
        &self.root
    }

    /// Check if `query` is a complete word (case-insensitive)
    pub fn is_word(&self, query: &str) -> bool {
        self.find_node(query).is_some_and(TrieNode::is_terminal)
    }

    /// Check if `query` is a prefix of at least one word (case-insensitive).
    /// Complete words count as their own prefix.
    pub fn is_partial_word(&self, query: &str) -> bool {
        self.find_node(query).is_some()
    }

    fn find_node(&self, query: &str) -> Option<&TrieNode> {
        if query.is_empty() {
            return None;
        }
        query
            .chars()
            .map(fold_case)
            .try_fold(&self.root, |node, letter| node.child(letter))
    }
}
