//! Word lists and the word provider used by the game engine
//!
//! The engine only needs two things from a vocabulary: "is this a word?" and
//! "give me a random word". [`WordProvider`] captures that; [`WordList`] is
//! the in-memory implementation backed by the embedded list or a file.

mod embedded;
pub mod loader;

pub use embedded::{WORDS, WORDS_COUNT};

use rand::seq::IndexedRandom;
use rustc_hash::FxHashSet;
use std::path::Path;
use thiserror::Error;

/// Source of valid words and random targets
///
/// Implementations must be safe to share between threads.
pub trait WordProvider: Send + Sync {
    /// Whether `word` is an acceptable guess
    fn is_valid(&self, word: &str) -> bool;

    /// Pick a random target word
    fn random_word(&self) -> String;
}

/// Error type for word list construction
#[derive(Debug, Error)]
pub enum WordListError {
    #[error("No usable {length}-letter words in word list")]
    Empty { length: usize },
    #[error("Failed to read word list {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// In-memory vocabulary of fixed-length words
#[derive(Debug, Clone)]
pub struct WordList {
    words: Vec<String>,
    lookup: FxHashSet<String>,
    length: usize,
}

impl WordList {
    /// Build a word list keeping only alphabetic words of `length` letters
    ///
    /// Words are lowercased and deduplicated, preserving first occurrence order.
    ///
    /// # Errors
    /// Returns `WordListError::Empty` if no word survives filtering.
    ///
    /// # Examples
    /// ```
    /// use wordlik::wordlists::{WordList, WordProvider};
    ///
    /// let list = WordList::new(["Kocka", "dlaha", "ahoj", "kocka"], 5).unwrap();
    /// assert_eq!(list.len(), 2);
    /// assert!(list.is_valid("KOCKA"));
    /// assert!(!list.is_valid("ahoj"));
    /// ```
    pub fn new<I, S>(words: I, length: usize) -> Result<Self, WordListError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut lookup = FxHashSet::default();
        let mut kept = Vec::new();

        for word in words {
            let word = word.as_ref().trim().to_lowercase();
            if word.chars().count() != length || !word.chars().all(char::is_alphabetic) {
                continue;
            }
            if lookup.insert(word.clone()) {
                kept.push(word);
            }
        }

        if kept.is_empty() {
            return Err(WordListError::Empty { length });
        }

        Ok(Self {
            words: kept,
            lookup,
            length,
        })
    }

    /// Word list built from the vocabulary compiled into the binary
    ///
    /// # Errors
    /// Returns `WordListError::Empty` if the embedded list has no words of `length`.
    pub fn embedded(length: usize) -> Result<Self, WordListError> {
        Self::new(WORDS, length)
    }

    /// Word list loaded from a newline-delimited file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or yields no usable words.
    pub fn from_file<P: AsRef<Path>>(path: P, length: usize) -> Result<Self, WordListError> {
        Self::new(loader::load_from_file(path)?, length)
    }

    /// Letter count shared by every word in the list
    #[must_use]
    pub fn word_length(&self) -> usize {
        self.length
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// All words in the list
    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Random word not present in `history`, or any random word if all are used
    #[must_use]
    pub fn random_unused<'a, I>(&self, history: I) -> String
    where
        I: IntoIterator<Item = &'a str>,
    {
        let used: FxHashSet<&str> = history.into_iter().collect();
        let unused: Vec<&String> = self
            .words
            .iter()
            .filter(|w| !used.contains(w.as_str()))
            .collect();

        unused
            .choose(&mut rand::rng())
            .map_or_else(|| self.random_word(), |w| (*w).clone())
    }
}

impl WordProvider for WordList {
    fn is_valid(&self, word: &str) -> bool {
        self.lookup.contains(&word.trim().to_lowercase())
    }

    fn random_word(&self) -> String {
        // Construction guarantees at least one word
        self.words
            .choose(&mut rand::rng())
            .cloned()
            .unwrap_or_default()
    }
}
