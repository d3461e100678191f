use crate::constraints::ConstraintSet;
use crate::results::WordleError;
use rayon::prelude::*;
use std::collections::HashMap;
use std::io::BufRead;
use std::ops::Deref;
use std::result::Result;
use std::sync::Arc;
use tracing::info;

/// A letter along with its location in the word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LocatedLetter {
    pub letter: char,
    /// The zero-based location (i.e. index) for this letter in a word.
    pub location: u8,
}

impl LocatedLetter {
    pub fn new(letter: char, location: u8) -> LocatedLetter {
        LocatedLetter { letter, location }
    }
}

/// The ordered list of candidate words for a game.
///
/// Every word has the same length and consists only of the lowercase letters `a` to `z`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordBank {
    all_words: Vec<Arc<str>>,
    word_length: usize,
}

impl WordBank {
    /// Constructs a new `WordBank` by reading whitespace-separated words from the given reader.
    ///
    /// Words that are not exactly `word_length` lowercase letters long are skipped.
    pub fn from_reader<R: BufRead>(
        word_reader: R,
        word_length: usize,
    ) -> Result<Self, WordleError> {
        let mut all_words: Vec<Arc<str>> = Vec::new();
        for maybe_line in word_reader.lines() {
            let line = maybe_line?;
            all_words.extend(
                line.split_whitespace()
                    .filter(|word| is_candidate(word, word_length))
                    .map(Arc::from),
            );
        }
        info!(num_words = all_words.len(), "loaded word bank");
        Ok(WordBank {
            all_words,
            word_length,
        })
    }

    /// Constructs a new `WordBank` using the given words, skipping any that are not exactly
    /// `word_length` lowercase letters long.
    ///
    /// ```
    /// use wordle_hint_solver::WordBank;
    ///
    /// let bank = WordBank::from_iterator(["apple", "Apple", "pear", "angle"], 5);
    ///
    /// assert_eq!(bank.len(), 2);
    /// ```
    pub fn from_iterator<S, I>(words: I, word_length: usize) -> Self
    where
        S: AsRef<str>,
        I: IntoIterator<Item = S>,
    {
        WordBank {
            all_words: words
                .into_iter()
                .filter(|word| is_candidate(word.as_ref(), word_length))
                .map(|word| Arc::from(word.as_ref()))
                .collect(),
            word_length,
        }
    }

    /// Returns the number of candidate words.
    pub fn len(&self) -> usize {
        self.all_words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all_words.is_empty()
    }

    /// Returns the length of every word in the bank.
    pub fn word_length(&self) -> usize {
        self.word_length
    }

    /// Returns the words that satisfy every given constraint, in their original order.
    pub fn filter(&self, constraints: &ConstraintSet) -> WordBank {
        WordBank {
            all_words: self
                .all_words
                .par_iter()
                .filter(|word| constraints.is_satisfied_by(word))
                .cloned()
                .collect(),
            word_length: self.word_length,
        }
    }
}

impl Deref for WordBank {
    type Target = [Arc<str>];

    fn deref(&self) -> &Self::Target {
        &self.all_words
    }
}

fn is_candidate(word: &str, word_length: usize) -> bool {
    word.len() == word_length && word.bytes().all(|letter| letter.is_ascii_lowercase())
}

/// Counts the number of words that have each letter in each location.
#[derive(Clone, Debug, Default)]
pub struct WordCounter {
    num_words_by_ll: HashMap<LocatedLetter, u32>,
}

impl WordCounter {
    /// Creates a new word counter based on the given word list.
    pub fn new<S>(words: &[S]) -> WordCounter
    where
        S: AsRef<str>,
    {
        let mut num_words_by_ll: HashMap<LocatedLetter, u32> = HashMap::new();
        for word in words {
            for (index, letter) in word.as_ref().chars().enumerate() {
                *num_words_by_ll
                    .entry(LocatedLetter::new(letter, index as u8))
                    .or_insert(0) += 1;
            }
        }
        WordCounter { num_words_by_ll }
    }

    /// Retrieves the count of words with the given letter at the given location.
    pub fn num_words_with_located_letter(&self, ll: &LocatedLetter) -> u32 {
        *self.num_words_by_ll.get(ll).unwrap_or(&0)
    }
}
