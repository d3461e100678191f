use crate::data::LocatedLetter;
use crate::data::WordCounter;
use rayon::prelude::*;
use std::sync::Arc;

/// Gives words a score, where the maximum score indicates the best guess.
pub trait WordScorer {
    /// Determines a score for the given word. The higher the score, the better the guess.
    fn score_word(&self, word: &str) -> u64;
}

/// Scores words by how common each of their letters is at that location among the remaining
/// candidates. A word's score is the sum, over its letters, of the number of candidates with the
/// same letter in the same place.
///
/// Repeated letters are scored at each of their locations, and no attempt is made to favour
/// words that would reveal more information.
#[derive(Clone, Debug)]
pub struct LocatedLetterFrequencyScorer {
    counter: WordCounter,
}

impl LocatedLetterFrequencyScorer {
    /// Constructs a `LocatedLetterFrequencyScorer` from the current candidate words.
    ///
    /// ```
    /// use wordle_hint_solver::WordBank;
    /// use wordle_hint_solver::scorers::LocatedLetterFrequencyScorer;
    /// use wordle_hint_solver::scorers::WordScorer;
    ///
    /// let bank = WordBank::from_iterator(["cigar", "cider", "sugar"], 5);
    /// let scorer = LocatedLetterFrequencyScorer::new(&*bank);
    ///
    /// assert_eq!(scorer.score_word("cigar"), 2 + 2 + 2 + 2 + 3);
    /// ```
    pub fn new<S>(words: &[S]) -> LocatedLetterFrequencyScorer
    where
        S: AsRef<str>,
    {
        LocatedLetterFrequencyScorer {
            counter: WordCounter::new(words),
        }
    }
}

impl WordScorer for LocatedLetterFrequencyScorer {
    fn score_word(&self, word: &str) -> u64 {
        word.chars()
            .enumerate()
            .map(|(index, letter)| {
                self.counter
                    .num_words_with_located_letter(&LocatedLetter::new(letter, index as u8))
                    as u64
            })
            .sum()
    }
}

/// Selects the word with the highest score. Ties go to the word that comes first.
///
/// Returns `None` iff there are no words.
pub fn select_best_guess<S>(words: &[Arc<str>], scorer: &S) -> Option<Arc<str>>
where
    S: WordScorer + Sync,
{
    let scores: Vec<u64> = words
        .par_iter()
        .map(|word| scorer.score_word(word))
        .collect();
    let mut best: Option<(usize, u64)> = None;
    for (index, score) in scores.into_iter().enumerate() {
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((index, score));
        }
    }
    best.map(|(index, _)| Arc::clone(&words[index]))
}
