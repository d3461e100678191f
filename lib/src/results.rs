use crate::config::MAX_WORD_LENGTH;
use std::fmt;
use std::io;
use thiserror::Error;

/// The result of a given letter at a specific location.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum LetterResult {
    /// Reported as `+`: the letter is in the word at this location.
    Correct,
    /// Reported as `*`: the letter is in the word, but not at this location.
    PresentNotHere,
    /// Reported as `-`: the letter is not in the word, or not any more times than it was
    /// otherwise reported.
    NotPresent,
    /// Any other symbol. No hint is derived from it.
    Unknown,
}

impl LetterResult {
    /// Maps a feedback symbol to its result. Unrecognized symbols become
    /// [`LetterResult::Unknown`].
    pub fn from_symbol(symbol: char) -> LetterResult {
        match symbol {
            '+' => LetterResult::Correct,
            '*' => LetterResult::PresentNotHere,
            '-' => LetterResult::NotPresent,
            _ => LetterResult::Unknown,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            LetterResult::Correct => '+',
            LetterResult::PresentNotHere => '*',
            LetterResult::NotPresent => '-',
            LetterResult::Unknown => '?',
        }
    }
}

impl fmt::Display for LetterResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Indicates that an error occurred while loading words, reading feedback, or guessing.
#[derive(Debug, Error)]
pub enum WordleError {
    /// The feedback did not have one symbol per letter of the guess.
    #[error("expected {expected} feedback symbols, got {actual}")]
    FeedbackLength { expected: usize, actual: usize },
    /// A guess and objective had different lengths. Holds the expected length.
    #[error("words must be {0} letters long")]
    WordLength(usize),
    /// Words of this length are longer than [`MAX_WORD_LENGTH`].
    #[error("words of {0} letters are longer than the supported {max}", max = MAX_WORD_LENGTH)]
    UnsupportedWordLength(usize),
    /// There were no candidate words left to guess from.
    #[error("no candidate words remain")]
    EmptyPool,
    /// The feedback source ran out of input.
    #[error("no more feedback is available")]
    FeedbackClosed,
    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),
}

/// The result of a single word guess.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct GuessResult<'a> {
    pub guess: &'a str,
    /// The result of each letter, provided in the same letter order as in the guess.
    pub results: Vec<LetterResult>,
}

impl<'a> GuessResult<'a> {
    /// Parses the feedback symbols reported for `guess`.
    ///
    /// The response must contain exactly one symbol per letter of the guess. Symbols other than
    /// `+`, `*` and `-` are accepted and recorded as [`LetterResult::Unknown`].
    ///
    /// ```
    /// use wordle_hint_solver::GuessResult;
    /// use wordle_hint_solver::LetterResult;
    ///
    /// let result = GuessResult::parse("crane", "+*---").unwrap();
    ///
    /// assert_eq!(result.results[0], LetterResult::Correct);
    /// assert_eq!(result.results[1], LetterResult::PresentNotHere);
    /// assert!(GuessResult::parse("crane", "+*--").is_err());
    /// ```
    pub fn parse(guess: &'a str, response: &str) -> Result<GuessResult<'a>, WordleError> {
        let expected = guess.chars().count();
        if expected > MAX_WORD_LENGTH {
            return Err(WordleError::UnsupportedWordLength(expected));
        }
        let actual = response.chars().count();
        if expected != actual {
            return Err(WordleError::FeedbackLength { expected, actual });
        }
        Ok(GuessResult {
            guess,
            results: response.chars().map(LetterResult::from_symbol).collect(),
        })
    }

    /// Returns `true` iff every letter was in the right place.
    pub fn is_solved(&self) -> bool {
        !self.results.is_empty()
            && self
                .results
                .iter()
                .all(|result| *result == LetterResult::Correct)
    }

    /// Renders the results back into feedback symbols.
    pub fn to_symbols(&self) -> String {
        self.results.iter().map(LetterResult::symbol).collect()
    }
}

/// Determines the result of the given `guess` when applied to the given `objective`.
///
/// Correct letters are matched first. The remaining letters of the guess are then marked as
/// present, left to right, only while unmatched copies of that letter remain in the objective.
pub fn get_result_for_guess<'a>(
    objective: &str,
    guess: &'a str,
) -> Result<GuessResult<'a>, WordleError> {
    let objective: Vec<char> = objective.chars().collect();
    let guess_letters: Vec<char> = guess.chars().collect();
    if objective.len() != guess_letters.len() {
        return Err(WordleError::WordLength(objective.len()));
    }

    let mut results = vec![LetterResult::NotPresent; guess_letters.len()];
    let mut unmatched: Vec<char> = Vec::with_capacity(objective.len());
    for (index, (objective_letter, guess_letter)) in
        objective.iter().zip(guess_letters.iter()).enumerate()
    {
        if objective_letter == guess_letter {
            results[index] = LetterResult::Correct;
        } else {
            unmatched.push(*objective_letter);
        }
    }
    for (index, letter) in guess_letters.iter().enumerate() {
        if results[index] == LetterResult::Correct {
            continue;
        }
        if let Some(position) = unmatched.iter().position(|other| other == letter) {
            unmatched.swap_remove(position);
            results[index] = LetterResult::PresentNotHere;
        }
    }
    Ok(GuessResult { guess, results })
}
