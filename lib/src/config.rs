#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The length of words in the standard game.
pub const DEFAULT_WORD_LENGTH: usize = 5;

/// The longest supported word. Letter positions are stored as `u8`.
pub const MAX_WORD_LENGTH: usize = u8::MAX as usize;

/// The number of guesses allowed in the standard game.
pub const DEFAULT_MAX_ROUNDS: u32 = 6;

/// Settings for a single [`Session`](crate::Session).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct SolverConfig {
    /// The length of every candidate word and of every feedback response.
    pub word_length: usize,
    /// The session ends after this many guesses.
    pub max_rounds: u32,
}

impl Default for SolverConfig {
    fn default() -> SolverConfig {
        SolverConfig {
            word_length: DEFAULT_WORD_LENGTH,
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }
}
