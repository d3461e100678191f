//! Helps solve Wordle-style puzzles by turning each round's feedback into letter constraints,
//! keeping only the candidate words that satisfy all of them, and suggesting the candidate whose
//! letters are most common at their locations.

mod config;
mod constraints;
mod data;
mod engine;
mod results;
pub mod scorers;

pub use config::*;
pub use constraints::*;
pub use data::LocatedLetter;
pub use data::WordBank;
pub use data::WordCounter;
pub use engine::*;
pub use results::*;
