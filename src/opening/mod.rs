//! Opening evaluation
//!
//! An opening is an unordered set of guess indices. Playing it against a
//! secret yields one composite hint; secrets sharing a composite hint are
//! indistinguishable after the opening. The quality of an opening is read off
//! the sizes of those groups.

mod compatibility;
mod evaluator;
mod partition;
mod score;

pub use compatibility::{CompatibilityReport, compatibility};
pub use evaluator::OpeningEvaluator;
pub use partition::{HintKey, Partition, PartitionMap};
pub use score::OpeningScore;

use thiserror::Error;

/// Errors raised while evaluating an opening
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OpeningError {
    #[error("guess index {0} appears more than once")]
    DuplicateGuess(usize),
    #[error("guess index {index} is out of range for {words} words")]
    GuessOutOfRange { index: usize, words: usize },
    #[error("corpus has {corpus} words but the hint tensor covers {tensor}")]
    CorpusMismatch { corpus: usize, tensor: usize },
}
