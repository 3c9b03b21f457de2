//! Pairwise hint tensor construction
//!
//! One contract ("compute the hint tensor of a corpus") with several
//! interchangeable strategies that all produce the same tensor:
//! - [`NaiveHints`]: nested loops with ordered-set intersection
//! - [`VectorizedHints`]: corpus-wide broadcast comparison with `ndarray`
//! - [`BitsetHints`]: per-word `u64` letter masks
//! - [`SortedSetHints`]: per-word sorted distinct letters, merge intersection
//! - [`ParallelHints`]: bitset kernel with rows spread over a rayon pool

mod bitset;
mod engine;
mod naive;
mod sorted_sets;
mod tensor;
mod vectorized;

pub use bitset::{BitsetHints, ParallelHints};
pub use engine::{ComputeHints, HintEngine, HintStrategy};
pub use naive::NaiveHints;
pub use sorted_sets::SortedSetHints;
pub use tensor::{HintTensor, NO_MATCH};
pub use vectorized::VectorizedHints;

use crate::core::Corpus;
use thiserror::Error;

/// Errors raised while building a hint tensor
#[derive(Debug, Error)]
pub enum HintError {
    #[error("corpus holds {found} letter codes, expected {expected}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("failed to start hint worker threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Verify that the corpus buffer holds exactly `N × L` codes
pub(crate) fn check_dimensions(corpus: &Corpus) -> Result<(), HintError> {
    let expected = corpus.len() * corpus.word_len();
    let found = corpus.codes().len();
    if expected == found && corpus.iter().all(|word| word.len() == corpus.word_len()) {
        Ok(())
    } else {
        Err(HintError::DimensionMismatch { expected, found })
    }
}
