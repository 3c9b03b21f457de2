//! Hint strategy selection
//!
//! Defines the `ComputeHints` trait and the configurable engine that
//! dispatches to a concrete strategy.

use super::{
    BitsetHints, HintError, HintTensor, NaiveHints, ParallelHints, SortedSetHints,
    VectorizedHints, check_dimensions,
};
use crate::core::Corpus;
use std::fmt;
use std::time::Instant;

/// Something that can build the hint tensor of a corpus
pub trait ComputeHints {
    /// Build the full `(N, N, 2L)` tensor
    ///
    /// # Errors
    /// Returns `HintError::DimensionMismatch` if the corpus rows are not uniform.
    fn compute(&self, corpus: &Corpus) -> Result<HintTensor, HintError>;
}

/// Available tensor construction strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
pub enum HintStrategy {
    /// Nested loops, reference implementation
    Naive,
    /// Broadcast comparison over the whole corpus
    Vectorized,
    /// Letter bit-sets, single thread
    Bitset,
    /// Sorted distinct-letter lists with merge intersection
    SortedSets,
    /// Bit-set kernel, row-parallel
    #[default]
    Parallel,
}

impl HintStrategy {
    /// Every strategy, reference first
    pub const ALL: [Self; 5] = [
        Self::Naive,
        Self::Vectorized,
        Self::Bitset,
        Self::SortedSets,
        Self::Parallel,
    ];

    /// Short display name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Naive => "naive",
            Self::Vectorized => "vectorized",
            Self::Bitset => "bitset",
            Self::SortedSets => "sorted-sets",
            Self::Parallel => "parallel",
        }
    }
}

impl fmt::Display for HintStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Configured hint builder
///
/// # Examples
/// ```
/// use wordle_openings::core::{Alphabet, Corpus};
/// use wordle_openings::hints::{ComputeHints, HintEngine, HintStrategy};
///
/// let corpus = Corpus::from_words(["crane", "slate"], Alphabet::english(), 5).unwrap();
/// let tensor = HintEngine::new(HintStrategy::Bitset).compute(&corpus).unwrap();
/// assert_eq!(tensor.words(), 2);
/// assert!(tensor.is_symmetric());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HintEngine {
    /// Strategy used to fill the tensor
    pub strategy: HintStrategy,
    /// Worker threads for the parallel strategy (`None` = rayon default)
    pub threads: Option<usize>,
}

impl HintEngine {
    /// Engine using `strategy` and the default thread count
    #[must_use]
    pub const fn new(strategy: HintStrategy) -> Self {
        Self {
            strategy,
            threads: None,
        }
    }

    /// Set the worker thread count for the parallel strategy
    #[must_use]
    pub const fn with_threads(mut self, threads: Option<usize>) -> Self {
        self.threads = threads;
        self
    }
}

impl ComputeHints for HintEngine {
    fn compute(&self, corpus: &Corpus) -> Result<HintTensor, HintError> {
        check_dimensions(corpus)?;

        log::debug!(
            "building {n}x{n}x{w} hint tensor with {} strategy",
            self.strategy,
            n = corpus.len(),
            w = 2 * corpus.word_len()
        );
        let start = Instant::now();

        let tensor = match self.strategy {
            HintStrategy::Naive => NaiveHints.compute(corpus),
            HintStrategy::Vectorized => VectorizedHints.compute(corpus),
            HintStrategy::Bitset => BitsetHints.compute(corpus),
            HintStrategy::SortedSets => SortedSetHints.compute(corpus),
            HintStrategy::Parallel => ParallelHints::new(self.threads).compute(corpus),
        }?;

        log::info!(
            "hint tensor for {} words built in {:.3}s ({})",
            corpus.len(),
            start.elapsed().as_secs_f64(),
            self.strategy
        );
        Ok(tensor)
    }
}
