//! Opening search
//!
//! Finds the k-word openings of a candidate pool that score best under the
//! chosen [`Objective`]. Two methods:
//! - [`SearchMethod::Exhaustive`]: branch-and-bound over every combination,
//!   optimal unless the budget runs out
//! - [`SearchMethod::IntegerProgram`]: surrogate integer program over a
//!   shortlist, exactly re-scored; always reported as best known

mod candidate;
mod config;
mod exhaustive;
pub mod integer;

pub use candidate::OpeningCandidate;
pub use config::{Budget, Objective, SearchConfig, SearchMethod, Surrogate, combinations};

use crate::core::letter_mask;
use crate::hints::HintTensor;
use crate::opening::{OpeningError, OpeningEvaluator, OpeningScore, Partition};
use candidate::TopCandidates;
use integer::{BranchAndBoundSolver, IntegerSolver, SolveError};
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::fmt;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors raised by an opening search
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("candidate pool is empty")]
    EmptyPool,
    #[error("an opening needs at least one word")]
    EmptyOpening,
    #[error("cannot choose {k} words from a pool of {pool} distinct words")]
    InfeasibleSearch { k: usize, pool: usize },
    #[error("pool index {index} is out of range for {words} words")]
    PoolIndexOutOfRange { index: usize, words: usize },
    #[error("integer program failed: {0}")]
    Solver(#[from] SolveError),
    #[error(transparent)]
    Opening(#[from] OpeningError),
}

/// Whether the returned ranking is certified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchStatus {
    /// The whole space was covered
    ProvenOptimal,
    /// Budget ran out or a heuristic method was used
    BestKnown,
}

impl fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ProvenOptimal => "proven optimal",
            Self::BestKnown => "best known, not proven optimal",
        })
    }
}

/// Result of an opening search
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Ranked best first
    pub candidates: Vec<OpeningCandidate>,
    pub status: SearchStatus,
    /// Partition refinements performed
    pub evaluations: u64,
    pub elapsed: Duration,
    /// Method actually used (`Auto` resolved)
    pub method: SearchMethod,
    /// Pool size after preparation
    pub pool: usize,
}

impl SearchOutcome {
    /// Best candidate, if any
    #[must_use]
    pub fn best(&self) -> Option<&OpeningCandidate> {
        self.candidates.first()
    }

    #[must_use]
    pub fn is_exhaustive(&self) -> bool {
        self.status == SearchStatus::ProvenOptimal
    }
}

/// Opening search over one hint tensor
///
/// # Examples
/// ```
/// use wordle_openings::core::{Alphabet, Corpus};
/// use wordle_openings::hints::{ComputeHints, HintEngine};
/// use wordle_openings::search::{OpeningSearch, SearchConfig};
///
/// let corpus = Corpus::from_words(["abcd", "abce", "wxyz"], Alphabet::english(), 4).unwrap();
/// let tensor = HintEngine::default().compute(&corpus).unwrap();
///
/// let outcome = OpeningSearch::new(&tensor, SearchConfig::with_k(1)).run(&[0, 2]).unwrap();
/// let best = outcome.best().unwrap();
/// assert_eq!(corpus.text(best.guesses[0]), "abcd");
/// assert!(outcome.is_exhaustive());
/// ```
#[derive(Debug, Clone)]
pub struct OpeningSearch<'a> {
    evaluator: OpeningEvaluator<'a>,
    config: SearchConfig,
}

impl<'a> OpeningSearch<'a> {
    #[must_use]
    pub fn new(tensor: &'a HintTensor, config: SearchConfig) -> Self {
        Self {
            evaluator: OpeningEvaluator::new(tensor),
            config,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Search the openings of `pool` with the built-in solver
    ///
    /// # Errors
    /// `SearchError::EmptyPool`, `SearchError::EmptyOpening`,
    /// `SearchError::InfeasibleSearch` and `SearchError::PoolIndexOutOfRange`
    /// for invalid requests; solver errors from the integer program.
    pub fn run(&self, pool: &[usize]) -> Result<SearchOutcome, SearchError> {
        self.run_with_solver(pool, &BranchAndBoundSolver)
    }

    /// Search with a caller-supplied integer solver
    ///
    /// # Errors
    /// See [`Self::run`].
    pub fn run_with_solver<S>(&self, pool: &[usize], solver: &S) -> Result<SearchOutcome, SearchError>
    where
        S: IntegerSolver + ?Sized,
    {
        let started = Instant::now();
        let ctx = SearchContext::prepare(self.evaluator, self.config.clone(), pool)?;
        let method = ctx.method();

        log::info!(
            "searching {k}-word openings over {pool} pool words ({space} combinations) with {method}",
            k = ctx.k,
            pool = ctx.pool.len(),
            space = combinations(ctx.pool.len(), ctx.k),
        );

        let mut evaluations = ctx.pool.len() as u64 + ctx.k as u64;
        let seed = ctx.seed();

        let (top, status) = match method {
            SearchMethod::IntegerProgram => {
                let result = integer::search(&ctx, seed, solver)?;
                evaluations += result.evaluations;
                (result.top, SearchStatus::BestKnown)
            }
            SearchMethod::Exhaustive | SearchMethod::Auto => {
                let result = exhaustive::search(&ctx, seed);
                evaluations += result.evaluations;
                (result.top, result.status)
            }
        };

        Ok(SearchOutcome {
            candidates: top.into_vec(),
            status,
            evaluations,
            elapsed: started.elapsed(),
            method,
            pool: ctx.pool.len(),
        })
    }
}

/// Validated pool ordered best single word first, shared by both methods
pub(crate) struct SearchContext<'a> {
    pub evaluator: OpeningEvaluator<'a>,
    pub config: SearchConfig,
    pub k: usize,
    pub objective: Objective,
    /// Corpus indices, best single word first
    pub pool: Vec<usize>,
    /// Single-word scores aligned with `pool`
    pub singles: Vec<OpeningScore>,
    /// Running sums of single-word entropies along `pool`
    entropy_sums: Vec<f64>,
    /// Most groups any single pool word produces
    max_classes: usize,
}

impl<'a> SearchContext<'a> {
    pub(crate) fn prepare(
        evaluator: OpeningEvaluator<'a>,
        config: SearchConfig,
        pool: &[usize],
    ) -> Result<Self, SearchError> {
        if pool.is_empty() {
            return Err(SearchError::EmptyPool);
        }
        if config.k == 0 {
            return Err(SearchError::EmptyOpening);
        }

        let tensor = evaluator.tensor();
        let words = tensor.words();
        if let Some(&index) = pool.iter().find(|&&index| index >= words) {
            return Err(SearchError::PoolIndexOutOfRange { index, words });
        }

        // Lowest index wins among words with identical letters
        let mut sorted = pool.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        let mut seen = FxHashSet::default();
        let mut distinct: Vec<usize> = sorted
            .into_iter()
            .filter(|&index| seen.insert(tensor.positional(index, index)))
            .collect();

        if config.distinct_letters {
            let before = distinct.len();
            distinct.retain(|&index| {
                let word = tensor.positional(index, index);
                letter_mask(word).count_ones() as usize == word.len()
            });
            log::debug!(
                "distinct-letter filter kept {} of {before} pool words",
                distinct.len()
            );
            if distinct.is_empty() {
                return Err(SearchError::EmptyPool);
            }
        }

        if config.k > distinct.len() {
            return Err(SearchError::InfeasibleSearch {
                k: config.k,
                pool: distinct.len(),
            });
        }

        let objective = config.objective;
        let mut ranked: Vec<OpeningCandidate> = distinct
            .par_iter()
            .map(|&index| {
                let score = Partition::trivial(words).refine(tensor, index).score();
                OpeningCandidate::new(vec![index], score)
            })
            .collect();
        ranked.sort_by(|a, b| a.rank(b, objective));

        let pool: Vec<usize> = ranked.iter().map(|c| c.guesses[0]).collect();
        let singles: Vec<OpeningScore> = ranked.iter().map(|c| c.score).collect();

        let mut entropy_sums = Vec::with_capacity(singles.len() + 1);
        entropy_sums.push(0.0);
        for score in &singles {
            let last = entropy_sums.last().copied().unwrap_or(0.0);
            entropy_sums.push(last + score.entropy);
        }
        let max_classes = singles.iter().map(|s| s.groups).max().unwrap_or(1).max(1);

        Ok(Self {
            evaluator,
            k: config.k,
            objective,
            config,
            pool,
            singles,
            entropy_sums,
            max_classes,
        })
    }

    pub(crate) fn secrets(&self) -> usize {
        self.evaluator.secrets()
    }

    /// Method to run, with `Auto` resolved by the size of the space
    pub(crate) fn method(&self) -> SearchMethod {
        match self.config.method {
            SearchMethod::Auto => {
                if combinations(self.pool.len(), self.k) <= self.config.exhaustive_limit {
                    SearchMethod::Exhaustive
                } else {
                    SearchMethod::IntegerProgram
                }
            }
            method => method,
        }
    }

    /// Greedy opening of the `k` best single words
    pub(crate) fn seed(&self) -> TopCandidates {
        let mut top = TopCandidates::new(self.objective, self.config.top);
        let guesses = self.pool[..self.k].to_vec();
        let score = self.evaluator.refine_all(&guesses).score();
        top.offer(OpeningCandidate::new(guesses, score));
        top
    }

    /// Upper bound on the entropy of a prefix of entropy `prefix` completed
    /// by `remaining` pool words from position `start` onward
    pub(crate) fn entropy_bound(&self, prefix: f64, start: usize, remaining: usize) -> f64 {
        let end = (start + remaining).min(self.pool.len());
        let start = start.min(end);
        let bound = prefix + self.entropy_sums[end] - self.entropy_sums[start];
        bound.min(OpeningScore::ceiling(self.secrets()))
    }

    /// Lower bound on the worst case after `remaining` more guesses
    pub(crate) fn worst_case_bound(&self, worst: usize, remaining: usize) -> usize {
        u32::try_from(remaining)
            .ok()
            .and_then(|r| self.max_classes.checked_pow(r))
            .map_or(1, |split| worst.div_ceil(split).max(1))
    }
}
