//! Opening search command

use crate::core::Corpus;
use crate::hints::HintTensor;
use crate::search::{OpeningSearch, SearchConfig, SearchOutcome};
use anyhow::{Context, Result};

/// Result of an opening search, with words decoded
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub outcome: SearchOutcome,
    /// Words of each ranked candidate, in candidate order
    pub openings: Vec<Vec<String>>,
    pub config: SearchConfig,
    pub corpus_size: usize,
}

/// Search the best openings of `pool` (the whole corpus when `None`)
///
/// # Errors
///
/// Returns an error if the search request is invalid for this pool (empty,
/// too small for `k`, or out of range) or the solver fails.
pub fn run_search(
    corpus: &Corpus,
    tensor: &HintTensor,
    pool: Option<&[usize]>,
    config: SearchConfig,
) -> Result<SearchResult> {
    let everything: Vec<usize>;
    let pool = if let Some(pool) = pool {
        pool
    } else {
        everything = (0..corpus.len()).collect();
        &everything
    };

    let search = OpeningSearch::new(tensor, config);
    let outcome = search
        .run(pool)
        .with_context(|| format!("{}-word opening search failed", search.config().k))?;

    let openings = outcome
        .candidates
        .iter()
        .map(|candidate| candidate.guesses.iter().map(|&g| corpus.text(g)).collect())
        .collect();

    Ok(SearchResult {
        outcome,
        openings,
        config: search.config().clone(),
        corpus_size: corpus.len(),
    })
}
