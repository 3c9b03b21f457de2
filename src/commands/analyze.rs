//! Opening analysis command
//!
//! Scores one opening in detail: partition metrics, compatibility metrics and
//! the largest groups of secrets it leaves together.

use crate::core::Corpus;
use crate::hints::HintTensor;
use crate::opening::{CompatibilityReport, OpeningEvaluator, OpeningScore, compatibility};
use anyhow::{Context, Result};

/// Secrets listed per group
const GROUP_SAMPLE: usize = 8;

/// One group of secrets sharing a composite hint pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSummary {
    pub size: usize,
    /// First few secrets of the group, by corpus order
    pub sample: Vec<String>,
}

/// Result of analyzing an opening
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    /// Opening words, normalized
    pub words: Vec<String>,
    pub score: OpeningScore,
    pub compatibility: CompatibilityReport,
    /// Highest entropy reachable on this corpus
    pub ceiling: f64,
    pub corpus_size: usize,
    pub largest_groups: Vec<GroupSummary>,
}

/// Analyze the opening made of `words`
///
/// # Errors
///
/// Returns an error if:
/// - a word is not in the corpus
/// - a word appears twice
pub fn analyze_opening<S: AsRef<str>>(
    corpus: &Corpus,
    tensor: &HintTensor,
    words: &[S],
    groups_shown: usize,
) -> Result<AnalysisResult> {
    let guesses = corpus
        .indices_of(words)
        .context("opening words must come from the word list")?;

    let evaluator = OpeningEvaluator::new(tensor);
    let map = evaluator
        .partition_map(&guesses)
        .context("invalid opening")?;
    let score = map.score();
    let compatibility = compatibility(corpus, tensor, &guesses)?;

    let largest_groups = map
        .largest(groups_shown)
        .into_iter()
        .map(|(_, secrets)| GroupSummary {
            size: secrets.len(),
            sample: secrets
                .iter()
                .take(GROUP_SAMPLE)
                .map(|&secret| corpus.text(secret))
                .collect(),
        })
        .collect();

    Ok(AnalysisResult {
        words: guesses.iter().map(|&g| corpus.text(g)).collect(),
        score,
        compatibility,
        ceiling: OpeningScore::ceiling(corpus.len()),
        corpus_size: corpus.len(),
        largest_groups,
    })
}
