//! JSON search report

use crate::commands::SearchResult;
use crate::opening::OpeningScore;
use crate::search::{Objective, SearchMethod, SearchStatus, Surrogate};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Serializable view of a [`SearchResult`]
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport<'a> {
    pub parameters: ReportParameters,
    pub status: SearchStatus,
    pub evaluations: u64,
    pub elapsed_seconds: f64,
    pub candidates: Vec<ReportCandidate<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportParameters {
    pub k: usize,
    pub top: usize,
    pub objective: Objective,
    pub method: SearchMethod,
    pub method_used: SearchMethod,
    pub surrogate: Surrogate,
    pub distinct_letters: bool,
    pub max_evaluations: Option<u64>,
    pub time_limit_seconds: Option<f64>,
    pub corpus_size: usize,
    pub pool_size: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportCandidate<'a> {
    pub rank: usize,
    pub indices: &'a [usize],
    pub words: &'a [String],
    #[serde(flatten)]
    pub score: OpeningScore,
}

impl<'a> SearchReport<'a> {
    #[must_use]
    pub fn new(result: &'a SearchResult) -> Self {
        let config = &result.config;
        let outcome = &result.outcome;

        let candidates = outcome
            .candidates
            .iter()
            .zip(&result.openings)
            .enumerate()
            .map(|(i, (candidate, words))| ReportCandidate {
                rank: i + 1,
                indices: &candidate.guesses,
                words,
                score: candidate.score,
            })
            .collect();

        Self {
            parameters: ReportParameters {
                k: config.k,
                top: config.top,
                objective: config.objective,
                method: config.method,
                method_used: outcome.method,
                surrogate: config.surrogate,
                distinct_letters: config.distinct_letters,
                max_evaluations: config.budget.max_evaluations,
                time_limit_seconds: config.budget.time_limit.map(|limit| limit.as_secs_f64()),
                corpus_size: result.corpus_size,
                pool_size: outcome.pool,
            },
            status: outcome.status,
            evaluations: outcome.evaluations,
            elapsed_seconds: outcome.elapsed.as_secs_f64(),
            candidates,
        }
    }
}

/// Write the report of `result` to `path` as pretty-printed JSON
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_report<P: AsRef<Path>>(result: &SearchResult, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &SearchReport::new(result))
        .with_context(|| format!("cannot write report to {}", path.display()))?;
    writer.flush()?;
    log::info!("search report written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::run_search;
    use crate::core::{Alphabet, Corpus};
    use crate::hints::{ComputeHints, HintEngine};
    use crate::search::SearchConfig;

    #[test]
    fn report_layout() {
        let corpus =
            Corpus::from_words(["crane", "slate", "plumb", "fjord", "nymph"], Alphabet::english(), 5)
                .unwrap();
        let tensor = HintEngine::default().compute(&corpus).unwrap();
        let config = SearchConfig {
            top: 3,
            ..SearchConfig::with_k(2)
        };
        let result = run_search(&corpus, &tensor, None, config).unwrap();

        let value = serde_json::to_value(SearchReport::new(&result)).unwrap();
        assert_eq!(value["parameters"]["k"], 2);
        assert_eq!(value["parameters"]["objective"], "entropy");
        assert_eq!(value["parameters"]["method"], "auto");
        assert_eq!(value["parameters"]["method_used"], "exhaustive");
        assert_eq!(value["parameters"]["corpus_size"], 5);
        assert_eq!(value["status"], "proven-optimal");

        let candidates = value["candidates"].as_array().unwrap();
        assert_eq!(candidates.len(), 3);
        let first = &candidates[0];
        assert_eq!(first["rank"], 1);
        assert_eq!(first["indices"].as_array().unwrap().len(), 2);
        assert_eq!(first["words"].as_array().unwrap().len(), 2);
        for field in ["entropy", "worst_case", "groups", "expected_remaining"] {
            assert!(first.get(field).is_some(), "missing {field}");
        }
    }

    #[test]
    fn writes_to_file() {
        let corpus = Corpus::from_words(["crane", "slate", "plumb"], Alphabet::english(), 5).unwrap();
        let tensor = HintEngine::default().compute(&corpus).unwrap();
        let result = run_search(&corpus, &tensor, None, SearchConfig::with_k(1)).unwrap();

        let path = std::env::temp_dir().join(format!("openings-report-{}.json", std::process::id()));
        write_report(&result, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["candidates"].as_array().unwrap().len(), 3);
    }
}
