//! Exhaustive branch-and-bound over k-combinations of the pool
//!
//! The pool is ordered best single word first. Combinations are enumerated
//! depth first in that order, refining the prefix partition one guess at a
//! time, and a prefix is abandoned once no completion can enter the current
//! top list:
//! - entropy: `H(prefix) + best r remaining single entropies` bounds every
//!   completion, since joint partition entropy is subadditive
//! - worst case: `ceil(worst(prefix) / max_classes^r)` bounds the largest
//!   group from below, since one guess splits a group into at most
//!   `max_classes` pieces
//!
//! First-level branches run in fixed-size batches on the rayon pool. Every
//! branch in a batch starts from the same snapshot of the top list and gets
//! an equal share of the remaining evaluation budget, so the result does not
//! depend on the number of threads or on scheduling. The shares never add up
//! to more than the budget.

use super::candidate::TopCandidates;
use super::{Objective, OpeningCandidate, SearchContext, SearchStatus};
use crate::opening::{OpeningScore, Partition};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::time::Instant;

/// Slack for floating-point entropy comparisons
const EPS: f64 = 1e-9;

pub(crate) struct ExhaustiveResult {
    pub top: TopCandidates,
    pub evaluations: u64,
    pub status: SearchStatus,
}

/// Search state of one first-level branch
struct Branch<'c, 'a> {
    ctx: &'c SearchContext<'a>,
    top: TopCandidates,
    evaluations: u64,
    cap: Option<u64>,
    deadline: Option<Instant>,
    truncated: bool,
    prefix: Vec<usize>,
}

impl<'c, 'a> Branch<'c, 'a> {
    fn new(ctx: &'c SearchContext<'a>, top: TopCandidates, cap: Option<u64>, deadline: Option<Instant>) -> Self {
        Self {
            ctx,
            top,
            evaluations: 0,
            cap,
            deadline,
            truncated: false,
            prefix: Vec::with_capacity(ctx.k),
        }
    }

    fn out_of_budget(&self) -> bool {
        self.cap.is_some_and(|cap| self.evaluations >= cap)
            || self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Explore every combination whose first pool position is `first`
    fn run(mut self, first: usize) -> Self {
        let partition = self.refine(&Partition::trivial(self.ctx.secrets()), first);
        self.prefix.push(first);
        self.extend(&partition, first + 1);
        self
    }

    fn refine(&mut self, partition: &Partition, position: usize) -> Partition {
        self.evaluations += 1;
        partition.refine(self.ctx.evaluator.tensor(), self.ctx.pool[position])
    }

    /// Complete the current prefix, whose partition is `partition`, with
    /// positions from `start` onward
    fn extend(&mut self, partition: &Partition, start: usize) {
        let remaining = self.ctx.k - self.prefix.len();
        if remaining == 0 {
            let guesses = self.prefix.iter().map(|&p| self.ctx.pool[p]).collect();
            self.top.offer(OpeningCandidate::new(guesses, partition.score()));
            return;
        }

        let score = partition.score();
        if !self.may_improve(&score, start, remaining) {
            return;
        }

        let last = self.ctx.pool.len() - remaining;
        for position in start..=last {
            if self.out_of_budget() {
                self.truncated = true;
                return;
            }
            // The entropy bound only shrinks as `position` grows
            if self.ctx.objective == Objective::Entropy
                && !self.entropy_may_improve(&score, position, remaining)
            {
                return;
            }

            let refined = self.refine(partition, position);
            self.prefix.push(position);
            self.extend(&refined, position + 1);
            self.prefix.pop();

            if self.truncated {
                return;
            }
        }
    }

    /// Whether some completion with `remaining` guesses from `start` onward
    /// could enter the top list
    fn may_improve(&self, score: &OpeningScore, start: usize, remaining: usize) -> bool {
        match self.ctx.objective {
            Objective::Entropy => self.entropy_may_improve(score, start, remaining),
            Objective::WorstCase => self.worst_case_may_improve(score, remaining),
        }
    }

    fn entropy_may_improve(&self, score: &OpeningScore, start: usize, remaining: usize) -> bool {
        self.top.threshold().is_none_or(|threshold| {
            self.ctx.entropy_bound(score.entropy, start, remaining) + EPS >= threshold.entropy
        })
    }

    fn worst_case_may_improve(&self, score: &OpeningScore, remaining: usize) -> bool {
        self.top.threshold().is_none_or(|threshold| {
            self.ctx.worst_case_bound(score.worst_case, remaining) <= threshold.worst_case
        })
    }
}

/// Run the exhaustive search over the prepared context
pub(crate) fn search(ctx: &SearchContext<'_>, seed: TopCandidates) -> ExhaustiveResult {
    let started = Instant::now();
    let deadline = ctx.config.budget.deadline(started);
    let max_evaluations = ctx.config.budget.max_evaluations;
    let branches = ctx.pool.len() + 1 - ctx.k;
    let batch_size = ctx.config.batch_size.max(1);

    let progress = progress_bar(branches as u64, ctx.config.show_progress);

    let mut top = seed;
    let mut evaluations = 0u64;
    let mut status = SearchStatus::ProvenOptimal;

    let mut first = 0;
    while first < branches {
        // Later branches have no better bound than this one
        if ctx.objective == Objective::Entropy
            && let Some(threshold) = top.threshold()
            && ctx.entropy_bound(0.0, first, ctx.k) + EPS < threshold.entropy
        {
            log::debug!("remaining {} branches pruned at the root", branches - first);
            break;
        }

        let remaining_budget = max_evaluations.map(|max| max.saturating_sub(evaluations));
        if remaining_budget == Some(0) || deadline.is_some_and(|d| Instant::now() >= d) {
            log::warn!("search budget exhausted after {evaluations} evaluations");
            status = SearchStatus::BestKnown;
            break;
        }

        // Every branch spends at least one refinement, so a batch never
        // outnumbers the remaining budget
        let width = remaining_budget.map_or(batch_size, |budget| {
            batch_size.min(usize::try_from(budget).unwrap_or(usize::MAX))
        });
        let batch: Vec<usize> = (first..branches.min(first + width)).collect();
        let cap = remaining_budget.map(|budget| budget / batch.len() as u64);
        let snapshot = &top;

        let results: Vec<Branch<'_, '_>> = batch
            .par_iter()
            .map(|&position| Branch::new(ctx, snapshot.clone(), cap, deadline).run(position))
            .collect();

        for branch in results {
            evaluations += branch.evaluations;
            if branch.truncated {
                status = SearchStatus::BestKnown;
            }
            top.merge(branch.top);
        }

        progress.inc(batch.len() as u64);
        first += batch.len();
    }

    progress.finish_and_clear();

    log::info!(
        "exhaustive search finished: {evaluations} evaluations in {:.3}s ({status})",
        started.elapsed().as_secs_f64()
    );

    ExhaustiveResult {
        top,
        evaluations,
        status,
    }
}

fn progress_bar(len: u64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} branches ({percent}%) | {elapsed_precise}",
    ) {
        bar.set_style(style.progress_chars("█▓▒░"));
    }
    bar
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Alphabet, Corpus};
    use crate::hints::{ComputeHints, HintEngine, HintTensor};
    use crate::opening::OpeningEvaluator;
    use crate::search::SearchConfig;

    const WORDS: &[&str] = &[
        "crane", "slate", "irate", "trace", "crate", "grate", "plumb", "fjord", "nymph", "gawky",
        "brisk", "shale", "stone", "arise", "blimp", "hound", "wreck", "zesty", "adieu", "pious",
    ];

    fn tensor() -> HintTensor {
        let corpus = Corpus::from_words(WORDS, Alphabet::english(), 5).unwrap();
        HintEngine::default().compute(&corpus).unwrap()
    }

    fn brute_force(tensor: &HintTensor, k: usize, objective: Objective, top: usize) -> Vec<OpeningCandidate> {
        let evaluator = OpeningEvaluator::new(tensor);
        let n = tensor.words();
        let mut all = Vec::new();
        let mut tuple: Vec<usize> = (0..k).collect();
        loop {
            all.push(OpeningCandidate::new(tuple.clone(), evaluator.evaluate(&tuple).unwrap()));
            // Next combination in lexicographic order
            let Some(i) = (0..k).rev().find(|&i| tuple[i] < n - k + i) else {
                break;
            };
            tuple[i] += 1;
            for j in i + 1..k {
                tuple[j] = tuple[j - 1] + 1;
            }
        }
        all.sort_by(|a, b| a.rank(b, objective));
        all.truncate(top);
        all
    }

    fn run(tensor: &HintTensor, config: SearchConfig) -> ExhaustiveResult {
        let pool: Vec<usize> = (0..tensor.words()).collect();
        let ctx = SearchContext::prepare(OpeningEvaluator::new(tensor), config, &pool).unwrap();
        let seed = ctx.seed();
        search(&ctx, seed)
    }

    #[test]
    fn pruned_search_matches_brute_force() {
        let tensor = tensor();
        for k in 1..=3 {
            let config = SearchConfig {
                top: 5,
                batch_size: 4,
                ..SearchConfig::with_k(k)
            };
            let result = run(&tensor, config);
            assert_eq!(result.status, SearchStatus::ProvenOptimal);
            assert_eq!(
                result.top.into_vec(),
                brute_force(&tensor, k, Objective::Entropy, 5),
                "k = {k}"
            );
        }
    }

    #[test]
    fn worst_case_objective_matches_brute_force() {
        let tensor = tensor();
        let config = SearchConfig {
            top: 4,
            objective: Objective::WorstCase,
            ..SearchConfig::with_k(2)
        };
        let result = run(&tensor, config);
        assert_eq!(result.status, SearchStatus::ProvenOptimal);
        assert_eq!(
            result.top.into_vec(),
            brute_force(&tensor, 2, Objective::WorstCase, 4)
        );
    }

    #[test]
    fn evaluation_budget_returns_best_known() {
        let tensor = tensor();
        let config = SearchConfig {
            budget: crate::search::Budget {
                max_evaluations: Some(10),
                time_limit: None,
            },
            batch_size: 2,
            ..SearchConfig::with_k(3)
        };
        let result = run(&tensor, config);
        assert_eq!(result.status, SearchStatus::BestKnown);
        assert!(result.evaluations <= 10);
        let candidates = result.top.into_vec();
        assert!(!candidates.is_empty());
        assert!(candidates.iter().all(|c| c.guesses.len() == 3));
    }

    #[test]
    fn evaluation_budget_is_a_hard_cap() {
        let tensor = tensor();
        for (budget, batch_size) in [(1, 64), (7, 64), (10, 3), (25, 64), (100, 4)] {
            let config = SearchConfig {
                budget: crate::search::Budget {
                    max_evaluations: Some(budget),
                    time_limit: None,
                },
                batch_size,
                ..SearchConfig::with_k(3)
            };
            let result = run(&tensor, config);
            assert!(
                result.evaluations <= budget,
                "{} evaluations for a budget of {budget} (batch {batch_size})",
                result.evaluations
            );
            assert!(!result.top.into_vec().is_empty());
        }
    }
}
