//! Integer-program opening search
//!
//! Selection of k words out of a shortlist is modeled as a [`BinaryProgram`]
//! whose objective is a linear surrogate of opening quality. Any
//! [`IntegerSolver`] can solve it; each solution is exactly re-scored, then
//! cut off so the next solve yields a different opening.

mod branch_bound;
mod program;
mod surrogate;

pub use branch_bound::BranchAndBoundSolver;
pub use program::{Assignment, BinaryProgram, IntegerSolver, SolveError, SolveLimits};

use super::candidate::TopCandidates;
use super::{OpeningCandidate, SearchContext, SearchError};
use std::time::Instant;
use surrogate::BuildLimits;

pub(crate) struct IntegerResult {
    pub top: TopCandidates,
    pub evaluations: u64,
}

/// Solve, re-score and cut until `top` openings are collected, the program
/// runs dry or the budget is spent
///
/// Refinements (surrogate build plus re-scoring) and solver nodes summed over
/// every solve are each capped by `max_evaluations`.
pub(crate) fn search<S>(
    ctx: &SearchContext<'_>,
    seed: TopCandidates,
    solver: &S,
) -> Result<IntegerResult, SearchError>
where
    S: IntegerSolver + ?Sized,
{
    let started = Instant::now();
    let deadline = ctx.config.budget.deadline(started);
    let max_evaluations = ctx.config.budget.max_evaluations;
    let k = ctx.k as u64;

    let size = ctx.config.shortlist.max(ctx.k).min(ctx.pool.len());
    let shortlist = &ctx.pool[..size];
    let singles = &ctx.singles[..size];

    let built = surrogate::build(
        ctx.config.surrogate,
        ctx.evaluator.tensor(),
        shortlist,
        singles,
        ctx.k,
        BuildLimits {
            deadline,
            max_evaluations,
        },
    )?;
    let mut evaluations = built.evaluations;
    let mut top = seed;

    let Some(mut program) = built.program else {
        log::warn!("budget exhausted while building the surrogate, keeping the greedy opening");
        return Ok(IntegerResult { top, evaluations });
    };
    log::info!(
        "{} surrogate built over {size} words in {:.3}s",
        ctx.config.surrogate,
        started.elapsed().as_secs_f64()
    );

    let mut nodes_left = max_evaluations;

    for round in 0..ctx.config.top.max(1) {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            log::warn!("time limit reached after {round} solves");
            break;
        }
        if max_evaluations.is_some_and(|max| evaluations + k > max) || nodes_left == Some(0) {
            log::warn!("evaluation budget exhausted after {round} solves");
            break;
        }

        let limits = SolveLimits {
            max_nodes: nodes_left,
            deadline,
        };
        let assignment = match solver.solve(&program, limits) {
            Ok(assignment) => assignment,
            Err(SolveError::Infeasible) => {
                log::debug!("surrogate exhausted after {round} solves");
                break;
            }
            Err(SolveError::NoSolution) => {
                log::warn!("solver limits reached after {round} solves");
                break;
            }
            Err(err) => return Err(err.into()),
        };
        if !program.is_feasible(&assignment.selected) {
            return Err(SolveError::InvalidAssignment {
                selected: assignment.selected,
            }
            .into());
        }
        if !assignment.proven_optimal {
            log::debug!("solve {round} stopped early, keeping best assignment found");
        }
        nodes_left = nodes_left.map(|left| left.saturating_sub(assignment.nodes));

        let guesses: Vec<usize> = assignment.selected.iter().map(|&var| shortlist[var]).collect();
        let score = ctx.evaluator.evaluate(&guesses)?;
        evaluations += k;
        top.offer(OpeningCandidate::new(guesses, score));

        program.exclude(assignment.selected)?;
    }

    Ok(IntegerResult { top, evaluations })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Alphabet, Corpus};
    use crate::hints::{ComputeHints, HintEngine, HintTensor};
    use crate::opening::OpeningEvaluator;
    use crate::search::{Budget, SearchConfig, SearchMethod, Surrogate};
    use std::time::Duration;

    const WORDS: &[&str] = &[
        "crane", "slate", "irate", "trace", "crate", "grate", "plumb", "fjord", "nymph", "gawky",
        "brisk", "shale", "stone", "arise", "blimp", "hound",
    ];

    fn tensor() -> HintTensor {
        let corpus = Corpus::from_words(WORDS, Alphabet::english(), 5).unwrap();
        HintEngine::default().compute(&corpus).unwrap()
    }

    fn config(surrogate: Surrogate) -> SearchConfig {
        SearchConfig {
            top: 4,
            method: SearchMethod::IntegerProgram,
            shortlist: 8,
            surrogate,
            ..SearchConfig::with_k(2)
        }
    }

    #[test]
    fn collects_distinct_exactly_scored_openings() {
        let tensor = tensor();
        let evaluator = OpeningEvaluator::new(&tensor);
        let pool: Vec<usize> = (0..tensor.words()).collect();

        for surrogate in [Surrogate::Pairwise, Surrogate::Letters] {
            let ctx = SearchContext::prepare(evaluator, config(surrogate), &pool).unwrap();
            let result = search(&ctx, ctx.seed(), &BranchAndBoundSolver).unwrap();
            let candidates = result.top.into_vec();

            assert!(!candidates.is_empty());
            assert!(candidates.len() <= 4);
            for candidate in &candidates {
                assert_eq!(candidate.guesses.len(), 2);
                assert_eq!(candidate.score, evaluator.evaluate(&candidate.guesses).unwrap());
            }
            let mut tuples: Vec<_> = candidates.iter().map(|c| c.guesses.clone()).collect();
            tuples.sort();
            tuples.dedup();
            assert_eq!(tuples.len(), candidates.len());
        }
    }

    /// Refuses everything, to exercise the fallback on the seed tuple
    struct RefusingSolver;

    impl IntegerSolver for RefusingSolver {
        fn solve(&self, _: &BinaryProgram, _: SolveLimits) -> Result<Assignment, SolveError> {
            Err(SolveError::Infeasible)
        }
    }

    #[test]
    fn seed_survives_an_infeasible_program() {
        let tensor = tensor();
        let evaluator = OpeningEvaluator::new(&tensor);
        let pool: Vec<usize> = (0..tensor.words()).collect();
        let ctx = SearchContext::prepare(evaluator, config(Surrogate::Pairwise), &pool).unwrap();

        let result = search(&ctx, ctx.seed(), &RefusingSolver).unwrap();
        let candidates = result.top.into_vec();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].guesses.len(), 2);
    }

    /// Returns a fixed selection whatever the program says
    struct FixedSolver(Vec<usize>);

    impl IntegerSolver for FixedSolver {
        fn solve(&self, _: &BinaryProgram, _: SolveLimits) -> Result<Assignment, SolveError> {
            Ok(Assignment {
                selected: self.0.clone(),
                objective: 0.0,
                proven_optimal: true,
                nodes: 1,
            })
        }
    }

    #[test]
    fn invalid_assignments_are_rejected() {
        let tensor = tensor();
        let evaluator = OpeningEvaluator::new(&tensor);
        let pool: Vec<usize> = (0..tensor.words()).collect();
        let ctx = SearchContext::prepare(evaluator, config(Surrogate::Pairwise), &pool).unwrap();

        // Too few words, then a variable past the shortlist
        for selected in [vec![0], vec![0, 999]] {
            let result = search(&ctx, ctx.seed(), &FixedSolver(selected.clone()));
            assert!(matches!(
                result,
                Err(SearchError::Solver(SolveError::InvalidAssignment { selected: s })) if s == selected
            ));
        }
    }

    #[test]
    fn repeated_assignment_is_rejected() {
        let tensor = tensor();
        let evaluator = OpeningEvaluator::new(&tensor);
        let pool: Vec<usize> = (0..tensor.words()).collect();
        let ctx = SearchContext::prepare(evaluator, config(Surrogate::Pairwise), &pool).unwrap();

        // The second round hands back a selection the first one cut off
        let result = search(&ctx, ctx.seed(), &FixedSolver(vec![0, 1]));
        assert!(matches!(
            result,
            Err(SearchError::Solver(SolveError::InvalidAssignment { .. }))
        ));
    }

    #[test]
    fn expired_time_limit_keeps_the_seed() {
        let tensor = tensor();
        let evaluator = OpeningEvaluator::new(&tensor);
        let pool: Vec<usize> = (0..tensor.words()).collect();
        let config = SearchConfig {
            budget: Budget {
                max_evaluations: None,
                time_limit: Some(Duration::ZERO),
            },
            ..config(Surrogate::Pairwise)
        };
        let ctx = SearchContext::prepare(evaluator, config, &pool).unwrap();

        let result = search(&ctx, ctx.seed(), &BranchAndBoundSolver).unwrap();
        assert_eq!(result.evaluations, 0);
        let candidates = result.top.into_vec();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].guesses.len(), 2);
    }

    #[test]
    fn evaluation_budget_covers_build_and_rescoring() {
        let tensor = tensor();
        let evaluator = OpeningEvaluator::new(&tensor);
        let pool: Vec<usize> = (0..tensor.words()).collect();

        // Shortlist of 8: 8 partitions and 28 pair terms, then 2 per re-score
        for budget in [5, 36, 40, 41] {
            let config = SearchConfig {
                budget: Budget {
                    max_evaluations: Some(budget),
                    time_limit: None,
                },
                ..config(Surrogate::Pairwise)
            };
            let ctx = SearchContext::prepare(evaluator, config, &pool).unwrap();
            let result = search(&ctx, ctx.seed(), &BranchAndBoundSolver).unwrap();
            assert!(
                result.evaluations <= budget,
                "{} evaluations for a budget of {budget}",
                result.evaluations
            );
            assert!(!result.top.into_vec().is_empty());
        }
    }
}

