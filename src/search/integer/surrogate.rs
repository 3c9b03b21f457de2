//! Linear surrogates of opening quality
//!
//! The integer program cannot score partitions directly, so it maximizes a
//! cheaper model over a shortlist of pool words. Every solution it returns is
//! re-scored exactly afterwards.

use super::program::{BinaryProgram, SolveError};
use crate::hints::HintTensor;
use crate::opening::{OpeningScore, Partition};
use crate::search::Surrogate;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::time::Instant;

/// Weight of every occurrence of a letter after its most informative position
const REPEAT_WEIGHT: f64 = 0.3;

/// Pair terms computed between two deadline checks
const PAIR_CHUNK: usize = 2048;

/// A surrogate program and the partition refinements spent on it
pub(crate) struct Built {
    /// `None` if the budget ran out before the program was complete
    pub program: Option<BinaryProgram>,
    pub evaluations: u64,
}

/// Limits on building a surrogate
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct BuildLimits {
    pub deadline: Option<Instant>,
    /// Refinements the build may spend
    pub max_evaluations: Option<u64>,
}

impl BuildLimits {
    fn expired(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

/// Program over `shortlist` selecting `k` words
pub(crate) fn build(
    surrogate: Surrogate,
    tensor: &HintTensor,
    shortlist: &[usize],
    singles: &[OpeningScore],
    k: usize,
    limits: BuildLimits,
) -> Result<Built, SolveError> {
    if limits.expired() {
        return Ok(Built {
            program: None,
            evaluations: 0,
        });
    }
    match surrogate {
        Surrogate::Pairwise => pairwise(tensor, shortlist, singles, k, limits),
        Surrogate::Letters => Ok(Built {
            program: Some(letters(tensor, shortlist, k)?),
            evaluations: 0,
        }),
    }
}

/// `H(i)` per word, `H(i, j) - H(i) - H(j)` (minus the mutual information) per pair
fn pairwise(
    tensor: &HintTensor,
    shortlist: &[usize],
    singles: &[OpeningScore],
    k: usize,
    limits: BuildLimits,
) -> Result<Built, SolveError> {
    let pairs: Vec<(usize, usize)> = (0..shortlist.len())
        .flat_map(|i| (i + 1..shortlist.len()).map(move |j| (i, j)))
        .collect();

    let cost = (shortlist.len() + pairs.len()) as u64;
    if limits.max_evaluations.is_some_and(|max| cost > max) {
        log::warn!("pairwise surrogate needs {cost} evaluations, more than the budget allows");
        return Ok(Built {
            program: None,
            evaluations: 0,
        });
    }

    let partitions: Vec<Partition> = shortlist
        .par_iter()
        .map(|&guess| Partition::trivial(tensor.words()).refine(tensor, guess))
        .collect();

    let mut terms: Vec<f64> = Vec::with_capacity(pairs.len());
    for chunk in pairs.chunks(PAIR_CHUNK) {
        if limits.expired() {
            log::warn!(
                "time limit reached after {} of {} pair terms",
                terms.len(),
                pairs.len()
            );
            return Ok(Built {
                program: None,
                evaluations: (shortlist.len() + terms.len()) as u64,
            });
        }
        terms.par_extend(chunk.par_iter().map(|&(i, j)| {
            let joint = partitions[i].refine(tensor, shortlist[j]).score().entropy;
            (joint - singles[i].entropy - singles[j].entropy).min(0.0)
        }));
    }

    let weights: Vec<f64> = singles.iter().map(|score| score.entropy).collect();
    let mut program = BinaryProgram::new(weights, k);
    for (&(i, j), &term) in pairs.iter().zip(&terms) {
        program.add_pair_term(i, j, term)?;
    }

    log::debug!(
        "pairwise surrogate over {} words, {} pair terms",
        shortlist.len(),
        program.pair_terms().len()
    );
    Ok(Built {
        program: Some(program),
        evaluations: cost,
    })
}

/// Positional letter entropy over the corpus
///
/// A letter at position `p` is worth `-f log2 f`, `f` being its frequency at
/// `p`. For each letter only its most informative position counts fully; the
/// others are discounted. No two chosen words may share a letter at the same
/// position.
fn letters(tensor: &HintTensor, shortlist: &[usize], k: usize) -> Result<BinaryProgram, SolveError> {
    let secrets = tensor.words();

    // Diagonal positional slices are the words themselves
    let mut counts: FxHashMap<(usize, u8), usize> = FxHashMap::default();
    for secret in 0..secrets {
        for (position, &code) in tensor.positional(secret, secret).iter().enumerate() {
            *counts.entry((position, code)).or_default() += 1;
        }
    }

    let entropy: FxHashMap<(usize, u8), f64> = counts
        .iter()
        .map(|(&key, &count)| {
            let freq = count as f64 / secrets as f64;
            (key, -freq * freq.log2())
        })
        .collect();

    // Rank each letter's positions by entropy
    let mut by_letter: FxHashMap<u8, Vec<(usize, f64)>> = FxHashMap::default();
    for (&(position, code), &value) in &entropy {
        by_letter.entry(code).or_default().push((position, value));
    }
    let mut letter_weight: FxHashMap<(usize, u8), f64> = FxHashMap::default();
    for (code, mut positions) in by_letter {
        positions.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        for (rank, (position, value)) in positions.into_iter().enumerate() {
            let factor = if rank == 0 { 1.0 } else { REPEAT_WEIGHT };
            letter_weight.insert((position, code), value * factor);
        }
    }

    let weights: Vec<f64> = shortlist
        .iter()
        .map(|&guess| {
            tensor
                .positional(guess, guess)
                .iter()
                .enumerate()
                .map(|(position, &code)| letter_weight.get(&(position, code)).copied().unwrap_or(0.0))
                .sum()
        })
        .collect();
    let mut program = BinaryProgram::new(weights, k);

    let mut groups: FxHashMap<(usize, u8), Vec<usize>> = FxHashMap::default();
    for (var, &guess) in shortlist.iter().enumerate() {
        for (position, &code) in tensor.positional(guess, guess).iter().enumerate() {
            groups.entry((position, code)).or_default().push(var);
        }
    }
    let mut groups: Vec<_> = groups.into_iter().collect();
    groups.sort_unstable_by_key(|(key, _)| *key);
    for (_, group) in groups {
        program.add_at_most_one(group)?;
    }

    log::debug!(
        "letter surrogate over {} words, {} letter/position groups",
        shortlist.len(),
        program.at_most_one().len()
    );
    Ok(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Alphabet, Corpus};
    use crate::hints::{ComputeHints, HintEngine};

    fn tensor(words: &[&str]) -> HintTensor {
        let corpus = Corpus::from_words(words, Alphabet::english(), 5).unwrap();
        HintEngine::default().compute(&corpus).unwrap()
    }

    fn singles(tensor: &HintTensor, shortlist: &[usize]) -> Vec<OpeningScore> {
        shortlist
            .iter()
            .map(|&g| Partition::trivial(tensor.words()).refine(tensor, g).score())
            .collect()
    }

    fn complete(built: Built) -> (BinaryProgram, u64) {
        (built.program.unwrap(), built.evaluations)
    }

    #[test]
    fn pairwise_terms_are_mutual_information() {
        let tensor = tensor(&["crane", "crate", "plumb", "slate", "irate", "fjord"]);
        let shortlist = [0, 1, 2];
        let singles = singles(&tensor, &shortlist);
        let (program, evaluations) = complete(
            build(Surrogate::Pairwise, &tensor, &shortlist, &singles, 2, BuildLimits::default())
                .unwrap(),
        );

        assert_eq!(evaluations, 6);
        assert_eq!(program.variables(), 3);
        assert!(program.pair_terms().iter().all(|&(_, _, v)| v <= 0.0));

        // The surrogate is exact for two words
        let joint = Partition::trivial(6).refine(&tensor, 0).refine(&tensor, 1).score().entropy;
        assert!((program.objective(&[0, 1]) - joint).abs() < 1e-9);
    }

    #[test]
    fn letters_surrogate_forbids_shared_positions() {
        let tensor = tensor(&["crane", "crate", "plumb", "slate", "irate", "fjord"]);
        let shortlist = [0, 1, 2, 3];
        let (program, evaluations) = complete(
            build(Surrogate::Letters, &tensor, &shortlist, &[], 2, BuildLimits::default()).unwrap(),
        );

        assert_eq!(evaluations, 0);
        // crane and crate share c, r, a at the same positions
        assert!(!program.is_feasible(&[0, 1]));
        assert!(program.is_feasible(&[0, 2]));
        assert!(program.weights().iter().all(|&w| w > 0.0));
    }

    #[test]
    fn repeated_letters_are_discounted() {
        // Every word ends in 'e', so that position carries no information
        let tensor = tensor(&["eerie", "abcde", "fghie", "jklme", "nopqe"]);
        let (program, _) = complete(
            build(Surrogate::Letters, &tensor, &[0], &[], 1, BuildLimits::default()).unwrap(),
        );

        let full = |freq: f64| -freq * freq.log2();
        // e at 0: 1/5, e at 1: 1/5, r: 1/5, i at 3: 2/5, e at 4: 5/5 (worth 0)
        // 'e' ranks position 0 first (ties broken by position), 1 and 4 are discounted
        let expected = full(0.2) + REPEAT_WEIGHT * full(0.2) + full(0.2) + full(0.4) + 0.0;
        assert!((program.weights()[0] - expected).abs() < 1e-12);
    }

    #[test]
    fn expired_deadline_builds_nothing() {
        let tensor = tensor(&["crane", "crate", "plumb", "slate", "irate", "fjord"]);
        let shortlist = [0, 1, 2, 3];
        let singles = singles(&tensor, &shortlist);
        let limits = BuildLimits {
            deadline: Some(Instant::now()),
            max_evaluations: None,
        };

        for surrogate in [Surrogate::Pairwise, Surrogate::Letters] {
            let built = build(surrogate, &tensor, &shortlist, &singles, 2, limits).unwrap();
            assert!(built.program.is_none());
            assert_eq!(built.evaluations, 0);
        }
    }

    #[test]
    fn pairwise_build_respects_evaluation_budget() {
        let tensor = tensor(&["crane", "crate", "plumb", "slate", "irate", "fjord"]);
        let shortlist = [0, 1, 2, 3];
        let singles = singles(&tensor, &shortlist);
        // 4 partitions and 6 pair terms
        let limits = |max| BuildLimits {
            deadline: None,
            max_evaluations: Some(max),
        };

        let built = build(Surrogate::Pairwise, &tensor, &shortlist, &singles, 2, limits(9)).unwrap();
        assert!(built.program.is_none());
        assert_eq!(built.evaluations, 0);

        let built = build(Surrogate::Pairwise, &tensor, &shortlist, &singles, 2, limits(10)).unwrap();
        assert!(built.program.is_some());
        assert_eq!(built.evaluations, 10);
    }
}
