//! Compatibility metric
//!
//! A second view of opening quality: merge the hints a secret shows against
//! every guess into one constraint (known letters at known positions, plus
//! letters known to be present) and count how many corpus words satisfy it.
//! Fewer compatible words means more information gained.

use super::OpeningError;
use crate::core::{Corpus, letter_mask};
use crate::hints::{HintTensor, NO_MATCH};
use rayon::prelude::*;
use serde::Serialize;

/// Averages over all secrets of the compatibility metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CompatibilityReport {
    /// Mean of `-log2(compatible / N)`, in bits
    pub expected_information: f64,
    /// Mean number of corpus words compatible with the merged hints
    pub expected_compatible: f64,
}

/// Merged constraint a secret reveals
struct Constraint {
    positions: Vec<u8>,
    required: u64,
}

impl Constraint {
    fn gather(tensor: &HintTensor, guesses: &[usize], secret: usize) -> Self {
        let mut positions = vec![NO_MATCH; tensor.word_len()];
        let mut required = 0;
        for &guess in guesses {
            for (slot, &code) in positions.iter_mut().zip(tensor.positional(guess, secret)) {
                if code != NO_MATCH {
                    *slot = code;
                }
            }
            let shared: Vec<u8> = tensor
                .common(guess, secret)
                .iter()
                .copied()
                .take_while(|&code| code != NO_MATCH)
                .collect();
            required |= letter_mask(&shared);
        }
        Self { positions, required }
    }

    fn admits(&self, word: &[u8], mask: u64) -> bool {
        mask & self.required == self.required
            && self
                .positions
                .iter()
                .zip(word)
                .all(|(&want, &have)| want == NO_MATCH || want == have)
    }
}

/// Compute the compatibility report for an opening
///
/// Guesses are validated like [`super::OpeningEvaluator::canonicalize`].
///
/// # Errors
/// Returns `OpeningError::CorpusMismatch` when `corpus` and `tensor` disagree
/// on word count, plus the usual guess validation errors.
pub fn compatibility(
    corpus: &Corpus,
    tensor: &HintTensor,
    guesses: &[usize],
) -> Result<CompatibilityReport, OpeningError> {
    if corpus.len() != tensor.words() || corpus.word_len() != tensor.word_len() {
        return Err(OpeningError::CorpusMismatch {
            corpus: corpus.len(),
            tensor: tensor.words(),
        });
    }
    let guesses = super::OpeningEvaluator::new(tensor).canonicalize(guesses)?;

    let words = corpus.len();
    let masks: Vec<u64> = (0..words).map(|i| corpus.letter_mask(i)).collect();

    let counts: Vec<usize> = (0..words)
        .into_par_iter()
        .map(|secret| {
            let constraint = Constraint::gather(tensor, &guesses, secret);
            corpus
                .iter()
                .zip(&masks)
                .filter(|&(word, &mask)| constraint.admits(word, mask))
                .count()
        })
        .collect();

    let n = words as f64;
    let information: f64 = counts
        .iter()
        .map(|&count| -(count as f64 / n).log2())
        .sum();
    let compatible: f64 = counts.iter().map(|&count| count as f64).sum();

    // Clamp rounding noise, including -0.0
    let information = information / n;
    Ok(CompatibilityReport {
        expected_information: if information <= 0.0 { 0.0 } else { information },
        expected_compatible: compatible / n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Alphabet;
    use crate::hints::{ComputeHints, HintEngine};

    fn setup(words: &[&str]) -> (Corpus, HintTensor) {
        let corpus = Corpus::from_words(words, Alphabet::english(), 4).unwrap();
        let tensor = HintEngine::default().compute(&corpus).unwrap();
        (corpus, tensor)
    }

    #[test]
    fn perfect_separation() {
        let (corpus, tensor) = setup(&["abcd", "abce", "wxyz"]);
        let report = compatibility(&corpus, &tensor, &[0]).unwrap();

        // abcd: only itself; abce: a,b,c fixed so abcd and abce; wxyz: everything
        assert!((report.expected_compatible - 2.0).abs() < 1e-12);
        let expected = (3f64.log2() + (1.5f64).log2() + 0.0) / 3.0;
        assert!((report.expected_information - expected).abs() < 1e-12);
    }

    #[test]
    fn single_secret_gains_no_information() {
        let (corpus, tensor) = setup(&["abcd"]);
        let report = compatibility(&corpus, &tensor, &[0]).unwrap();
        assert!(report.expected_information.is_sign_positive());
        assert_eq!(report.expected_information, 0.0);
        assert!((report.expected_compatible - 1.0).abs() < 1e-12);
    }

    #[test]
    fn secret_is_always_compatible() {
        let (corpus, tensor) = setup(&["abcd", "bcda", "cdab", "dabc", "wxyz"]);
        let report = compatibility(&corpus, &tensor, &[0, 4]).unwrap();
        assert!(report.expected_compatible >= 1.0);
        assert!(report.expected_information <= crate::opening::OpeningScore::ceiling(5));
    }

    #[test]
    fn rejects_mismatched_corpus() {
        let (_, tensor) = setup(&["abcd", "abce", "wxyz"]);
        let (other, _) = setup(&["abcd", "abce"]);
        assert!(matches!(
            compatibility(&other, &tensor, &[0]),
            Err(OpeningError::CorpusMismatch { corpus: 2, tensor: 3 })
        ));
    }
}
