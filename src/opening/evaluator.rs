//! Scoring a set of opening guesses against the whole corpus

use super::{HintKey, OpeningError, OpeningScore, Partition, PartitionMap};
use crate::hints::HintTensor;

/// Evaluates openings over a precomputed hint tensor
///
/// Guesses are unordered: `{a, b}` and `{b, a}` score identically because
/// the evaluator sorts them before building any hint key.
///
/// # Examples
/// ```
/// use wordle_openings::core::{Alphabet, Corpus};
/// use wordle_openings::hints::{ComputeHints, HintEngine};
/// use wordle_openings::opening::OpeningEvaluator;
///
/// let corpus = Corpus::from_words(["abcd", "abce", "wxyz"], Alphabet::english(), 4).unwrap();
/// let tensor = HintEngine::default().compute(&corpus).unwrap();
/// let evaluator = OpeningEvaluator::new(&tensor);
///
/// let score = evaluator.evaluate(&[0]).unwrap();
/// assert_eq!(score.groups, 3);
/// assert_eq!(score.worst_case, 1);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct OpeningEvaluator<'a> {
    tensor: &'a HintTensor,
}

impl<'a> OpeningEvaluator<'a> {
    #[must_use]
    pub const fn new(tensor: &'a HintTensor) -> Self {
        Self { tensor }
    }

    /// Underlying tensor
    #[must_use]
    pub const fn tensor(&self) -> &'a HintTensor {
        self.tensor
    }

    /// Number of secrets the evaluator scores against
    #[must_use]
    pub const fn secrets(&self) -> usize {
        self.tensor.words()
    }

    /// Check `guesses` and return them sorted
    ///
    /// # Errors
    /// Returns `OpeningError::GuessOutOfRange` for an index past the corpus and
    /// `OpeningError::DuplicateGuess` if an index appears twice.
    pub fn canonicalize(&self, guesses: &[usize]) -> Result<Vec<usize>, OpeningError> {
        let words = self.tensor.words();
        if let Some(&index) = guesses.iter().find(|&&index| index >= words) {
            return Err(OpeningError::GuessOutOfRange { index, words });
        }

        let mut sorted = guesses.to_vec();
        sorted.sort_unstable();
        if let Some(pair) = sorted.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(OpeningError::DuplicateGuess(pair[0]));
        }
        Ok(sorted)
    }

    /// Class labels of every secret under the opening
    ///
    /// # Errors
    /// See [`Self::canonicalize`].
    pub fn partition(&self, guesses: &[usize]) -> Result<Partition, OpeningError> {
        let guesses = self.canonicalize(guesses)?;
        Ok(self.refine_all(&guesses))
    }

    /// Score the opening
    ///
    /// The empty opening leaves every secret in one group (0 bits).
    ///
    /// # Errors
    /// See [`Self::canonicalize`].
    pub fn evaluate(&self, guesses: &[usize]) -> Result<OpeningScore, OpeningError> {
        Ok(self.partition(guesses)?.score())
    }

    /// Explicit hint-key grouping of the opening
    ///
    /// # Errors
    /// See [`Self::canonicalize`].
    pub fn partition_map(&self, guesses: &[usize]) -> Result<PartitionMap, OpeningError> {
        let guesses = self.canonicalize(guesses)?;
        Ok(PartitionMap::build(self.tensor, &guesses))
    }

    /// Composite hint one secret shows against the opening
    ///
    /// # Errors
    /// See [`Self::canonicalize`]; `secret` past the corpus is reported as
    /// `OpeningError::GuessOutOfRange`.
    pub fn hint_key(&self, guesses: &[usize], secret: usize) -> Result<HintKey, OpeningError> {
        let guesses = self.canonicalize(guesses)?;
        if secret >= self.tensor.words() {
            return Err(OpeningError::GuessOutOfRange {
                index: secret,
                words: self.tensor.words(),
            });
        }
        Ok(HintKey::build(self.tensor, &guesses, secret))
    }

    /// Refine the trivial partition by already validated guesses
    pub(crate) fn refine_all(&self, guesses: &[usize]) -> Partition {
        guesses
            .iter()
            .fold(Partition::trivial(self.tensor.words()), |partition, &guess| {
                partition.refine(self.tensor, guess)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Alphabet, Corpus};
    use crate::hints::{ComputeHints, HintEngine};

    const WORDS: &[&str] = &[
        "crane", "slate", "irate", "trace", "crate", "grate", "plumb", "fjord", "nymph", "gawky",
        "brisk", "shale", "stone", "arise", "blimp", "hound", "wreck", "zesty",
    ];

    fn corpus() -> Corpus {
        Corpus::from_words(WORDS, Alphabet::english(), 5).unwrap()
    }

    fn tensor(corpus: &Corpus) -> HintTensor {
        HintEngine::default().compute(corpus).unwrap()
    }

    #[test]
    fn group_sizes_cover_corpus() {
        let corpus = corpus();
        let tensor = tensor(&corpus);
        let evaluator = OpeningEvaluator::new(&tensor);
        for guesses in [&[0][..], &[0, 6], &[1, 7, 9], &[2, 10, 15, 17]] {
            let partition = evaluator.partition(guesses).unwrap();
            assert_eq!(partition.group_sizes().iter().sum::<usize>(), corpus.len());
        }
    }

    #[test]
    fn entropy_within_bounds() {
        let corpus = corpus();
        let tensor = tensor(&corpus);
        let evaluator = OpeningEvaluator::new(&tensor);
        let ceiling = OpeningScore::ceiling(corpus.len());
        for i in 0..corpus.len() {
            let score = evaluator.evaluate(&[i]).unwrap();
            assert!(score.entropy >= 0.0 && score.entropy <= ceiling);
            assert!(score.worst_case >= 1);
        }
    }

    #[test]
    fn guess_order_is_irrelevant() {
        let corpus = corpus();
        let tensor = tensor(&corpus);
        let evaluator = OpeningEvaluator::new(&tensor);
        let forward = evaluator.evaluate(&[3, 8, 14]).unwrap();
        let backward = evaluator.evaluate(&[14, 3, 8]).unwrap();
        assert_eq!(forward, backward);
        assert_eq!(
            evaluator.hint_key(&[3, 8], 5).unwrap(),
            evaluator.hint_key(&[8, 3], 5).unwrap()
        );
    }

    #[test]
    fn fast_path_agrees_with_hint_keys() {
        let corpus = corpus();
        let tensor = tensor(&corpus);
        let evaluator = OpeningEvaluator::new(&tensor);
        let guesses = [0, 7, 12];

        let fast = evaluator.evaluate(&guesses).unwrap();
        let explicit = evaluator.partition_map(&guesses).unwrap().score();
        assert_eq!(fast, explicit);

        // Same label exactly when same key
        let partition = evaluator.partition(&guesses).unwrap();
        for a in 0..corpus.len() {
            for b in 0..corpus.len() {
                let same_label = partition.labels()[a] == partition.labels()[b];
                let same_key =
                    evaluator.hint_key(&guesses, a).unwrap() == evaluator.hint_key(&guesses, b).unwrap();
                assert_eq!(same_label, same_key, "secrets {a} and {b}");
            }
        }
    }

    #[test]
    fn single_word_corpus_scores_zero() {
        let corpus = Corpus::from_words(["alone"], Alphabet::english(), 5).unwrap();
        let tensor = tensor(&corpus);
        let score = OpeningEvaluator::new(&tensor).evaluate(&[0]).unwrap();
        assert_eq!(score.entropy, 0.0);
        assert_eq!(score.worst_case, 1);
    }

    #[test]
    fn empty_opening_is_uninformed() {
        let corpus = corpus();
        let tensor = tensor(&corpus);
        let score = OpeningEvaluator::new(&tensor).evaluate(&[]).unwrap();
        assert_eq!(score, OpeningScore::uninformed(corpus.len()));
        assert_eq!(score.entropy, 0.0);
    }

    #[test]
    fn duplicate_guess_rejected() {
        let corpus = corpus();
        let tensor = tensor(&corpus);
        let evaluator = OpeningEvaluator::new(&tensor);
        assert!(matches!(
            evaluator.evaluate(&[3, 3]),
            Err(OpeningError::DuplicateGuess(3))
        ));
    }

    #[test]
    fn out_of_range_guess_rejected() {
        let corpus = corpus();
        let tensor = tensor(&corpus);
        let evaluator = OpeningEvaluator::new(&tensor);
        assert!(matches!(
            evaluator.evaluate(&[1, 99]),
            Err(OpeningError::GuessOutOfRange { index: 99, words: 18 })
        ));
        assert!(evaluator.hint_key(&[1], 18).is_err());
    }

    #[test]
    fn disjoint_word_scores_lower() {
        let corpus = Corpus::from_words(["ABCD", "ABCE", "WXYZ"], Alphabet::english(), 4).unwrap();
        let tensor = tensor(&corpus);
        let evaluator = OpeningEvaluator::new(&tensor);

        let abcd = evaluator.evaluate(&[0]).unwrap();
        let wxyz = evaluator.evaluate(&[2]).unwrap();

        // ABCD separates all three; WXYZ only isolates itself
        assert_eq!(abcd.worst_case, 1);
        assert_eq!(wxyz.worst_case, 2);
        assert!(wxyz.entropy < abcd.entropy);
    }

    #[test]
    fn more_guesses_never_lose_information() {
        let corpus = corpus();
        let tensor = tensor(&corpus);
        let evaluator = OpeningEvaluator::new(&tensor);
        let one = evaluator.evaluate(&[0]).unwrap();
        let two = evaluator.evaluate(&[0, 9]).unwrap();
        let three = evaluator.evaluate(&[0, 9, 16]).unwrap();
        assert!(two.entropy >= one.entropy);
        assert!(three.entropy >= two.entropy);
        assert!(three.worst_case <= two.worst_case);
    }
}
