//! Batched hint construction with ndarray
//!
//! Positional matches come from one broadcast comparison of the `(N, 1, L)`
//! and `(1, N, L)` views of the corpus. Common letters come from a `(N, A)`
//! letter presence matrix, intersected row against row.

use super::{ComputeHints, HintError, HintTensor, check_dimensions};
use crate::core::Corpus;
use ndarray::{Array2, Axis, Slice, Zip};

/// Corpus-wide broadcast strategy
#[derive(Debug, Clone, Copy, Default)]
pub struct VectorizedHints;

impl ComputeHints for VectorizedHints {
    fn compute(&self, corpus: &Corpus) -> Result<HintTensor, HintError> {
        check_dimensions(corpus)?;

        let words = corpus.len();
        let word_len = corpus.word_len();
        let mismatch = || HintError::DimensionMismatch {
            expected: words * word_len,
            found: corpus.codes().len(),
        };

        let letters = Array2::from_shape_vec((words, word_len), corpus.codes().to_vec())
            .map_err(|_| mismatch())?;

        let mut tensor = HintTensor::blank(words, word_len);

        // Positional half: (N, N, L) broadcast equality
        {
            let rows = letters.view().insert_axis(Axis(1));
            let cols = letters.view().insert_axis(Axis(0));
            let rows = rows.broadcast((words, words, word_len)).ok_or_else(mismatch)?;
            let cols = cols.broadcast((words, words, word_len)).ok_or_else(mismatch)?;

            let data = tensor.array_mut();
            let mut positional = data.slice_axis_mut(Axis(2), Slice::from(..word_len));
            Zip::from(&mut positional)
                .and(&rows)
                .and(&cols)
                .for_each(|cell, &x, &y| {
                    if x == y {
                        *cell = x;
                    }
                });
        }

        // Common-letter half: presence rows ANDed pairwise
        let mut presence = Array2::from_elem((words, corpus.alphabet().len()), false);
        Zip::from(presence.rows_mut())
            .and(letters.rows())
            .for_each(|mut present, word| {
                for &code in word {
                    present[usize::from(code)] = true;
                }
            });

        let data = tensor.array_mut();
        for i in 0..words {
            let row_i = presence.row(i);
            for j in i..words {
                let shared = row_i
                    .iter()
                    .zip(presence.row(j))
                    .enumerate()
                    .filter(|(_, (a, b))| **a && **b)
                    .map(|(code, _)| code as u8);

                for (slot, code) in shared.take(word_len).enumerate() {
                    data[[i, j, word_len + slot]] = code;
                    data[[j, i, word_len + slot]] = code;
                }
            }
        }

        Ok(tensor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Alphabet;
    use crate::hints::NO_MATCH;

    #[test]
    fn positional_writes_stay_in_the_positional_half() {
        let corpus = Corpus::from_words(["ABCD", "ABCE", "WXYZ"], Alphabet::english(), 4).unwrap();
        let tensor = VectorizedHints.compute(&corpus).unwrap();
        let abcd = tensor.positional(0, 0).to_vec();

        assert_eq!(tensor.positional(0, 1), &[abcd[0], abcd[1], abcd[2], NO_MATCH]);
        assert_eq!(tensor.positional(0, 2), &[NO_MATCH; 4]);

        let mut shared = abcd[..3].to_vec();
        shared.sort_unstable();
        assert_eq!(&tensor.common(0, 1)[..3], shared.as_slice());
        assert_eq!(tensor.common(0, 1)[3], NO_MATCH);
        assert_eq!(tensor.common(0, 2), &[NO_MATCH; 4]);
    }
}
