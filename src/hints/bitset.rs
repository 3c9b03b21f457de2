//! Bit-set hint kernels
//!
//! Every word's letter set is a `u64` mask (bit = letter code). The common
//! letters of a pair are `mask_i & mask_j`, read back in ascending order by
//! scanning set bits.

use super::tensor::fill_pair;
use super::{ComputeHints, HintError, HintTensor, check_dimensions};
use crate::core::Corpus;
use rayon::prelude::*;

/// Single-threaded bit-set strategy
#[derive(Debug, Clone, Copy, Default)]
pub struct BitsetHints;

/// Row-parallel bit-set strategy
///
/// Each worker owns whole tensor rows and fills the upper-triangle pairs
/// (i, j >= i) of its rows; the lower triangle is mirrored once all workers
/// have joined.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelHints {
    threads: Option<usize>,
}

impl ParallelHints {
    /// Use a dedicated pool of `threads` workers (`None` = global rayon pool)
    #[must_use]
    pub const fn new(threads: Option<usize>) -> Self {
        Self { threads }
    }
}

impl ComputeHints for BitsetHints {
    fn compute(&self, corpus: &Corpus) -> Result<HintTensor, HintError> {
        check_dimensions(corpus)?;

        let masks = letter_masks(corpus);
        let mut tensor = HintTensor::blank(corpus.len(), corpus.word_len());
        let row_len = corpus.len() * tensor.width();

        for (i, row) in tensor.cells_mut().chunks_mut(row_len).enumerate() {
            fill_upper_row(row, i, corpus, &masks);
        }

        tensor.mirror_upper();
        Ok(tensor)
    }
}

impl ComputeHints for ParallelHints {
    fn compute(&self, corpus: &Corpus) -> Result<HintTensor, HintError> {
        check_dimensions(corpus)?;

        let masks = letter_masks(corpus);
        let mut tensor = HintTensor::blank(corpus.len(), corpus.word_len());
        let row_len = corpus.len() * tensor.width();

        let fill_rows = |cells: &mut [u8]| {
            cells
                .par_chunks_mut(row_len)
                .enumerate()
                .for_each(|(i, row)| fill_upper_row(row, i, corpus, &masks));
        };

        match self.threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()?;
                pool.install(|| fill_rows(tensor.cells_mut()));
            }
            None => fill_rows(tensor.cells_mut()),
        }

        // All workers have joined: the upper triangle is complete
        tensor.mirror_upper();
        Ok(tensor)
    }
}

fn letter_masks(corpus: &Corpus) -> Vec<u64> {
    (0..corpus.len()).map(|i| corpus.letter_mask(i)).collect()
}

/// Fill pairs (i, j) for j >= i into row `i`
fn fill_upper_row(row: &mut [u8], i: usize, corpus: &Corpus, masks: &[u64]) {
    let width = 2 * corpus.word_len();
    let word_i = corpus.word(i);

    for (j, cell) in row.chunks_mut(width).enumerate().skip(i) {
        fill_pair(cell, word_i, corpus.word(j), mask_letters(masks[i] & masks[j]));
    }
}

/// Letter codes of a mask, ascending
pub(crate) fn mask_letters(mask: u64) -> impl Iterator<Item = u8> {
    std::iter::successors(Some(mask), |&m| Some(m & m.wrapping_sub(1)))
        .take_while(|&m| m != 0)
        .map(|m| m.trailing_zeros() as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_letters_ascending() {
        let letters: Vec<u8> = mask_letters(0b1010_0101).collect();
        assert_eq!(letters, vec![0, 2, 5, 7]);
        assert_eq!(mask_letters(0).count(), 0);
        assert_eq!(mask_letters(1 << 63).collect::<Vec<_>>(), vec![63]);
    }
}
