//! Reference hint construction
//!
//! Plain nested iteration over i <= j. Slow, but obviously correct; the other
//! strategies are checked against it.

use super::tensor::fill_pair;
use super::{ComputeHints, HintError, HintTensor, check_dimensions};
use crate::core::Corpus;
use std::collections::BTreeSet;

/// Nested-loop strategy with ordered-set intersection
#[derive(Debug, Clone, Copy, Default)]
pub struct NaiveHints;

impl ComputeHints for NaiveHints {
    fn compute(&self, corpus: &Corpus) -> Result<HintTensor, HintError> {
        check_dimensions(corpus)?;

        let words = corpus.len();
        let mut tensor = HintTensor::blank(words, corpus.word_len());
        let width = tensor.width();
        let cells = tensor.cells_mut();

        for i in 0..words {
            let word_i = corpus.word(i);
            let letters_i: BTreeSet<u8> = word_i.iter().copied().collect();

            for j in i..words {
                let word_j = corpus.word(j);
                let letters_j: BTreeSet<u8> = word_j.iter().copied().collect();

                let upper = (i * words + j) * width;
                fill_pair(
                    &mut cells[upper..upper + width],
                    word_i,
                    word_j,
                    letters_i.intersection(&letters_j).copied(),
                );

                let lower = (j * words + i) * width;
                if lower != upper {
                    cells.copy_within(upper..upper + width, lower);
                }
            }
        }

        Ok(tensor)
    }
}
