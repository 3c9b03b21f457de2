//! Sorted distinct-letter strategy
//!
//! Each word's distinct letters are sorted once; pairs are intersected with a
//! linear merge, which already yields the letters in ascending order.

use super::tensor::fill_pair;
use super::{ComputeHints, HintError, HintTensor, check_dimensions};
use crate::core::Corpus;
use std::cmp::Ordering;

/// Merge-intersection strategy over precomputed sorted letter lists
#[derive(Debug, Clone, Copy, Default)]
pub struct SortedSetHints;

impl ComputeHints for SortedSetHints {
    fn compute(&self, corpus: &Corpus) -> Result<HintTensor, HintError> {
        check_dimensions(corpus)?;

        let sets: Vec<Vec<u8>> = corpus
            .iter()
            .map(|word| {
                let mut letters = word.to_vec();
                letters.sort_unstable();
                letters.dedup();
                letters
            })
            .collect();

        let words = corpus.len();
        let mut tensor = HintTensor::blank(words, corpus.word_len());
        let width = tensor.width();
        let cells = tensor.cells_mut();
        let mut shared = Vec::with_capacity(corpus.word_len());

        for i in 0..words {
            for j in i..words {
                intersect_sorted(&sets[i], &sets[j], &mut shared);
                let start = (i * words + j) * width;
                fill_pair(
                    &mut cells[start..start + width],
                    corpus.word(i),
                    corpus.word(j),
                    shared.iter().copied(),
                );
            }
        }

        tensor.mirror_upper();
        Ok(tensor)
    }
}

/// Intersect two ascending, duplicate-free slices into `out`
fn intersect_sorted(a: &[u8], b: &[u8], out: &mut Vec<u8>) {
    out.clear();
    let (mut x, mut y) = (0, 0);
    while x < a.len() && y < b.len() {
        match a[x].cmp(&b[y]) {
            Ordering::Less => x += 1,
            Ordering::Greater => y += 1,
            Ordering::Equal => {
                out.push(a[x]);
                x += 1;
                y += 1;
            }
        }
    }
}
