//! Dense pairwise hint tensor
//!
//! For every pair of words (i, j) the tensor holds `2L` cells:
//! - `[0, L)`: the shared letter code where both words agree at that position,
//!   [`NO_MATCH`] elsewhere
//! - `[L, 2L)`: the sorted distinct letters present in both words, padded with
//!   [`NO_MATCH`]
//!
//! Both halves only use symmetric relations, so `pair(i, j) == pair(j, i)`.

use super::HintError;
use ndarray::{Array3, ArrayView3, Axis};

/// Sentinel for "no letter" cells. Larger than every letter code, so a sorted
/// common-letter slice ends with its padding.
pub const NO_MATCH: u8 = u8::MAX;

/// Read-only `(N, N, 2L)` tensor of pairwise hints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintTensor {
    data: Array3<u8>,
    words: usize,
    word_len: usize,
}

impl HintTensor {
    /// Tensor for `words` words of length `word_len`, every cell [`NO_MATCH`]
    pub(crate) fn blank(words: usize, word_len: usize) -> Self {
        Self {
            data: Array3::from_elem((words, words, 2 * word_len), NO_MATCH),
            words,
            word_len,
        }
    }

    /// Wrap an externally built array
    ///
    /// # Errors
    /// Returns `HintError::DimensionMismatch` unless the shape is `(N, N, 2L)`.
    pub fn from_array(data: Array3<u8>, word_len: usize) -> Result<Self, HintError> {
        let (rows, cols, width) = data.dim();
        if rows != cols || width != 2 * word_len || word_len == 0 {
            return Err(HintError::DimensionMismatch {
                expected: 2 * word_len,
                found: width,
            });
        }
        let data = if data.is_standard_layout() {
            data
        } else {
            data.as_standard_layout().into_owned()
        };
        Ok(Self {
            data,
            words: rows,
            word_len,
        })
    }

    /// Number of words (N)
    #[inline]
    #[must_use]
    pub const fn words(&self) -> usize {
        self.words
    }

    /// Letters per word (L)
    #[inline]
    #[must_use]
    pub const fn word_len(&self) -> usize {
        self.word_len
    }

    /// Cells per pair (2L)
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        2 * self.word_len
    }

    /// The whole tensor as an ndarray view
    #[must_use]
    pub fn view(&self) -> ArrayView3<'_, u8> {
        self.data.view()
    }

    /// All `2L` cells of pair (i, j)
    ///
    /// # Panics
    /// Panics if `i` or `j` is out of range
    #[inline]
    #[must_use]
    pub fn pair(&self, i: usize, j: usize) -> &[u8] {
        let width = self.width();
        let start = (i * self.words + j) * width;
        &self.cells()[start..start + width]
    }

    /// Positional half of pair (i, j)
    #[inline]
    #[must_use]
    pub fn positional(&self, i: usize, j: usize) -> &[u8] {
        &self.pair(i, j)[..self.word_len]
    }

    /// Common-letter half of pair (i, j)
    #[inline]
    #[must_use]
    pub fn common(&self, i: usize, j: usize) -> &[u8] {
        &self.pair(i, j)[self.word_len..]
    }

    /// Row-major storage; construction keeps the array in standard layout
    fn cells(&self) -> &[u8] {
        self.data.as_slice().unwrap_or(&[])
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [u8] {
        self.data.as_slice_mut().unwrap_or(&mut [])
    }

    pub(crate) fn array_mut(&mut self) -> &mut Array3<u8> {
        &mut self.data
    }

    /// Copy every upper-triangle pair (i < j) into (j, i)
    pub(crate) fn mirror_upper(&mut self) {
        let words = self.words;
        let width = self.width();
        let cells = self.cells_mut();
        for i in 1..words {
            for j in 0..i {
                let src = (j * words + i) * width;
                let dst = (i * words + j) * width;
                cells.copy_within(src..src + width, dst);
            }
        }
    }

    /// True if every pair equals its transpose
    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        (0..self.words).all(|i| (i + 1..self.words).all(|j| self.pair(i, j) == self.pair(j, i)))
    }

    /// Row `i` as an `(N, 2L)` view
    #[must_use]
    pub fn row(&self, i: usize) -> ndarray::ArrayView2<'_, u8> {
        self.data.index_axis(Axis(0), i)
    }
}

/// Write the hint for `(a, b)` into a `2L` cell slice
///
/// `common` must yield the shared distinct letters in ascending order.
#[inline]
pub(crate) fn fill_pair(cell: &mut [u8], a: &[u8], b: &[u8], common: impl Iterator<Item = u8>) {
    let word_len = a.len();
    let (positional, letters) = cell.split_at_mut(word_len);
    for ((slot, &x), &y) in positional.iter_mut().zip(a).zip(b) {
        *slot = if x == y { x } else { NO_MATCH };
    }
    let mut filled = 0;
    for (slot, code) in letters.iter_mut().zip(common) {
        *slot = code;
        filled += 1;
    }
    letters[filled..].fill(NO_MATCH);
}
