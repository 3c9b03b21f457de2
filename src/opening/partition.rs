//! Partitions of the corpus by composite hint pattern
//!
//! Two representations of the same grouping:
//! - [`Partition`]: one class label per secret, refined guess by guess. This is
//!   what scoring and search use.
//! - [`PartitionMap`]: explicit `HintKey -> secrets` map, used for reporting.

use super::OpeningScore;
use crate::hints::HintTensor;
use rustc_hash::FxHashMap;
use std::fmt;

/// Composite hint pattern of one secret against an ordered set of guesses:
/// the `2L`-cell hint slices of every guess, concatenated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HintKey(Vec<u8>);

impl HintKey {
    /// Concatenate the hint slices of `guesses` against `secret`
    pub(crate) fn build(tensor: &HintTensor, guesses: &[usize], secret: usize) -> Self {
        let mut cells = Vec::with_capacity(guesses.len() * tensor.width());
        for &guess in guesses {
            cells.extend_from_slice(tensor.pair(guess, secret));
        }
        Self(cells)
    }

    /// Raw cells
    #[must_use]
    pub fn cells(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for HintKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cell) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{cell:02x}")?;
        }
        Ok(())
    }
}

/// Class label per secret
///
/// Labels are numbered in order of first appearance, so two partitions that
/// group the secrets the same way are equal regardless of how they were built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    labels: Vec<u32>,
    classes: usize,
}

impl Partition {
    /// Every secret in a single class
    #[must_use]
    pub fn trivial(secrets: usize) -> Self {
        Self {
            labels: vec![0; secrets],
            classes: usize::from(secrets > 0),
        }
    }

    /// Split every class by the hint each secret shows against `guess`
    #[must_use]
    pub fn refine(&self, tensor: &HintTensor, guess: usize) -> Self {
        let mut interner: FxHashMap<(u32, &[u8]), u32> =
            FxHashMap::with_capacity_and_hasher(self.classes * 4, Default::default());

        let labels = self
            .labels
            .iter()
            .enumerate()
            .map(|(secret, &label)| {
                let next = interner.len() as u32;
                *interner
                    .entry((label, tensor.pair(guess, secret)))
                    .or_insert(next)
            })
            .collect();

        Self {
            labels,
            classes: interner.len(),
        }
    }

    /// Class label of each secret
    #[must_use]
    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    /// Number of non-empty classes
    #[must_use]
    pub const fn classes(&self) -> usize {
        self.classes
    }

    /// Number of secrets
    #[must_use]
    pub fn secrets(&self) -> usize {
        self.labels.len()
    }

    /// Size of each class, indexed by label
    #[must_use]
    pub fn group_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.classes];
        for &label in &self.labels {
            sizes[label as usize] += 1;
        }
        sizes
    }

    /// Score this grouping
    #[must_use]
    pub fn score(&self) -> OpeningScore {
        OpeningScore::from_group_sizes(self.group_sizes())
    }
}

/// Explicit mapping from composite hint to the secrets showing it
#[derive(Debug, Clone, Default)]
pub struct PartitionMap {
    groups: FxHashMap<HintKey, Vec<usize>>,
    secrets: usize,
}

impl PartitionMap {
    pub(crate) fn build(tensor: &HintTensor, guesses: &[usize]) -> Self {
        let mut groups: FxHashMap<HintKey, Vec<usize>> = FxHashMap::default();
        for secret in 0..tensor.words() {
            groups
                .entry(HintKey::build(tensor, guesses, secret))
                .or_default()
                .push(secret);
        }
        Self {
            groups,
            secrets: tensor.words(),
        }
    }

    /// Number of groups
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// True if there are no secrets at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of secrets across groups
    #[must_use]
    pub const fn secrets(&self) -> usize {
        self.secrets
    }

    /// Secrets sharing `key`
    #[must_use]
    pub fn group(&self, key: &HintKey) -> Option<&[usize]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    /// Group sizes in no particular order
    #[must_use]
    pub fn group_sizes(&self) -> Vec<usize> {
        self.groups.values().map(Vec::len).collect()
    }

    /// The `count` largest groups, largest first, ties by lowest secret index
    #[must_use]
    pub fn largest(&self, count: usize) -> Vec<(&HintKey, &[usize])> {
        let mut groups: Vec<_> = self
            .groups
            .iter()
            .map(|(key, secrets)| (key, secrets.as_slice()))
            .collect();
        groups.sort_by(|(_, a), (_, b)| b.len().cmp(&a.len()).then(a[0].cmp(&b[0])));
        groups.truncate(count);
        groups
    }

    /// Score this grouping
    #[must_use]
    pub fn score(&self) -> OpeningScore {
        OpeningScore::from_group_sizes(self.group_sizes())
    }
}
