//! Opening quality metrics

use serde::Serialize;
use std::cmp::Ordering;

/// Quality of an opening, derived from the sizes of the groups it splits the
/// corpus into
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OpeningScore {
    /// Shannon entropy of the group distribution, in bits
    pub entropy: f64,
    /// Size of the largest group
    pub worst_case: usize,
    /// Number of distinct groups
    pub groups: usize,
    /// Expected size of the group containing a uniformly drawn secret
    pub expected_remaining: f64,
}

impl OpeningScore {
    /// Score of the empty opening over `secrets` words: one group, zero bits
    #[must_use]
    pub fn uninformed(secrets: usize) -> Self {
        Self::from_group_sizes(vec![secrets])
    }

    /// Score a grouping from its group sizes
    ///
    /// Sizes are summed in ascending order so equal groupings always produce
    /// bit-identical scores. Zero-sized groups are ignored.
    ///
    /// # Examples
    /// ```
    /// use wordle_openings::opening::OpeningScore;
    ///
    /// let score = OpeningScore::from_group_sizes(vec![2, 1, 1]);
    /// assert!((score.entropy - 1.5).abs() < 1e-12);
    /// assert_eq!(score.worst_case, 2);
    /// assert_eq!(score.groups, 3);
    /// ```
    #[must_use]
    pub fn from_group_sizes(mut sizes: Vec<usize>) -> Self {
        sizes.retain(|&size| size > 0);
        sizes.sort_unstable();

        let secrets: usize = sizes.iter().sum();
        let groups = sizes.len();
        let worst_case = sizes.last().copied().unwrap_or(0);

        if secrets == 0 {
            return Self {
                entropy: 0.0,
                worst_case: 0,
                groups: 0,
                expected_remaining: 0.0,
            };
        }

        let n = secrets as f64;
        let ceiling = n.log2();
        let entropy = if groups == 1 {
            0.0
        } else if groups == secrets {
            ceiling
        } else {
            let bits: f64 = sizes
                .iter()
                .map(|&size| {
                    let p = size as f64 / n;
                    p * (n / size as f64).log2()
                })
                .sum();
            bits.clamp(0.0, ceiling)
        };

        let expected_remaining = sizes
            .iter()
            .map(|&size| (size * size) as f64)
            .sum::<f64>()
            / n;

        Self {
            entropy,
            worst_case,
            groups,
            expected_remaining,
        }
    }

    /// Maximum achievable entropy over `secrets` words
    #[must_use]
    pub fn ceiling(secrets: usize) -> f64 {
        if secrets == 0 {
            0.0
        } else {
            (secrets as f64).log2()
        }
    }

    /// Entropy first (higher is better), then worst case (lower is better)
    #[must_use]
    pub fn cmp_entropy(&self, other: &Self) -> Ordering {
        other
            .entropy
            .total_cmp(&self.entropy)
            .then(self.worst_case.cmp(&other.worst_case))
    }

    /// Worst case first (lower is better), then entropy (higher is better)
    #[must_use]
    pub fn cmp_worst_case(&self, other: &Self) -> Ordering {
        self.worst_case
            .cmp(&other.worst_case)
            .then(other.entropy.total_cmp(&self.entropy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_group_has_zero_entropy() {
        let score = OpeningScore::from_group_sizes(vec![7]);
        assert_eq!(score.entropy, 0.0);
        assert_eq!(score.worst_case, 7);
        assert_eq!(score.groups, 1);
        assert!((score.expected_remaining - 7.0).abs() < 1e-12);
    }

    #[test]
    fn singletons_reach_the_ceiling() {
        let score = OpeningScore::from_group_sizes(vec![1; 10]);
        assert_eq!(score.entropy, OpeningScore::ceiling(10));
        assert_eq!(score.worst_case, 1);
        assert!((score.expected_remaining - 1.0).abs() < 1e-12);
    }

    #[test]
    fn near_singletons_stay_below_ceiling() {
        let mut sizes = vec![1; 8];
        sizes.push(2);
        let score = OpeningScore::from_group_sizes(sizes);
        assert!(score.entropy < OpeningScore::ceiling(10));
        assert!(score.entropy > 0.0);
    }

    #[test]
    fn order_of_sizes_does_not_matter() {
        let a = OpeningScore::from_group_sizes(vec![5, 1, 3, 1, 2]);
        let b = OpeningScore::from_group_sizes(vec![1, 2, 1, 3, 5]);
        assert_eq!(a.entropy.to_bits(), b.entropy.to_bits());
        assert_eq!(a, b);
    }

    #[test]
    fn empty_and_zero_sizes() {
        let empty = OpeningScore::from_group_sizes(Vec::new());
        assert_eq!(empty.groups, 0);
        assert_eq!(empty.entropy, 0.0);

        let padded = OpeningScore::from_group_sizes(vec![0, 2, 0, 2]);
        assert_eq!(padded.groups, 2);
        assert!((padded.entropy - 1.0).abs() < 1e-12);
    }

    #[test]
    fn expected_remaining_weights_by_size() {
        // 3 secrets in one group, 1 alone: (9 + 1) / 4
        let score = OpeningScore::from_group_sizes(vec![3, 1]);
        assert!((score.expected_remaining - 2.5).abs() < 1e-12);
    }

    #[test]
    fn orderings() {
        let spread = OpeningScore::from_group_sizes(vec![2, 2, 2, 2]);
        let skewed = OpeningScore::from_group_sizes(vec![5, 1, 1, 1]);
        assert_eq!(spread.cmp_entropy(&skewed), Ordering::Less);
        assert_eq!(spread.cmp_worst_case(&skewed), Ordering::Less);
        assert_eq!(skewed.cmp_entropy(&spread), Ordering::Greater);
    }
}
