//! Search configuration

use serde::Serialize;
use std::fmt;
use std::time::{Duration, Instant};

/// What "best opening" means
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Objective {
    /// Maximize expected information (entropy in bits)
    #[default]
    Entropy,
    /// Minimize the largest remaining group
    WorstCase,
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Entropy => "entropy",
            Self::WorstCase => "worst-case",
        })
    }
}

/// How the combination space is explored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SearchMethod {
    /// Exhaustive when the space is small enough, integer program otherwise
    #[default]
    Auto,
    /// Branch-and-bound over every combination
    Exhaustive,
    /// Surrogate integer program with exact re-scoring
    IntegerProgram,
}

impl fmt::Display for SearchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Exhaustive => "exhaustive",
            Self::IntegerProgram => "integer-program",
        })
    }
}

/// Linear model used by the integer program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Surrogate {
    /// Single-word entropy minus pairwise mutual information
    #[default]
    Pairwise,
    /// Positional letter entropy, repeated letters discounted
    Letters,
}

impl fmt::Display for Surrogate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pairwise => "pairwise",
            Self::Letters => "letters",
        })
    }
}

/// Limits on how much work a search may do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Budget {
    /// Maximum partition refinements once the pool is ranked; the integer
    /// program also caps its solver nodes, summed over all solves, by it
    pub max_evaluations: Option<u64>,
    /// Wall-clock limit
    pub time_limit: Option<Duration>,
}

impl Budget {
    /// No limits
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_evaluations: None,
            time_limit: None,
        }
    }

    /// True if neither limit is set
    #[must_use]
    pub const fn is_unlimited(&self) -> bool {
        self.max_evaluations.is_none() && self.time_limit.is_none()
    }

    /// Deadline for a search starting at `start`
    #[must_use]
    pub fn deadline(&self, start: Instant) -> Option<Instant> {
        self.time_limit.and_then(|limit| start.checked_add(limit))
    }
}

/// Opening search parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Number of words in the opening
    pub k: usize,
    /// Number of ranked candidates to return
    pub top: usize,
    pub objective: Objective,
    pub method: SearchMethod,
    pub budget: Budget,
    /// First-level branches explored per parallel batch
    pub batch_size: usize,
    /// `Auto` picks the exhaustive search up to this many combinations
    pub exhaustive_limit: u64,
    /// Pool words kept for the integer program
    pub shortlist: usize,
    pub surrogate: Surrogate,
    /// Keep only pool words without repeated letters
    pub distinct_letters: bool,
    /// Draw progress bars on stderr
    pub show_progress: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            k: 2,
            top: 10,
            objective: Objective::default(),
            method: SearchMethod::default(),
            budget: Budget::unlimited(),
            batch_size: 64,
            exhaustive_limit: 2_000_000,
            shortlist: 60,
            surrogate: Surrogate::default(),
            distinct_letters: false,
            show_progress: false,
        }
    }
}

impl SearchConfig {
    /// Default configuration for openings of `k` words
    #[must_use]
    pub fn with_k(k: usize) -> Self {
        Self {
            k,
            ..Self::default()
        }
    }
}

/// `C(n, k)`, saturating at `u64::MAX`
#[must_use]
pub fn combinations(n: usize, k: usize) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k) as u64;
    let n = n as u64;
    let mut total: u64 = 1;
    for i in 0..k {
        // total * (n - i) / (i + 1) stays integral at every step
        let Some(next) = total.checked_mul(n - i) else {
            return u64::MAX;
        };
        total = next / (i + 1);
    }
    total
}
