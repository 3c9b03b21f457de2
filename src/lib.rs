//! Wordle Openings
//!
//! Finds the sets of k starting words whose combined hints split a word list
//! into the most informative groups, using a precomputed pairwise hint tensor.
//!
//! # Quick Start
//!
//! ```rust
//! use wordle_openings::core::{Alphabet, Corpus};
//! use wordle_openings::hints::{ComputeHints, HintEngine};
//! use wordle_openings::opening::OpeningEvaluator;
//! use wordle_openings::search::{OpeningSearch, SearchConfig};
//!
//! let corpus = Corpus::from_words(
//!     ["crane", "slate", "plumb", "fjord", "nymph", "gawky"],
//!     Alphabet::english(),
//!     5,
//! )
//! .unwrap();
//! let tensor = HintEngine::default().compute(&corpus).unwrap();
//!
//! // Score one opening
//! let score = OpeningEvaluator::new(&tensor).evaluate(&[0, 2]).unwrap();
//! println!("{:.3} bits, worst case {}", score.entropy, score.worst_case);
//!
//! // Search the best pair
//! let outcome = OpeningSearch::new(&tensor, SearchConfig::with_k(2))
//!     .run(&(0..corpus.len()).collect::<Vec<_>>())
//!     .unwrap();
//! assert!(outcome.best().unwrap().score.entropy >= score.entropy);
//! ```

// Core domain types
pub mod core;

// Pairwise hint tensor
pub mod hints;

// Opening scoring
pub mod opening;

// Opening search
pub mod search;

// Word list files
pub mod wordlists;

// Command implementations
pub mod commands;

// Terminal output formatting
pub mod output;

// Stderr logger
pub mod logging;
