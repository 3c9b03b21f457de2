//! Core domain types
//!
//! Alphabets, letter codes and the encoded word corpus every other component
//! borrows. Nothing here knows about hints or search.

pub mod alphabet;
mod corpus;

pub use alphabet::{Alphabet, Language};
pub use corpus::{Corpus, CorpusError, WordIssue, letter_mask};
