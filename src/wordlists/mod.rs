//! Word list files
//!
//! Plain-text lists, one word per line, read into a [`Corpus`] or resolved
//! against one as a candidate pool.
//!
//! [`Corpus`]: crate::core::Corpus

pub mod loader;

pub use loader::{load_corpus, load_pool, words_from_slice};
