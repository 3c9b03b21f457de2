//! Word list loading utilities

use crate::core::{Alphabet, Corpus, CorpusError};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Load a corpus from a word list file
///
/// # Errors
///
/// Returns `CorpusError::Io` if the file cannot be opened or read, and the
/// validation errors of [`Corpus::from_words`] otherwise.
///
/// # Examples
/// ```no_run
/// use wordle_openings::core::Alphabet;
/// use wordle_openings::wordlists::load_corpus;
///
/// let corpus = load_corpus("data/words.txt", Alphabet::english(), 5).unwrap();
/// println!("Loaded {} words", corpus.len());
/// ```
pub fn load_corpus<P: AsRef<Path>>(
    path: P,
    alphabet: Alphabet,
    word_len: usize,
) -> Result<Corpus, CorpusError> {
    let path = path.as_ref();
    let corpus = Corpus::load(BufReader::new(File::open(path)?), alphabet, word_len)?;
    log::info!("loaded {} words from {}", corpus.len(), path.display());
    Ok(corpus)
}

/// Resolve a word list file against `corpus`
///
/// Every word of the list must be in the corpus.
///
/// # Errors
///
/// Returns `CorpusError::Io` on read failure and `CorpusError::UnknownWord`
/// for the first word missing from the corpus.
pub fn load_pool<P: AsRef<Path>>(path: P, corpus: &Corpus) -> Result<Vec<usize>, CorpusError> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    read_pool(reader, corpus)
}

fn read_pool<R: BufRead>(reader: R, corpus: &Corpus) -> Result<Vec<usize>, CorpusError> {
    let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;
    let pool = corpus.indices_of(&lines)?;
    if pool.is_empty() {
        return Err(CorpusError::EmptyCorpus);
    }
    Ok(pool)
}

/// Build a corpus from an in-memory slice
///
/// # Errors
///
/// Same as [`Corpus::from_words`].
///
/// # Examples
/// ```
/// use wordle_openings::core::Alphabet;
/// use wordle_openings::wordlists::words_from_slice;
///
/// let corpus = words_from_slice(&["crane", "slate"], Alphabet::english(), 5).unwrap();
/// assert_eq!(corpus.len(), 2);
/// ```
pub fn words_from_slice(slice: &[&str], alphabet: Alphabet, word_len: usize) -> Result<Corpus, CorpusError> {
    Corpus::from_words(slice, alphabet, word_len)
}
