//! Encoded word corpus
//!
//! A corpus is an ordered list of N words of a fixed length L, stored as one
//! dense row-major buffer of letter codes.

use super::Alphabet;
use rustc_hash::FxHashMap;
use std::fmt;
use std::io::BufRead;
use thiserror::Error;

/// Why a single word was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordIssue {
    /// Wrong number of letters after normalization
    Length { expected: usize, found: usize },
    /// Character outside the alphabet after normalization
    Letter(char),
}

impl fmt::Display for WordIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Length { expected, found } => {
                write!(f, "expected {expected} letters, found {found}")
            }
            Self::Letter(ch) => write!(f, "letter '{ch}' is not in the alphabet"),
        }
    }
}

/// Errors raised while building a corpus
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("invalid word \"{word}\" on line {line}: {issue}")]
    InvalidWord {
        line: usize,
        word: String,
        issue: WordIssue,
    },
    #[error("corpus is empty")]
    EmptyCorpus,
    #[error("word length must be at least 1")]
    InvalidLength,
    #[error("alphabet has {0} letters, at most 64 are supported")]
    AlphabetTooLarge(usize),
    #[error("word \"{0}\" is not in the corpus")]
    UnknownWord(String),
    #[error("failed to read word list: {0}")]
    Io(#[from] std::io::Error),
}

/// An immutable, index-addressable list of encoded words
///
/// # Examples
/// ```
/// use wordle_openings::core::{Alphabet, Corpus};
///
/// let corpus = Corpus::from_words(["abcd", "ABCE", "wxyz"], Alphabet::english(), 4).unwrap();
/// assert_eq!(corpus.len(), 3);
/// assert_eq!(corpus.decode(corpus.word(1)), "abce");
/// ```
#[derive(Debug, Clone)]
pub struct Corpus {
    alphabet: Alphabet,
    word_len: usize,
    codes: Vec<u8>,
    lookup: FxHashMap<Vec<u8>, usize>,
}

impl Corpus {
    /// Encode a sequence of words
    ///
    /// Blank entries are skipped; line numbers in errors are 1-based positions
    /// in the input sequence.
    ///
    /// # Errors
    /// Returns `CorpusError::InvalidWord` for a word of the wrong length or with
    /// letters outside the alphabet, and `CorpusError::EmptyCorpus` when no word
    /// remains.
    pub fn from_words<I, S>(words: I, alphabet: Alphabet, word_len: usize) -> Result<Self, CorpusError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if word_len == 0 {
            return Err(CorpusError::InvalidLength);
        }
        if alphabet.len() > super::alphabet::MAX_ALPHABET_SIZE {
            return Err(CorpusError::AlphabetTooLarge(alphabet.len()));
        }

        let mut codes = Vec::new();
        let mut lookup = FxHashMap::default();
        let mut count = 0;

        for (line, raw) in words.into_iter().enumerate() {
            let raw = raw.as_ref();
            if raw.trim().is_empty() {
                continue;
            }

            let encoded = encode_with(&alphabet, word_len, raw).map_err(|issue| {
                CorpusError::InvalidWord {
                    line: line + 1,
                    word: raw.trim().to_string(),
                    issue,
                }
            })?;

            codes.extend_from_slice(&encoded);
            lookup.entry(encoded).or_insert(count);
            count += 1;
        }

        if count == 0 {
            return Err(CorpusError::EmptyCorpus);
        }

        Ok(Self {
            alphabet,
            word_len,
            codes,
            lookup,
        })
    }

    /// Read one word per line from a reader
    ///
    /// # Errors
    /// Returns `CorpusError::Io` if reading fails, otherwise the same errors as
    /// [`Corpus::from_words`].
    pub fn load<R: BufRead>(reader: R, alphabet: Alphabet, word_len: usize) -> Result<Self, CorpusError> {
        let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;
        Self::from_words(lines, alphabet, word_len)
    }

    /// Number of words (N)
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len() / self.word_len
    }

    /// Always false: empty corpora are rejected at construction
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Letters per word (L)
    #[inline]
    #[must_use]
    pub const fn word_len(&self) -> usize {
        self.word_len
    }

    /// The alphabet words are encoded with
    #[inline]
    #[must_use]
    pub const fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Letter codes of word `index`
    ///
    /// # Panics
    /// Panics if `index >= len()`
    #[inline]
    #[must_use]
    pub fn word(&self, index: usize) -> &[u8] {
        let start = index * self.word_len;
        &self.codes[start..start + self.word_len]
    }

    /// All codes, row-major `N × L`
    #[inline]
    #[must_use]
    pub fn codes(&self) -> &[u8] {
        &self.codes
    }

    /// Iterate over encoded words in corpus order
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &[u8]> + '_ {
        self.codes.chunks_exact(self.word_len)
    }

    /// Encode a word with this corpus' alphabet and length
    ///
    /// # Errors
    /// Returns the [`WordIssue`] that makes the word invalid.
    pub fn encode(&self, word: &str) -> Result<Vec<u8>, WordIssue> {
        encode_with(&self.alphabet, self.word_len, word)
    }

    /// Decode letter codes back to a string
    ///
    /// Codes outside the alphabet decode to `'?'`.
    #[must_use]
    pub fn decode(&self, codes: &[u8]) -> String {
        codes
            .iter()
            .map(|&code| self.alphabet.letter(code).unwrap_or('?'))
            .collect()
    }

    /// Decoded text of word `index`
    #[must_use]
    pub fn text(&self, index: usize) -> String {
        self.decode(self.word(index))
    }

    /// Index of the first word with the given spelling
    #[must_use]
    pub fn index_of(&self, word: &str) -> Option<usize> {
        let encoded = self.encode(word).ok()?;
        self.lookup.get(&encoded).copied()
    }

    /// Resolve words to corpus indices
    ///
    /// # Errors
    /// Returns `CorpusError::UnknownWord` for the first word not in the corpus.
    pub fn indices_of<I, S>(&self, words: I) -> Result<Vec<usize>, CorpusError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        words
            .into_iter()
            .filter(|w| !w.as_ref().trim().is_empty())
            .map(|w| {
                let w = w.as_ref();
                self.index_of(w)
                    .ok_or_else(|| CorpusError::UnknownWord(w.trim().to_string()))
            })
            .collect()
    }

    /// Index of the first word with the same letters as word `index`
    ///
    /// Words with identical content are interchangeable for scoring.
    #[must_use]
    pub fn canonical_index(&self, index: usize) -> usize {
        self.lookup.get(self.word(index)).copied().unwrap_or(index)
    }

    /// Bit mask of the letters in word `index` (bit = letter code)
    #[inline]
    #[must_use]
    pub fn letter_mask(&self, index: usize) -> u64 {
        letter_mask(self.word(index))
    }

    /// True if no letter repeats in word `index`
    #[must_use]
    pub fn has_distinct_letters(&self, index: usize) -> bool {
        self.letter_mask(index).count_ones() as usize == self.word_len
    }

    /// A corpus made of the first `count` words
    ///
    /// # Errors
    /// Returns `CorpusError::EmptyCorpus` if `count` is zero.
    pub fn truncated(&self, count: usize) -> Result<Self, CorpusError> {
        let count = count.min(self.len());
        let words: Vec<String> = (0..count).map(|i| self.text(i)).collect();
        Self::from_words(words, self.alphabet.clone(), self.word_len)
    }
}

/// Bit mask of the letters in an encoded word
#[inline]
#[must_use]
pub fn letter_mask(word: &[u8]) -> u64 {
    word.iter().fold(0u64, |mask, &code| mask | (1u64 << code))
}

fn encode_with(alphabet: &Alphabet, word_len: usize, raw: &str) -> Result<Vec<u8>, WordIssue> {
    let normalized = alphabet.normalize(raw);
    let found = normalized.chars().count();
    if found != word_len {
        return Err(WordIssue::Length {
            expected: word_len,
            found,
        });
    }

    normalized
        .chars()
        .map(|ch| alphabet.code(ch).ok_or(WordIssue::Letter(ch)))
        .collect()
}
