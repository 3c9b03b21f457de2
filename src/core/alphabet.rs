//! Letter alphabets and normalization
//!
//! An alphabet maps letters to small integer codes (their position in the
//! alphabet) and folds accented characters onto their base letters.

use rustc_hash::FxHashMap;
use std::fmt;

/// Largest supported alphabet: a word's letter set must fit in a `u64` mask.
pub const MAX_ALPHABET_SIZE: usize = 64;

/// Accent folding table used by the French preset
const FRENCH_FOLDS: &[(char, &str)] = &[
    ('a', "àâáäãåą"),
    ('c', "çć"),
    ('e', "éèêëę"),
    ('i', "îïíì"),
    ('n', "ñń"),
    ('o', "ôöóòõ"),
    ('u', "ùûüú"),
    ('y', "ÿý"),
];

/// Built-in alphabet presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
pub enum Language {
    /// English: a-z
    #[default]
    #[value(name = "en")]
    English,
    /// French: a-z with accents folded onto base letters
    #[value(name = "fr")]
    French,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::English => write!(f, "en"),
            Self::French => write!(f, "fr"),
        }
    }
}

/// An ordered set of letters with an accent folding table
///
/// # Examples
/// ```
/// use wordle_openings::core::Alphabet;
///
/// let alphabet = Alphabet::french();
/// assert_eq!(alphabet.code('é'), Some(4));
/// assert_eq!(alphabet.letter(4), Some('e'));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    letters: Vec<char>,
    codes: FxHashMap<char, u8>,
    folds: FxHashMap<char, char>,
}

impl Alphabet {
    /// Build an alphabet from an ordered list of distinct lowercase letters
    ///
    /// Returns `None` if the list is empty, longer than [`MAX_ALPHABET_SIZE`]
    /// or contains a repeated letter.
    #[must_use]
    pub fn new(letters: &str) -> Option<Self> {
        let letters: Vec<char> = letters.chars().flat_map(char::to_lowercase).collect();
        if letters.is_empty() || letters.len() > MAX_ALPHABET_SIZE {
            return None;
        }

        let mut codes = FxHashMap::default();
        for (code, &letter) in letters.iter().enumerate() {
            if codes.insert(letter, code as u8).is_some() {
                return None;
            }
        }

        Some(Self {
            letters,
            codes,
            folds: FxHashMap::default(),
        })
    }

    /// The 26-letter Latin alphabet
    #[must_use]
    pub fn english() -> Self {
        Self::latin()
    }

    /// Latin alphabet with French accents folded onto base letters
    #[must_use]
    pub fn french() -> Self {
        let mut alphabet = Self::latin();
        for &(base, accents) in FRENCH_FOLDS {
            for accent in accents.chars() {
                alphabet.folds.insert(accent, base);
            }
        }
        alphabet
    }

    /// Alphabet preset for a language
    #[must_use]
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::English => Self::english(),
            Language::French => Self::french(),
        }
    }

    fn latin() -> Self {
        let letters: Vec<char> = ('a'..='z').collect();
        let codes = letters
            .iter()
            .enumerate()
            .map(|(code, &letter)| (letter, code as u8))
            .collect();
        Self {
            letters,
            codes,
            folds: FxHashMap::default(),
        }
    }

    /// Number of letters
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.letters.len()
    }

    /// Always false: alphabets are built non-empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    /// Letters in code order
    #[must_use]
    pub fn letters(&self) -> &[char] {
        &self.letters
    }

    /// Fold an already lowercased character onto its base letter
    #[inline]
    #[must_use]
    pub fn fold(&self, ch: char) -> char {
        self.folds.get(&ch).copied().unwrap_or(ch)
    }

    /// Code of a character after folding, if it belongs to the alphabet
    #[inline]
    #[must_use]
    pub fn code(&self, ch: char) -> Option<u8> {
        self.codes.get(&self.fold(ch)).copied()
    }

    /// Letter for a code
    #[inline]
    #[must_use]
    pub fn letter(&self, code: u8) -> Option<char> {
        self.letters.get(usize::from(code)).copied()
    }

    /// Lowercase and fold a raw word
    #[must_use]
    pub fn normalize(&self, raw: &str) -> String {
        raw.trim()
            .chars()
            .flat_map(char::to_lowercase)
            .map(|ch| self.fold(ch))
            .collect()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::english()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_codes_follow_letter_order() {
        let alphabet = Alphabet::english();
        assert_eq!(alphabet.len(), 26);
        assert_eq!(alphabet.code('a'), Some(0));
        assert_eq!(alphabet.code('z'), Some(25));
        assert_eq!(alphabet.letter(2), Some('c'));
        assert_eq!(alphabet.letter(26), None);
    }

    #[test]
    fn english_rejects_accents() {
        let alphabet = Alphabet::english();
        assert_eq!(alphabet.code('é'), None);
        assert_eq!(alphabet.code('1'), None);
    }

    #[test]
    fn french_folds_accents() {
        let alphabet = Alphabet::french();
        assert_eq!(alphabet.code('é'), alphabet.code('e'));
        assert_eq!(alphabet.code('ç'), alphabet.code('c'));
        assert_eq!(alphabet.normalize("  Élève "), "eleve");
    }

    #[test]
    fn custom_alphabet_rejects_repeats_and_oversize() {
        assert!(Alphabet::new("abca").is_none());
        assert!(Alphabet::new("").is_none());
        assert!(Alphabet::new(&"x".repeat(65)).is_none());

        let alphabet = Alphabet::new("ACGT").unwrap();
        assert_eq!(alphabet.code('g'), Some(2));
    }

    #[test]
    fn language_presets() {
        assert_eq!(Alphabet::for_language(Language::English), Alphabet::english());
        assert_eq!(Alphabet::for_language(Language::French), Alphabet::french());
        assert_eq!(Language::French.to_string(), "fr");
    }
}
