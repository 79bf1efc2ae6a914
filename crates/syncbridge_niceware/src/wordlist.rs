//! Fixed-size dictionaries backing the passphrase codec.

use crate::error::{NicewareError, NicewareResult};
use std::collections::HashMap;

/// Number of words a codec dictionary must contain.
pub const WORDLIST_SIZE: usize = 1 << 16;

/// An ordered dictionary of exactly [`WORDLIST_SIZE`] distinct words.
///
/// Each word's position equals the big-endian `u16` it encodes, so a
/// dictionary defines a bijection between byte pairs and words. Changing
/// the word order invalidates every passphrase issued with it, which is
/// why the list is treated as a versioned external asset rather than
/// something this crate generates.
#[derive(Debug, Clone)]
pub struct Wordlist {
    words: Vec<String>,
    positions: HashMap<String, u16>,
}

impl Wordlist {
    /// Builds a wordlist from an ordered sequence of words.
    ///
    /// Words are normalized to ASCII lowercase before indexing.
    ///
    /// # Errors
    ///
    /// Fails with [`NicewareError::InvalidDictionary`] if the sequence does
    /// not contain exactly [`WORDLIST_SIZE`] words, or if any word repeats
    /// after normalization.
    pub fn from_words<I, S>(words: I) -> NicewareResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words: Vec<String> = words
            .into_iter()
            .map(|word| {
                let mut word = word.into();
                word.make_ascii_lowercase();
                word
            })
            .collect();

        if words.len() != WORDLIST_SIZE {
            return Err(NicewareError::InvalidDictionary {
                reason: format!("expected {WORDLIST_SIZE} words, got {}", words.len()),
            });
        }

        let mut positions = HashMap::with_capacity(words.len());
        for (position, word) in words.iter().enumerate() {
            if positions.insert(word.clone(), position as u16).is_some() {
                return Err(NicewareError::InvalidDictionary {
                    reason: format!("duplicate word {word:?}"),
                });
            }
        }

        Ok(Self { words, positions })
    }

    /// Builds a wordlist from newline-separated text, one word per line.
    ///
    /// Surrounding whitespace is trimmed and blank lines are skipped, so a
    /// trailing newline in the asset file is harmless.
    pub fn from_lines(text: &str) -> NicewareResult<Self> {
        Self::from_words(text.lines().map(str::trim).filter(|line| !line.is_empty()))
    }

    /// Returns the word at a dictionary position.
    #[must_use]
    pub fn word_at(&self, position: u16) -> &str {
        &self.words[position as usize]
    }

    /// Looks up a word's dictionary position, case-insensitively.
    #[must_use]
    pub fn position_of(&self, word: &str) -> Option<u16> {
        if word.bytes().any(|b| b.is_ascii_uppercase()) {
            self.positions.get(&word.to_ascii_lowercase()).copied()
        } else {
            self.positions.get(word).copied()
        }
    }

    /// Returns true if the dictionary contains `word`.
    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.position_of(word).is_some()
    }
}
