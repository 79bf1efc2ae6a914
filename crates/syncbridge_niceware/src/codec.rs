//! Byte sequence to passphrase conversion.

use crate::error::{NicewareError, NicewareResult};
use crate::wordlist::Wordlist;
use rand::rngs::OsRng;
use rand::RngCore;

/// Number of bytes each passphrase word encodes.
pub const BYTES_PER_WORD: usize = 2;

impl Wordlist {
    /// Encodes a byte sequence as a passphrase.
    ///
    /// Each pair of bytes selects one word by its big-endian `u16` value,
    /// so a 32-byte seed yields a 16-word passphrase.
    ///
    /// # Errors
    ///
    /// Fails with [`NicewareError::InvalidLength`] if `bytes` has an odd
    /// length.
    pub fn passphrase_from_bytes(&self, bytes: &[u8]) -> NicewareResult<Vec<String>> {
        if bytes.len() % BYTES_PER_WORD != 0 {
            return Err(NicewareError::InvalidLength { len: bytes.len() });
        }

        Ok(bytes
            .chunks_exact(BYTES_PER_WORD)
            .map(|pair| {
                self.word_at(u16::from_be_bytes([pair[0], pair[1]]))
                    .to_string()
            })
            .collect())
    }

    /// Decodes a passphrase back into the bytes it encodes.
    ///
    /// # Errors
    ///
    /// Fails with [`NicewareError::InvalidWord`] naming the first word that
    /// is not in the dictionary.
    pub fn bytes_from_passphrase<S: AsRef<str>>(&self, words: &[S]) -> NicewareResult<Vec<u8>> {
        let mut bytes = Vec::with_capacity(words.len() * BYTES_PER_WORD);
        for word in words {
            let word = word.as_ref();
            let position = self
                .position_of(word)
                .ok_or_else(|| NicewareError::InvalidWord {
                    word: word.to_string(),
                })?;
            bytes.extend_from_slice(&position.to_be_bytes());
        }
        Ok(bytes)
    }

    /// Generates a random passphrase of `word_count` words.
    pub fn generate_passphrase(&self, word_count: usize) -> NicewareResult<Vec<String>> {
        let bytes = generate_bytes(word_count * BYTES_PER_WORD)?;
        self.passphrase_from_bytes(&bytes)
    }
}

/// Generates `count` cryptographically random bytes of seed material.
///
/// # Errors
///
/// Fails with [`NicewareError::InvalidLength`] if `count` is odd, since the
/// result could never round-trip through a passphrase.
pub fn generate_bytes(count: usize) -> NicewareResult<Vec<u8>> {
    if count % BYTES_PER_WORD != 0 {
        return Err(NicewareError::InvalidLength { len: count });
    }
    let mut bytes = vec![0u8; count];
    OsRng.fill_bytes(&mut bytes);
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wordlist::WORDLIST_SIZE;
    use proptest::prelude::*;
    use std::sync::OnceLock;

    /// Seed bytes and the passphrase they map to under the production
    /// dictionary.
    const SEED_BYTES: [u8; 32] = [
        0x00, 0xee, 0x4a, 0x42, 0x3a, 0xa3, 0xa3, 0x0f, 0x59, 0x5f, 0xc2, 0x00, 0xfa, 0x6a, 0xd9,
        0xc9, 0x63, 0x38, 0xbb, 0x02, 0x0c, 0x37, 0x5b, 0x92, 0x98, 0xe7, 0x68, 0x79, 0x84, 0xba,
        0xe1, 0x9f,
    ];

    const SEED_WORDS: [(u16, &str); 16] = [
        (0x00ee, "administrational"),
        (0x4a42, "experimental"),
        (0x3aa3, "disconnection"),
        (0xa30f, "plane"),
        (0x595f, "gigaton"),
        (0xc200, "savaging"),
        (0xfa6a, "wheaten"),
        (0xd9c9, "suez"),
        (0x6338, "herman"),
        (0xbb02, "retina"),
        (0x0c37, "bailment"),
        (0x5b92, "gorier"),
        (0x98e7, "overmodestly"),
        (0x6879, "idealism"),
        (0x84ba, "mesa"),
        (0xe19f, "theurgy"),
    ];

    /// A full-size dictionary with the production words pinned at their
    /// real positions and synthetic filler everywhere else.
    fn sample_wordlist() -> &'static Wordlist {
        static WORDLIST: OnceLock<Wordlist> = OnceLock::new();
        WORDLIST.get_or_init(|| {
            let mut words: Vec<String> =
                (0..WORDLIST_SIZE).map(|i| format!("word{i:05x}")).collect();
            for (position, word) in SEED_WORDS {
                words[position as usize] = word.to_string();
            }
            Wordlist::from_words(words).unwrap()
        })
    }

    #[test]
    fn seed_vector_encodes() {
        let expected: Vec<&str> = SEED_WORDS.iter().map(|(_, word)| *word).collect();
        let words = sample_wordlist().passphrase_from_bytes(&SEED_BYTES).unwrap();
        assert_eq!(words, expected);
    }

    #[test]
    fn seed_vector_decodes() {
        let words: Vec<&str> = SEED_WORDS.iter().map(|(_, word)| *word).collect();
        let bytes = sample_wordlist().bytes_from_passphrase(&words).unwrap();
        assert_eq!(bytes, SEED_BYTES);
    }

    #[test]
    fn odd_length_is_rejected() {
        let result = sample_wordlist().passphrase_from_bytes(&[0x01, 0x02, 0x03]);
        assert!(matches!(
            result,
            Err(NicewareError::InvalidLength { len: 3 })
        ));
    }

    #[test]
    fn empty_input_yields_empty_passphrase() {
        let words = sample_wordlist().passphrase_from_bytes(&[]).unwrap();
        assert!(words.is_empty());
        let bytes = sample_wordlist().bytes_from_passphrase::<&str>(&[]).unwrap();
        assert!(bytes.is_empty());
    }

    #[test]
    fn unknown_word_names_the_offender() {
        let result = sample_wordlist().bytes_from_passphrase(&["mesa", "notaword"]);
        match result {
            Err(NicewareError::InvalidWord { word }) => assert_eq!(word, "notaword"),
            other => panic!("expected InvalidWord, got {other:?}"),
        }
    }

    #[test]
    fn decode_accepts_mixed_case() {
        let bytes = sample_wordlist()
            .bytes_from_passphrase(&["Mesa", "THEURGY"])
            .unwrap();
        assert_eq!(bytes, vec![0x84, 0xba, 0xe1, 0x9f]);
    }

    #[test]
    fn generate_bytes_rejects_odd_count() {
        assert!(matches!(
            generate_bytes(7),
            Err(NicewareError::InvalidLength { len: 7 })
        ));
    }

    #[test]
    fn generate_passphrase_round_trips() {
        let wordlist = sample_wordlist();
        let words = wordlist.generate_passphrase(8).unwrap();
        assert_eq!(words.len(), 8);
        let bytes = wordlist.bytes_from_passphrase(&words).unwrap();
        assert_eq!(wordlist.passphrase_from_bytes(&bytes).unwrap(), words);
    }

    proptest! {
        #[test]
        fn bytes_round_trip(pairs in proptest::collection::vec(any::<u8>(), 0..32)) {
            // Double the generated vector so the length is always even.
            let mut bytes = Vec::with_capacity(pairs.len() * 2);
            for pair in &pairs {
                bytes.push(*pair);
                bytes.push(pair.wrapping_mul(31));
            }
            let wordlist = sample_wordlist();
            let words = wordlist.passphrase_from_bytes(&bytes).unwrap();
            prop_assert_eq!(words.len(), bytes.len() / 2);
            let decoded = wordlist.bytes_from_passphrase(&words).unwrap();
            prop_assert_eq!(decoded, bytes);
        }

        #[test]
        fn passphrases_round_trip(positions in proptest::collection::vec(any::<u16>(), 0..24)) {
            let wordlist = sample_wordlist();
            let words: Vec<String> = positions
                .iter()
                .map(|p| wordlist.word_at(*p).to_string())
                .collect();
            let bytes = wordlist.bytes_from_passphrase(&words).unwrap();
            let encoded = wordlist.passphrase_from_bytes(&bytes).unwrap();
            prop_assert_eq!(encoded, words);
        }
    }
}
