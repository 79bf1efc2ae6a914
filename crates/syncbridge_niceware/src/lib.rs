//! # Syncbridge Niceware
//!
//! Byte-to-passphrase word codec for syncbridge seeds.
//!
//! This crate provides:
//! - [`Wordlist`] - a fixed 65536-word dictionary with positional lookup
//! - Passphrase encoding/decoding (2 bytes per word, big-endian)
//! - Random seed material generation
//!
//! This is a pure codec crate with no I/O operations. The dictionary itself
//! is supplied by the embedding application, typically loaded once at
//! startup with [`Wordlist::from_lines`].
//!
//! ## Example
//!
//! ```ignore
//! use syncbridge_niceware::Wordlist;
//!
//! let wordlist = Wordlist::from_lines(include_str!("wordlist.txt"))?;
//! let words = wordlist.passphrase_from_bytes(&seed)?;
//! let restored = wordlist.bytes_from_passphrase(&words)?;
//! assert_eq!(restored, seed);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod codec;
mod error;
mod wordlist;

pub use codec::{generate_bytes, BYTES_PER_WORD};
pub use error::{NicewareError, NicewareResult};
pub use wordlist::{Wordlist, WORDLIST_SIZE};
