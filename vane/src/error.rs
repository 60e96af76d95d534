//! Error types for core wallet operations.

use thiserror::Error;

/// Errors that can occur during mnemonic handling, key derivation and
/// amount conversion.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Invalid mnemonic phrase (unknown word, bad checksum or word count).
    #[error("mnemonic error: {0}")]
    Mnemonic(#[from] bip39::Error),

    /// Invalid word count for mnemonic generation.
    #[error("invalid word count {0}, must be 12, 15, 18, 21, or 24")]
    InvalidWordCount(usize),

    /// Mnemonic prefix is too short for unambiguous expansion.
    #[error("prefix \"{prefix}\" is too short (minimum {min_len} characters)")]
    PrefixTooShort {
        /// The prefix that was too short.
        prefix: String,
        /// Minimum required prefix length.
        min_len: usize,
    },

    /// Mnemonic prefix does not match any word in the wordlist.
    #[error("prefix \"{0}\" does not match any BIP-39 word")]
    UnknownPrefix(String),

    /// Mnemonic prefix matches multiple words in the wordlist.
    #[error("prefix \"{prefix}\" is ambiguous, matches: {}", candidates.join(", "))]
    AmbiguousPrefix {
        /// The ambiguous prefix.
        prefix: String,
        /// Words that match the prefix.
        candidates: Vec<String>,
    },

    /// Seed length outside the BIP-32 range.
    #[error("invalid seed length {0}, must be between 16 and 64 bytes")]
    InvalidSeedLength(usize),

    /// Master or child key material is not a usable secp256k1 scalar.
    #[error("key derivation failed: {0}")]
    KeyDerivation(&'static str),

    /// Derivation would exceed depth 255.
    #[error("maximum derivation depth exceeded")]
    MaxDepthExceeded,

    /// Malformed derivation path or child index.
    #[error("invalid derivation path: {0}")]
    InvalidPath(String),

    /// Malformed decimal amount.
    #[error("invalid amount \"{input}\": {reason}")]
    InvalidAmount {
        /// The rejected input.
        input: String,
        /// What was wrong with it.
        reason: &'static str,
    },
}

/// Result type alias for core operations.
pub type Result<T> = core::result::Result<T, Error>;
