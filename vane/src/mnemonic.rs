//! BIP-39 mnemonic helpers.
//!
//! Phrase generation and seed derivation are delegated to the `bip39` crate;
//! this module adds the word-count policy and prefix expansion.
//!
//! # Prefix Expansion
//!
//! Every word in the BIP-39 English list is uniquely identified by its first
//! four letters, so abbreviated phrases can be expanded before parsing.
//!
//! ```
//! use vane::mnemonic;
//!
//! let expanded = mnemonic::expand("aban aban aban aban aban aban aban aban aban aban aban abou").unwrap();
//! assert_eq!(
//!     expanded,
//!     "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about"
//! );
//! ```

use bip39::{Language, Mnemonic};
use zeroize::Zeroizing;

use crate::error::{Error, Result};

/// Minimum prefix length required for unambiguous word expansion.
const MIN_PREFIX_LEN: usize = 4;

/// Word counts allowed by BIP-39.
pub const VALID_WORD_COUNTS: [usize; 5] = [12, 15, 18, 21, 24];

/// Generate a fresh English mnemonic from the OS random number generator.
///
/// # Errors
///
/// Returns [`Error::InvalidWordCount`] unless `word_count` is one of
/// [`VALID_WORD_COUNTS`].
pub fn generate(word_count: usize) -> Result<Mnemonic> {
    if !VALID_WORD_COUNTS.contains(&word_count) {
        return Err(Error::InvalidWordCount(word_count));
    }
    Ok(Mnemonic::generate_in(Language::English, word_count)?)
}

/// Validate `phrase` and derive its 64-byte seed with PBKDF2-HMAC-SHA512
/// (2048 rounds, salt `"mnemonic" || passphrase`).
///
/// # Errors
///
/// Returns [`Error::Mnemonic`] if the phrase has an unknown word, a bad
/// checksum or an unsupported length.
pub fn to_seed(phrase: &str, passphrase: &str) -> Result<Zeroizing<[u8; 64]>> {
    let mnemonic = Mnemonic::parse_in(Language::English, phrase)?;
    Ok(Zeroizing::new(mnemonic.to_seed(passphrase)))
}

/// Expand abbreviated words in a mnemonic phrase to their full BIP-39 form.
///
/// Each whitespace-separated token is kept if it is an exact word, expanded
/// if it is a prefix of at least 4 letters matching exactly one word, and
/// rejected otherwise. Checksum validation is left to the caller.
///
/// # Errors
///
/// Returns [`Error::UnknownPrefix`] if a token does not match any word.
/// Returns [`Error::AmbiguousPrefix`] if a token matches multiple words.
/// Returns [`Error::PrefixTooShort`] if a non-exact token has fewer than 4 characters.
pub fn expand(phrase: &str) -> Result<String> {
    let word_list = Language::English.word_list();

    let words = phrase
        .split_whitespace()
        .map(|token| resolve_token(word_list, &token.to_lowercase()))
        .collect::<Result<Vec<&str>>>()?;

    Ok(words.join(" "))
}

fn resolve_token(word_list: &'static [&'static str; 2048], token: &str) -> Result<&'static str> {
    if let Ok(pos) = word_list.binary_search(&token) {
        return Ok(word_list[pos]);
    }

    if token.len() < MIN_PREFIX_LEN {
        return Err(Error::PrefixTooShort {
            prefix: token.to_owned(),
            min_len: MIN_PREFIX_LEN,
        });
    }

    let matches: Vec<&'static str> = word_list
        .iter()
        .copied()
        .filter(|word| word.starts_with(token))
        .collect();

    match matches.as_slice() {
        [] => Err(Error::UnknownPrefix(token.to_owned())),
        [word] => Ok(*word),
        _ => Err(Error::AmbiguousPrefix {
            prefix: token.to_owned(),
            candidates: matches.iter().map(|w| (*w).to_owned()).collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_12: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_generate_reparses() {
        for count in VALID_WORD_COUNTS {
            let mnemonic = generate(count).unwrap();
            assert_eq!(mnemonic.word_count(), count);
            let reparsed: Mnemonic = mnemonic.to_string().parse().unwrap();
            assert_eq!(reparsed, mnemonic);
        }
    }

    #[test]
    fn test_generate_invalid_count() {
        assert!(matches!(generate(13), Err(Error::InvalidWordCount(13))));
    }

    #[test]
    fn test_to_seed_vector() {
        let seed = to_seed(FULL_12, "").unwrap();
        assert_eq!(
            hex::encode(*seed),
            "5eb00bbddcf069084889a8ab9155568165f5c453ccb85e70811aaed6f6da5fc19a5ac40b389cd370d086206dec8aa6c43daea6690f20ad3d8d48b2d2ce9e38e4"
        );
    }

    #[test]
    fn test_to_seed_passphrase_changes_seed() {
        let plain = to_seed(FULL_12, "").unwrap();
        let salted = to_seed(FULL_12, "TREZOR").unwrap();
        assert_ne!(*plain, *salted);
    }

    #[test]
    fn test_to_seed_bad_checksum() {
        let bad = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon";
        assert!(matches!(to_seed(bad, ""), Err(Error::Mnemonic(_))));
    }

    #[test]
    fn test_expand_full_words_unchanged() {
        assert_eq!(expand(FULL_12).unwrap(), FULL_12);
    }

    #[test]
    fn test_expand_prefixes() {
        let abbreviated = "aban aban aban aban aban aban aban aban aban aban aban abou";
        assert_eq!(expand(abbreviated).unwrap(), FULL_12);
    }

    #[test]
    fn test_expand_uppercase_and_spacing() {
        let input = "  ABAN aban  aban aban aban aban aban aban aban aban aban About ";
        assert_eq!(expand(input).unwrap(), FULL_12);
    }

    #[test]
    fn test_expand_too_short() {
        assert!(matches!(
            expand("aba"),
            Err(Error::PrefixTooShort { min_len: 4, .. })
        ));
    }

    #[test]
    fn test_expand_unknown() {
        assert!(matches!(expand("zzzz"), Err(Error::UnknownPrefix(_))));
    }
}
