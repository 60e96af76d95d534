//! HD wallet: a validated mnemonic and the seed it produces.

use core::fmt;

use bip39::{Language, Mnemonic};
use zeroize::Zeroizing;

use crate::error::Result;
use crate::extended_key::ExtendedPrivateKey;
use crate::hdpath::DerivationPath;
use crate::mnemonic;

/// A BIP-39 wallet holding the phrase and its 64-byte seed.
///
/// The same phrase and passphrase always yield the same seed. An optional
/// passphrase (the "25th word") selects an entirely different key tree.
/// Both the phrase and the seed are zeroized on drop.
pub struct Wallet {
    mnemonic: Zeroizing<String>,
    seed: Zeroizing<[u8; 64]>,
    has_passphrase: bool,
}

impl Wallet {
    /// Generate a new wallet with a random English mnemonic.
    ///
    /// # Arguments
    ///
    /// * `word_count` - Number of words (12, 15, 18, 21, or 24)
    /// * `passphrase` - Optional BIP-39 passphrase
    ///
    /// # Errors
    ///
    /// Returns an error if the word count is invalid.
    pub fn generate(word_count: usize, passphrase: Option<&str>) -> Result<Self> {
        let mnemonic = mnemonic::generate(word_count)?;
        Ok(Self::from_parsed(&mnemonic, passphrase))
    }

    /// Create a wallet from an existing mnemonic phrase.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Mnemonic`](crate::Error::Mnemonic) if a word is not in
    /// the English list, the checksum is wrong or the word count is invalid.
    pub fn from_mnemonic(phrase: &str, passphrase: Option<&str>) -> Result<Self> {
        let mnemonic = Mnemonic::parse_in(Language::English, phrase)?;
        Ok(Self::from_parsed(&mnemonic, passphrase))
    }

    fn from_parsed(mnemonic: &Mnemonic, passphrase: Option<&str>) -> Self {
        let passphrase = passphrase.unwrap_or("");
        Self {
            mnemonic: Zeroizing::new(mnemonic.to_string()),
            seed: Zeroizing::new(mnemonic.to_seed(passphrase)),
            has_passphrase: !passphrase.is_empty(),
        }
    }

    /// Get the mnemonic phrase.
    ///
    /// **Security Warning**: the phrase reconstructs every derived key.
    #[inline]
    #[must_use]
    pub fn expose_mnemonic(&self) -> &str {
        &self.mnemonic
    }

    /// Seed bytes for BIP-32 master key generation.
    #[inline]
    #[must_use]
    pub fn seed(&self) -> &[u8; 64] {
        &self.seed
    }

    /// Check if a non-empty passphrase was used to derive the seed.
    #[must_use]
    pub const fn has_passphrase(&self) -> bool {
        self.has_passphrase
    }

    /// Get the word count of the mnemonic.
    #[inline]
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.mnemonic.split_whitespace().count()
    }

    /// BIP-32 master key for this wallet's seed.
    pub fn master_key(&self) -> Result<ExtendedPrivateKey> {
        ExtendedPrivateKey::from_seed(self.seed.as_slice())
    }

    /// Derive the extended key at `path` from the master key.
    pub fn derive(&self, path: &DerivationPath) -> Result<ExtendedPrivateKey> {
        self.master_key()?.derive_path(path)
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("word_count", &self.word_count())
            .field("has_passphrase", &self.has_passphrase)
            .finish_non_exhaustive()
    }
}
