//! Ethereum account derivation from a BIP-39 wallet.

use tracing::debug;
use vane::{DerivationPath, ExtendedPrivateKey, Wallet};

use crate::account::Account;
use crate::error::Result;

/// SLIP-44 coin type of Ether.
pub const ETH_COIN_TYPE: u32 = 60;

/// Word count of freshly generated phrases.
pub const DEFAULT_WORD_COUNT: usize = 12;

/// Derives Ethereum accounts from a wallet seed.
///
/// # Example
///
/// ```
/// use vane::Wallet;
/// use vane_evm::Deriver;
///
/// let wallet = Wallet::generate(12, None).unwrap();
/// let derived = Deriver::new(&wallet).derive(0, false, 0).unwrap();
/// println!("Address: {}", derived.account.checksum_address());
/// ```
#[derive(Debug)]
pub struct Deriver<'a> {
    wallet: &'a Wallet,
}

/// A derived account with the key it came from.
#[derive(Debug, Clone)]
pub struct DerivedAccount {
    /// Path the key was derived at.
    pub path: DerivationPath,
    /// Leaf extended private key.
    pub extended_key: ExtendedPrivateKey,
    /// Signing identity for the leaf key.
    pub account: Account,
}

impl<'a> Deriver<'a> {
    /// Create a deriver for `wallet`.
    #[must_use]
    pub const fn new(wallet: &'a Wallet) -> Self {
        Self { wallet }
    }

    /// Derive at `m/44'/60'/account'/change/address_index`.
    pub fn derive(&self, account: u32, change: bool, address_index: u32) -> Result<DerivedAccount> {
        let path = DerivationPath::bip44(ETH_COIN_TYPE, account, u32::from(change), address_index)?;
        self.derive_at_path(&path)
    }

    /// Derive at an arbitrary path.
    pub fn derive_at_path(&self, path: &DerivationPath) -> Result<DerivedAccount> {
        let extended_key = self.wallet.derive(path)?;
        let account = Account::from_extended_key(&extended_key)?;
        debug!(path = %path, address = %account.address(), "derived account");
        Ok(DerivedAccount {
            path: path.clone(),
            extended_key,
            account,
        })
    }

    /// Derive `count` consecutive external addresses of `account`.
    pub fn derive_many(
        &self,
        account: u32,
        start_index: u32,
        count: u32,
    ) -> Result<Vec<DerivedAccount>> {
        (start_index..start_index.saturating_add(count))
            .map(|index| self.derive(account, false, index))
            .collect()
    }
}

/// A wallet together with its master key and one derived account.
#[derive(Debug)]
pub struct DerivedWallet {
    /// Phrase and seed.
    pub wallet: Wallet,
    /// Root of the key tree.
    pub master_key: ExtendedPrivateKey,
    /// Account at the requested path.
    pub derived: DerivedAccount,
}

impl DerivedWallet {
    /// The signing identity.
    #[inline]
    pub const fn account(&self) -> &Account {
        &self.derived.account
    }
}

/// Restore `phrase`, or generate a 12-word phrase when it is `None`, and
/// derive the account at `path`.
///
/// # Errors
///
/// Fails on an invalid phrase or a path segment that yields an invalid key.
/// No partial wallet is returned.
pub fn derive_wallet(
    phrase: Option<&str>,
    passphrase: Option<&str>,
    path: &DerivationPath,
) -> Result<DerivedWallet> {
    let wallet = match phrase {
        Some(phrase) => Wallet::from_mnemonic(phrase, passphrase)?,
        None => Wallet::generate(DEFAULT_WORD_COUNT, passphrase)?,
    };
    let master_key = wallet.master_key()?;
    let derived = Deriver::new(&wallet).derive_at_path(path)?;
    Ok(DerivedWallet {
        wallet,
        master_key,
        derived,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_derive_standard_path() {
        let wallet = Wallet::from_mnemonic(ABANDON, None).unwrap();
        let derived = Deriver::new(&wallet).derive(0, false, 0).unwrap();
        assert_eq!(derived.path.to_string(), "m/44'/60'/0'/0/0");
        assert_eq!(
            derived.account.address(),
            address!("9858EfFD232B4033E47d90003D41EC34EcaEda94")
        );
    }

    #[test]
    fn test_derive_many_distinct() {
        let wallet = Wallet::from_mnemonic(ABANDON, None).unwrap();
        let derived = Deriver::new(&wallet).derive_many(0, 0, 3).unwrap();
        assert_eq!(derived.len(), 3);
        assert_eq!(derived[2].path.to_string(), "m/44'/60'/0'/0/2");
        assert_ne!(derived[0].account.address(), derived[1].account.address());
        assert_ne!(derived[1].account.address(), derived[2].account.address());
    }

    #[test]
    fn test_derive_wallet_generates_when_absent() {
        let path: DerivationPath = "m/44'/60'/0'/0/0".parse().unwrap();
        let generated = derive_wallet(None, None, &path).unwrap();
        assert_eq!(generated.wallet.word_count(), 12);

        let restored =
            derive_wallet(Some(generated.wallet.expose_mnemonic()), None, &path).unwrap();
        assert_eq!(restored.account().address(), generated.account().address());
    }

    #[test]
    fn test_derive_wallet_passphrase_changes_account() {
        let path: DerivationPath = "m/44'/60'/0'/0/0".parse().unwrap();
        let plain = derive_wallet(Some(ABANDON), None, &path).unwrap();
        let protected = derive_wallet(Some(ABANDON), Some("TREZOR"), &path).unwrap();
        assert_ne!(plain.account().address(), protected.account().address());
    }

    #[test]
    fn test_derive_wallet_invalid_phrase() {
        let path = DerivationPath::master();
        assert!(derive_wallet(Some("abandon abandon"), None, &path).is_err());
    }
}
