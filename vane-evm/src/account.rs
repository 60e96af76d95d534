//! Signing identity: a secp256k1 key plus its cached Ethereum address.
//!
//! Provides:
//! - Construction from raw bytes, hex or a derived BIP-32 key
//! - Prehash signing with RFC 6979 nonces and low-s normalization
//! - EIP-191 personal message signing
//! - Redacted `Debug`; the key only leaves through [`Account::expose_private_key_hex`]

use core::fmt;

use alloy_primitives::{Address, eip191_hash_message};
use k256::ecdsa::SigningKey;
use k256::ecdsa::signature::hazmat::PrehashVerifier;
use vane::ExtendedPrivateKey;
use zeroize::Zeroizing;

use crate::address;
use crate::error::{Error, Result};
use crate::signature::Signature;

/// An Ethereum account able to sign transactions and messages.
///
/// Immutable and free of chain state, so it can be shared across threads.
#[derive(Clone)]
pub struct Account {
    key: SigningKey,
    address: Address,
}

impl Account {
    /// Create an account from 32 private key bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKey`] unless the bytes are a non-zero scalar
    /// below the secp256k1 order.
    pub fn from_private_key(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 32 {
            return Err(Error::InvalidKey);
        }
        let key = SigningKey::from_slice(bytes).map_err(|_| Error::InvalidKey)?;
        let address = address::from_public_key(key.verifying_key());
        Ok(Self { key, address })
    }

    /// Create an account from a 64-digit hex key, with or without `0x`.
    pub fn from_hex(key: &str) -> Result<Self> {
        let digits = key.trim();
        let digits = digits.strip_prefix("0x").unwrap_or(digits);

        let mut bytes = Zeroizing::new([0u8; 32]);
        hex::decode_to_slice(digits, bytes.as_mut_slice()).map_err(|_| Error::InvalidKey)?;
        Self::from_private_key(bytes.as_slice())
    }

    /// Create an account from a derived extended key.
    pub fn from_extended_key(key: &ExtendedPrivateKey) -> Result<Self> {
        Self::from_private_key(key.expose_private_key().as_slice())
    }

    /// The account's address.
    #[inline]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// The address with its EIP-55 checksum.
    pub fn checksum_address(&self) -> String {
        address::to_checksum(&self.address)
    }

    /// The 33-byte compressed public key.
    pub fn public_key(&self) -> [u8; 33] {
        let point = self.key.verifying_key().to_encoded_point(true);
        let mut out = [0u8; 33];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// Sign a 32-byte prehash.
    pub fn sign_hash(&self, hash: &[u8; 32]) -> Result<Signature> {
        let (signature, recovery_id) = self
            .key
            .sign_prehash_recoverable(hash)
            .map_err(|e| Error::Signature(e.to_string()))?;
        Ok(Signature::from_parts(&signature, recovery_id))
    }

    /// Sign an arbitrary payload with the EIP-191 personal message prefix.
    pub fn sign_message(&self, message: &[u8]) -> Result<Signature> {
        self.sign_hash(&eip191_hash_message(message).0)
    }

    /// Verify `signature` over `hash` against this account's public key.
    pub fn verify(&self, hash: &[u8; 32], signature: &Signature) -> bool {
        signature
            .to_ecdsa()
            .is_ok_and(|(sig, _)| self.key.verifying_key().verify_prehash(hash, &sig).is_ok())
    }

    /// The private key as 64 lowercase hex digits.
    ///
    /// **Security Warning**: never log the returned value.
    pub fn expose_private_key_hex(&self) -> Zeroizing<String> {
        let bytes = Zeroizing::new(<[u8; 32]>::from(self.key.to_bytes()));
        Zeroizing::new(hex::encode(bytes.as_slice()))
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address)
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}
