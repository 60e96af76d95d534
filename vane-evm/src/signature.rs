//! Recoverable secp256k1 signatures.

use core::fmt;

use alloy_primitives::Address;
use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, VerifyingKey};

use crate::address;
use crate::error::{Error, Result};

/// A recoverable ECDSA signature with low-s normalization.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature {
    /// The r component.
    pub r: [u8; 32],
    /// The s component, always in the lower half of the curve order.
    pub s: [u8; 32],
    /// Recovery id (y parity), 0 or 1.
    pub v: u8,
}

impl Signature {
    pub(crate) fn from_parts(signature: &EcdsaSignature, recovery_id: RecoveryId) -> Self {
        let (r, s) = signature.split_bytes();
        Self {
            r: r.into(),
            s: s.into(),
            v: recovery_id.to_byte(),
        }
    }

    /// Whether the y coordinate of R is odd.
    #[inline]
    pub const fn y_parity(&self) -> bool {
        self.v == 1
    }

    /// The 65-byte `r || s || v` form with `v` in `{27, 28}`, as returned by
    /// `personal_sign`.
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[..32].copy_from_slice(&self.r);
        out[32..64].copy_from_slice(&self.s);
        out[64] = 27 + self.v;
        out
    }

    pub(crate) fn to_ecdsa(&self) -> Result<(EcdsaSignature, RecoveryId)> {
        let signature = EcdsaSignature::from_scalars(self.r, self.s)
            .map_err(|e| Error::Signature(e.to_string()))?;
        let recovery_id = RecoveryId::from_byte(self.v)
            .ok_or_else(|| Error::Signature(format!("invalid recovery id {}", self.v)))?;
        Ok((signature, recovery_id))
    }

    /// Recover the signer's address from the 32-byte prehash.
    pub fn recover_address(&self, hash: &[u8; 32]) -> Result<Address> {
        let (signature, recovery_id) = self.to_ecdsa()?;
        let key = VerifyingKey::recover_from_prehash(hash, &signature, recovery_id)
            .map_err(|e| Error::Signature(e.to_string()))?;
        Ok(address::from_public_key(&key))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.to_bytes()))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signature")
            .field("r", &hex::encode(self.r))
            .field("s", &hex::encode(self.s))
            .field("v", &self.v)
            .finish()
    }
}
