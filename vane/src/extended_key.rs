//! BIP-32 hierarchical deterministic private key derivation over secp256k1.
//!
//! Invalid intermediate keys are reported, never reduced: if
//! `parse256(IL) >= n` or the resulting child key is zero, derivation fails
//! with [`Error::KeyDerivation`].

use core::fmt;

use hmac::{Hmac, Mac};
use k256::elliptic_curve::PrimeField;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{FieldBytes, NonZeroScalar, Scalar, SecretKey};
use sha2::Sha512;
use zeroize::Zeroizing;

use crate::encoding::base58check_encode;
use crate::error::{Error, Result};
use crate::hash::hash160;
use crate::hdpath::{ChildIndex, DerivationPath};

type HmacSha512 = Hmac<Sha512>;

/// HMAC key for master key generation.
const MASTER_HMAC_KEY: &[u8] = b"Bitcoin seed";

/// Mainnet `xprv` version bytes.
const XPRV_VERSION: [u8; 4] = [0x04, 0x88, 0xAD, 0xE4];

/// A BIP-32 extended private key.
///
/// Immutable: every derivation returns a new value. The private key is
/// always present and valid; the secret and chain code are zeroized on drop.
#[derive(Clone)]
pub struct ExtendedPrivateKey {
    secret: SecretKey,
    chain_code: Zeroizing<[u8; 32]>,
    depth: u8,
    parent_fingerprint: [u8; 4],
    child_number: u32,
}

impl ExtendedPrivateKey {
    /// Create the master key from a BIP-39 seed.
    ///
    /// `I = HMAC-SHA512("Bitcoin seed", seed)`; IL is the key, IR the chain code.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSeedLength`] unless the seed is 16 to 64 bytes,
    /// and [`Error::KeyDerivation`] if IL is zero or not below the curve order.
    pub fn from_seed(seed: &[u8]) -> Result<Self> {
        if !(16..=64).contains(&seed.len()) {
            return Err(Error::InvalidSeedLength(seed.len()));
        }

        let i = hmac_sha512(MASTER_HMAC_KEY, &[seed])?;
        let (il, ir) = i.split_at(32);

        let secret = SecretKey::from_slice(il)
            .map_err(|_| Error::KeyDerivation("master key outside the curve order"))?;

        Ok(Self {
            secret,
            chain_code: Zeroizing::new(to_array(ir)),
            depth: 0,
            parent_fingerprint: [0u8; 4],
            child_number: 0,
        })
    }

    /// Derive a single child key (CKDpriv).
    ///
    /// # Errors
    ///
    /// Returns [`Error::MaxDepthExceeded`] at depth 255 and
    /// [`Error::KeyDerivation`] for an invalid child key.
    pub fn derive_child(&self, index: ChildIndex) -> Result<Self> {
        let depth = self
            .depth
            .checked_add(1)
            .ok_or(Error::MaxDepthExceeded)?;

        let child_number = index.to_u32();
        let i = if index.is_hardened() {
            let key = self.expose_private_key();
            hmac_sha512(
                self.chain_code.as_slice(),
                &[&[0u8][..], key.as_slice(), &child_number.to_be_bytes()[..]],
            )?
        } else {
            hmac_sha512(
                self.chain_code.as_slice(),
                &[&self.public_key()[..], &child_number.to_be_bytes()[..]],
            )?
        };
        let (il, ir) = i.split_at(32);

        let secret = tweak_add(&self.secret.to_nonzero_scalar(), il)?;

        Ok(Self {
            secret,
            chain_code: Zeroizing::new(to_array(ir)),
            depth,
            parent_fingerprint: self.fingerprint(),
            child_number,
        })
    }

    /// Walk `path` from this key, aborting on the first failing segment.
    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self> {
        path.indices()
            .iter()
            .try_fold(self.clone(), |key, index| key.derive_child(*index))
    }

    /// The 32-byte private key.
    ///
    /// **Security Warning**: the returned buffer is zeroized on drop but its
    /// contents must never be logged.
    pub fn expose_private_key(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.secret.to_bytes().into())
    }

    /// The 33-byte SEC1 compressed public key.
    pub fn public_key(&self) -> [u8; 33] {
        let point = self.secret.public_key().to_encoded_point(true);
        to_array(point.as_bytes())
    }

    /// First four bytes of `hash160` of the compressed public key.
    pub fn fingerprint(&self) -> [u8; 4] {
        to_array(&hash160(&self.public_key())[..4])
    }

    /// The chain code.
    #[inline]
    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    /// Depth in the tree (0 for the master key).
    #[inline]
    pub const fn depth(&self) -> u8 {
        self.depth
    }

    /// Fingerprint of the parent key (zero for the master key).
    #[inline]
    pub const fn parent_fingerprint(&self) -> [u8; 4] {
        self.parent_fingerprint
    }

    /// The raw child number that produced this key, hardened bit included.
    #[inline]
    pub const fn child_number(&self) -> u32 {
        self.child_number
    }

    /// Base58Check `xprv` serialization.
    ///
    /// **Security Warning**: the string contains the private key. Intended
    /// for explicit diagnostics only.
    pub fn expose_xprv(&self) -> Zeroizing<String> {
        let key = self.expose_private_key();

        let mut payload = Zeroizing::new(Vec::with_capacity(74));
        payload.push(self.depth);
        payload.extend_from_slice(&self.parent_fingerprint);
        payload.extend_from_slice(&self.child_number.to_be_bytes());
        payload.extend_from_slice(self.chain_code.as_slice());
        payload.push(0x00);
        payload.extend_from_slice(key.as_slice());

        Zeroizing::new(base58check_encode(&XPRV_VERSION, &payload))
    }
}

impl fmt::Debug for ExtendedPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedPrivateKey")
            .field("depth", &self.depth)
            .field("child_number", &ChildIndex::from(self.child_number))
            .field("fingerprint", &hex::encode(self.fingerprint()))
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

/// `parse256(IL) + k mod n`, rejecting `IL >= n` and a zero result.
fn tweak_add(parent: &NonZeroScalar, il: &[u8]) -> Result<SecretKey> {
    let tweak: Option<Scalar> = Scalar::from_repr(FieldBytes::clone_from_slice(il)).into();
    let tweak = tweak.ok_or(Error::KeyDerivation("IL is not below the curve order"))?;

    let child: Option<NonZeroScalar> = NonZeroScalar::new(tweak + parent.as_ref()).into();
    child
        .map(SecretKey::from)
        .ok_or(Error::KeyDerivation("derived child key is zero"))
}

fn hmac_sha512(key: &[u8], parts: &[&[u8]]) -> Result<Zeroizing<[u8; 64]>> {
    let mut mac = HmacSha512::new_from_slice(key)
        .map_err(|_| Error::KeyDerivation("invalid HMAC key length"))?;
    for part in parts {
        mac.update(part);
    }
    Ok(Zeroizing::new(to_array(&mac.finalize().into_bytes())))
}

fn to_array<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    const CURVE_ORDER: [u8; 32] =
        hex!("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141");

    fn tv1_master() -> ExtendedPrivateKey {
        ExtendedPrivateKey::from_seed(&hex!("000102030405060708090a0b0c0d0e0f")).unwrap()
    }

    #[test]
    fn test_bip32_vector1_master() {
        let master = tv1_master();
        assert_eq!(master.depth(), 0);
        assert_eq!(
            master.expose_xprv().as_str(),
            "xprv9s21ZrQH143K3QTDL4LXw2F7HEK3wJUD2nW2nRk4stbPy6cq3jPPqjiChkVvvNKmPGJxWUtg6LnF5kejMRNNU3TGtRBeJgk33yuGBxrMPHi"
        );
        assert_eq!(
            master.public_key(),
            hex!("0339a36013301597daef41fbe593a02cc513d0b55527ec2df1050e2e8ff49c85c2")
        );
        assert_eq!(master.fingerprint(), hex!("3442193e"));
    }

    #[test]
    fn test_bip32_vector1_hardened_child() {
        let child = tv1_master()
            .derive_child(ChildIndex::Hardened(0))
            .unwrap();
        assert_eq!(child.depth(), 1);
        assert_eq!(child.parent_fingerprint(), hex!("3442193e"));
        assert_eq!(child.child_number(), 0x8000_0000);
        assert_eq!(
            child.expose_xprv().as_str(),
            "xprv9uHRZZhk6KAJC1avXpDAp4MDc3sQKNxDiPvvkX8Br5ngLNv1TxvUxt4cV1rGL5hj6KCesnDYUhd7oWgT11eZG7XnxHrnYeSvkzY7d2bhkJ7"
        );
    }

    #[test]
    fn test_ethereum_leaf_from_seed() {
        let seed = hex!(
            "5eb00bbddcf069084889a8ab9155568165f5c453ccb85e70811aaed6f6da5fc1"
            "9a5ac40b389cd370d086206dec8aa6c43daea6690f20ad3d8d48b2d2ce9e38e4"
        );
        let path: DerivationPath = "m/44'/60'/0'/0/0".parse().unwrap();
        let leaf = ExtendedPrivateKey::from_seed(&seed)
            .unwrap()
            .derive_path(&path)
            .unwrap();

        assert_eq!(leaf.depth(), 5);
        assert_eq!(
            *leaf.expose_private_key(),
            hex!("1ab42cc412b618bdea3a599e3c9bae199ebf030895b039e9db1e30dafb12b727")
        );
        assert_eq!(
            leaf.public_key(),
            hex!("0237b0bb7a8288d38ed49a524b5dc98cff3eb5ca824c9f9dc0dfdb3d9cd600f299")
        );
    }

    #[test]
    fn test_derive_path_matches_stepwise() {
        let master = tv1_master();
        let path: DerivationPath = "m/0'/1".parse().unwrap();
        let direct = master.derive_path(&path).unwrap();
        let stepwise = master
            .derive_child(ChildIndex::Hardened(0))
            .unwrap()
            .derive_child(ChildIndex::Normal(1))
            .unwrap();
        assert_eq!(*direct.expose_private_key(), *stepwise.expose_private_key());
        assert_eq!(direct.chain_code(), stepwise.chain_code());
    }

    #[test]
    fn test_master_path_is_identity() {
        let master = tv1_master();
        let same = master.derive_path(&DerivationPath::master()).unwrap();
        assert_eq!(*same.expose_private_key(), *master.expose_private_key());
    }

    #[test]
    fn test_seed_length_bounds() {
        assert!(matches!(
            ExtendedPrivateKey::from_seed(&[0u8; 15]),
            Err(Error::InvalidSeedLength(15))
        ));
        assert!(matches!(
            ExtendedPrivateKey::from_seed(&[0u8; 65]),
            Err(Error::InvalidSeedLength(65))
        ));
        assert!(ExtendedPrivateKey::from_seed(&[7u8; 16]).is_ok());
    }

    #[test]
    fn test_tweak_rejects_il_at_curve_order() {
        let parent = NonZeroScalar::new(Scalar::ONE).unwrap();
        assert!(matches!(
            tweak_add(&parent, &CURVE_ORDER),
            Err(Error::KeyDerivation(_))
        ));
    }

    #[test]
    fn test_tweak_rejects_zero_child() {
        // IL = n - 1 plus parent key 1 wraps to zero.
        let mut il = CURVE_ORDER;
        il[31] -= 1;
        let parent = NonZeroScalar::new(Scalar::ONE).unwrap();
        assert!(matches!(
            tweak_add(&parent, &il),
            Err(Error::KeyDerivation(_))
        ));
    }

    #[test]
    fn test_tweak_adds() {
        let mut il = [0u8; 32];
        il[31] = 2;
        let parent = NonZeroScalar::new(Scalar::ONE).unwrap();
        let child = tweak_add(&parent, &il).unwrap();
        let mut expected = [0u8; 32];
        expected[31] = 3;
        assert_eq!(child.to_bytes().as_slice(), &expected);
    }

    #[test]
    fn test_max_depth() {
        let mut key = tv1_master();
        key.depth = 255;
        assert!(matches!(
            key.derive_child(ChildIndex::Normal(0)),
            Err(Error::MaxDepthExceeded)
        ));
    }

    #[test]
    fn test_debug_redacts() {
        let debug = format!("{:?}", tv1_master());
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("e8f32e72"));
    }
}
