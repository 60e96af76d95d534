//! Ethereum address derivation and EIP-55 parsing.
//!
//! Addresses are `alloy_primitives::Address`; this module only adds the
//! conversions the wallet needs.

use alloy_primitives::{Address, keccak256};
use k256::ecdsa::VerifyingKey;

use crate::error::{Error, Result};

/// Derive the address of a public key: the last 20 bytes of keccak256 over
/// the 64-byte uncompressed point (without the `0x04` tag).
pub fn from_public_key(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    Address::from_slice(&hash[12..])
}

/// Format an address with its EIP-55 mixed-case checksum.
#[inline]
pub fn to_checksum(address: &Address) -> String {
    address.to_checksum(None)
}

/// Parse a `0x`-prefixed (or bare) 40-digit hex address.
///
/// All-lowercase and all-uppercase input is accepted as is; mixed-case input
/// must carry a valid EIP-55 checksum.
///
/// # Errors
///
/// Returns [`Error::InvalidAddress`] for bad length, non-hex digits or a
/// checksum mismatch.
pub fn parse(input: &str) -> Result<Address> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if digits.len() != 40 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::InvalidAddress(input.to_owned()));
    }

    let mut bytes = [0u8; 20];
    hex::decode_to_slice(digits, &mut bytes).map_err(|_| Error::InvalidAddress(input.to_owned()))?;
    let address = Address::from(bytes);

    let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper && to_checksum(&address)[2..] != *digits {
        return Err(Error::InvalidAddress(input.to_owned()));
    }

    Ok(address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;
    use k256::ecdsa::SigningKey;

    #[test]
    fn test_from_public_key() {
        let key = SigningKey::from_slice(&hex!(
            "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318"
        ))
        .unwrap();
        let address = from_public_key(key.verifying_key());
        assert_eq!(
            address,
            Address::from(hex!("2c7536e3605d9c16a7a3d7b1898e529396a65c23"))
        );
    }

    #[test]
    fn test_checksum_vectors() {
        for expected in [
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
            "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
        ] {
            let address = parse(expected).unwrap();
            assert_eq!(to_checksum(&address), expected);
        }
    }

    #[test]
    fn test_parse_single_case() {
        let lower = parse("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();
        let upper = parse("5AAEB6053F3E94C9B9A09F33669435E7EF1BEAED").unwrap();
        assert_eq!(lower, upper);
    }

    #[test]
    fn test_parse_rejects_bad_checksum() {
        assert!(matches!(
            parse("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAeD"),
            Err(Error::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "0x", "0x1234", "0xzzzzb6053f3e94c9b9a09f33669435e7ef1beaed"] {
            assert!(parse(bad).is_err(), "accepted {bad:?}");
        }
    }
}
