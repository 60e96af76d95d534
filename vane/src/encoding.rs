//! Base58Check encoding for serialized extended keys.

use crate::hash::double_sha256;

/// Encode `version || payload` as Base58Check.
pub fn base58check_encode(version: &[u8], payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(version.len() + payload.len() + 4);
    data.extend_from_slice(version);
    data.extend_from_slice(payload);

    let checksum = double_sha256(&data);
    data.extend_from_slice(&checksum[..4]);

    bs58::encode(data).into_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base58check_leading_zero_version() {
        // Version byte 0x00 maps to a leading '1'.
        let encoded = base58check_encode(&[0x00], &[0u8; 20]);
        assert_eq!(encoded, "1111111111111111111114oLvT2");
    }

    #[test]
    fn test_base58check_checksum_changes_with_payload() {
        let a = base58check_encode(&[0x00], &[0u8; 20]);
        let b = base58check_encode(&[0x00], &[1u8; 20]);
        assert_ne!(a, b);
    }
}
