//! ERC-20 call data encoding.
//!
//! Only the functions the wallet calls are covered, so the encoding is written
//! out directly: a 4-byte selector followed by 32-byte words. Return values
//! are read the same way, including the one dynamic `string` of `symbol()`.

use alloy_primitives::{Address, Bytes, U256};

use crate::client::ClientError;
use crate::error::{Error, Result};

/// `bytes4(keccak256("transfer(address,uint256)"))`
pub const TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];

/// `bytes4(keccak256("balanceOf(address)"))`
pub const BALANCE_OF_SELECTOR: [u8; 4] = [0x70, 0xa0, 0x82, 0x31];

/// `bytes4(keccak256("decimals()"))`
pub const DECIMALS_SELECTOR: [u8; 4] = [0x31, 0x3c, 0xe5, 0x67];

/// `bytes4(keccak256("symbol()"))`
pub const SYMBOL_SELECTOR: [u8; 4] = [0x95, 0xd8, 0x9b, 0x41];

const WORD: usize = 32;

/// Call data for `transfer(to, amount)`: 68 bytes.
pub fn encode_transfer(to: Address, amount: U256) -> Bytes {
    let mut data = Vec::with_capacity(4 + 2 * WORD);
    data.extend_from_slice(&TRANSFER_SELECTOR);
    data.extend_from_slice(&address_word(to));
    data.extend_from_slice(&amount.to_be_bytes::<WORD>());
    data.into()
}

/// Decode `transfer` call data back into `(to, amount)`.
///
/// Returns `None` for a different selector, wrong length or a recipient word
/// with non-zero padding.
pub fn decode_transfer(data: &[u8]) -> Option<(Address, U256)> {
    let args = data.strip_prefix(&TRANSFER_SELECTOR)?;
    if args.len() != 2 * WORD {
        return None;
    }
    let (to_word, amount_word) = args.split_at(WORD);
    if to_word[..12].iter().any(|b| *b != 0) {
        return None;
    }
    Some((
        Address::from_slice(&to_word[12..]),
        U256::from_be_slice(amount_word),
    ))
}

/// Call data for `balanceOf(owner)`: 36 bytes.
pub fn encode_balance_of(owner: Address) -> Bytes {
    let mut data = Vec::with_capacity(4 + WORD);
    data.extend_from_slice(&BALANCE_OF_SELECTOR);
    data.extend_from_slice(&address_word(owner));
    data.into()
}

/// Call data for `decimals()`.
pub fn encode_decimals() -> Bytes {
    Bytes::from_static(&DECIMALS_SELECTOR)
}

/// Call data for `symbol()`.
pub fn encode_symbol() -> Bytes {
    Bytes::from_static(&SYMBOL_SELECTOR)
}

/// Decode a single `uint256` return value.
pub fn decode_uint256(output: &[u8]) -> Result<U256> {
    if output.len() != WORD {
        return Err(malformed(format!(
            "expected a 32-byte uint256 return value, got {} bytes",
            output.len()
        )));
    }
    Ok(U256::from_be_slice(output))
}

/// Decode a `uint8` return value, as returned by `decimals()`.
pub fn decode_uint8(output: &[u8]) -> Result<u8> {
    let value = decode_uint256(output)?;
    u8::try_from(value).map_err(|_| malformed(format!("uint8 return value out of range: {value}")))
}

/// Decode a `string` return value.
///
/// Some early tokens return `symbol()` as `bytes32`; a bare 32-byte word is
/// read as NUL-padded text.
pub fn decode_string(output: &[u8]) -> Result<String> {
    let bytes = if output.len() == WORD {
        let end = output.iter().rposition(|b| *b != 0).map_or(0, |last| last + 1);
        &output[..end]
    } else {
        let offset = read_usize(output, 0)?;
        let len = read_usize(output, offset)?;
        // `read_usize` succeeded, so `offset + WORD` is in bounds.
        let start = offset + WORD;
        start
            .checked_add(len)
            .and_then(|end| output.get(start..end))
            .ok_or_else(|| malformed(format!("string length {len} exceeds return value")))?
    };
    String::from_utf8(bytes.to_vec())
        .map_err(|_| malformed("string return value is not UTF-8".into()))
}

fn read_usize(output: &[u8], at: usize) -> Result<usize> {
    let word = at
        .checked_add(WORD)
        .and_then(|end| output.get(at..end))
        .ok_or_else(|| malformed(format!("return value too short: {} bytes", output.len())))?;
    usize::try_from(U256::from_be_slice(word))
        .map_err(|_| malformed("string offset or length out of range".into()))
}

fn malformed(message: String) -> Error {
    Error::Rpc(ClientError::Rejected(message))
}

fn address_word(address: Address) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[12..].copy_from_slice(address.as_slice());
    word
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::keccak256;
    use hex_literal::hex;

    #[test]
    fn test_selectors_match_signatures() {
        assert_eq!(keccak256("transfer(address,uint256)")[..4], TRANSFER_SELECTOR);
        assert_eq!(keccak256("balanceOf(address)")[..4], BALANCE_OF_SELECTOR);
        assert_eq!(keccak256("decimals()")[..4], DECIMALS_SELECTOR);
        assert_eq!(keccak256("symbol()")[..4], SYMBOL_SELECTOR);
        assert_eq!(encode_decimals().as_ref(), DECIMALS_SELECTOR.as_slice());
        assert_eq!(encode_symbol().as_ref(), SYMBOL_SELECTOR.as_slice());
    }

    #[test]
    fn test_encode_transfer_layout() {
        let to = Address::from(hex!("bb6d7adbbbb75006957351835a2eea5858ca0413"));
        let data = encode_transfer(to, U256::from(100_000u64));

        let expected = hex!(
            "a9059cbb"
            "000000000000000000000000bb6d7adbbbb75006957351835a2eea5858ca0413"
            "00000000000000000000000000000000000000000000000000000000000186a0"
        );
        assert_eq!(data.as_ref(), expected.as_slice());
    }

    #[test]
    fn test_decode_transfer() {
        let to = Address::repeat_byte(0x11);
        let amount = U256::from(42u8);
        assert_eq!(decode_transfer(&encode_transfer(to, amount)), Some((to, amount)));
        assert_eq!(decode_transfer(&[0u8; 68]), None);
        assert_eq!(decode_transfer(&encode_transfer(to, amount)[..67]), None);
    }

    #[test]
    fn test_encode_balance_of() {
        let owner = Address::repeat_byte(0xab);
        let data = encode_balance_of(owner);
        assert_eq!(data.len(), 36);
        assert_eq!(data[..4], BALANCE_OF_SELECTOR);
        assert_eq!(&data[16..], owner.as_slice());
    }

    #[test]
    fn test_decode_uint256() {
        let mut word = [0u8; 32];
        word[31] = 9;
        assert_eq!(decode_uint256(&word).unwrap(), U256::from(9u8));
        assert!(decode_uint256(&word[..31]).is_err());
    }

    #[test]
    fn test_decode_uint8() {
        let mut word = [0u8; 32];
        word[31] = 6;
        assert_eq!(decode_uint8(&word).unwrap(), 6);
        word[30] = 1;
        assert!(matches!(
            decode_uint8(&word),
            Err(Error::Rpc(ClientError::Rejected(_)))
        ));
    }

    #[test]
    fn test_decode_dynamic_string() {
        let output = hex!(
            "0000000000000000000000000000000000000000000000000000000000000020"
            "0000000000000000000000000000000000000000000000000000000000000004"
            "5553444300000000000000000000000000000000000000000000000000000000"
        );
        assert_eq!(decode_string(&output).unwrap(), "USDC");

        // Length runs past the end.
        let mut truncated = output;
        truncated[63] = 0x40;
        assert!(decode_string(&truncated).is_err());

        // Offset points outside the return value.
        let mut offset = output;
        offset[0] = 0xff;
        assert!(decode_string(&offset).is_err());

        assert!(decode_string(&output[..40]).is_err());
    }

    #[test]
    fn test_decode_bytes32_string() {
        let output = hex!("4d4b520000000000000000000000000000000000000000000000000000000000");
        assert_eq!(decode_string(&output).unwrap(), "MKR");
        assert_eq!(decode_string(&[0u8; 32]).unwrap(), "");
    }
}
