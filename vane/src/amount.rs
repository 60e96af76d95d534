//! Exact conversion between decimal strings and integer base units.
//!
//! Amounts are [`U256`] counts of the smallest unit (wei for ETH, 10^-6 for a
//! six-decimal token). Conversion never goes through floating point, so
//! `parse_units("0.1", 6)` is exactly `100000`.

use alloy_primitives::U256;

use crate::error::{Error, Result};

/// Decimals of the native EVM currency (1 ether = 10^18 wei).
pub const ETHER_DECIMALS: u8 = 18;

/// Largest exponent with `10^n` below 2^256.
const MAX_DECIMALS: u8 = 77;

/// Parse a decimal string such as `"0.01"` into base units.
///
/// Accepts an optional integer part, an optional fraction and surrounding
/// whitespace. Trailing fractional zeros beyond `decimals` are ignored; any
/// other excess precision is rejected rather than rounded.
///
/// # Errors
///
/// Returns [`Error::InvalidAmount`] for signs, exponents, non-digits, excess
/// precision or values that do not fit in 256 bits.
pub fn parse_units(input: &str, decimals: u8) -> Result<U256> {
    let invalid = |reason| Error::InvalidAmount {
        input: input.to_owned(),
        reason,
    };

    if decimals > MAX_DECIMALS {
        return Err(invalid("too many decimals for a 256-bit amount"));
    }

    let s = input.trim();
    let (int_part, frac_part) = match s.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (s, ""),
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return Err(invalid("empty amount"));
    }
    let is_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if !is_digits(int_part) || !is_digits(frac_part) {
        return Err(invalid("expected digits with at most one decimal point"));
    }

    let frac_part = frac_part.trim_end_matches('0');
    if frac_part.len() > usize::from(decimals) {
        return Err(invalid("more fractional digits than the unit allows"));
    }

    let padding = usize::from(decimals) - frac_part.len();
    let mut digits = int_part
        .bytes()
        .chain(frac_part.bytes())
        .chain(core::iter::repeat_n(b'0', padding));

    let ten = U256::from(10u8);
    digits.try_fold(U256::ZERO, |acc, digit| {
        acc.checked_mul(ten)
            .and_then(|acc| acc.checked_add(U256::from(digit - b'0')))
            .ok_or_else(|| invalid("amount overflows 256 bits"))
    })
}

/// Format base units as a decimal string, the exact inverse of
/// [`parse_units`]. Trailing fractional zeros are dropped.
pub fn format_units(value: U256, decimals: u8) -> String {
    let digits = value.to_string();
    let decimals = usize::from(decimals);
    if decimals == 0 {
        return digits;
    }

    let padded = if digits.len() <= decimals {
        format!("{}{}", "0".repeat(decimals + 1 - digits.len()), digits)
    } else {
        digits
    };

    let (int_part, frac_part) = padded.split_at(padded.len() - decimals);
    let frac_part = frac_part.trim_end_matches('0');
    if frac_part.is_empty() {
        int_part.to_owned()
    } else {
        format!("{int_part}.{frac_part}")
    }
}
