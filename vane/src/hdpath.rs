//! BIP-32 derivation paths.
//!
//! Structured parsing and formatting of paths like `m/44'/60'/0'/0/0`.

use core::fmt;
use core::str::FromStr;

use crate::error::{Error, Result};

/// A child index in a derivation path.
///
/// Hardened indices are stored without the 2^31 offset and displayed as `n'`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChildIndex {
    /// Normal (non-hardened) index: 0 to 2^31 - 1
    Normal(u32),
    /// Hardened index: displayed as n' or nh, stored as n
    Hardened(u32),
}

impl ChildIndex {
    /// The offset for hardened indices (2^31).
    pub const HARDENED_OFFSET: u32 = 0x8000_0000;

    /// Create a normal (non-hardened) child index.
    pub fn normal(index: u32) -> Result<Self> {
        if index >= Self::HARDENED_OFFSET {
            return Err(Error::InvalidPath(format!("index {index} out of range")));
        }
        Ok(Self::Normal(index))
    }

    /// Create a hardened child index.
    pub fn hardened(index: u32) -> Result<Self> {
        if index >= Self::HARDENED_OFFSET {
            return Err(Error::InvalidPath(format!("index {index}' out of range")));
        }
        Ok(Self::Hardened(index))
    }

    /// Check if this is a hardened index.
    #[inline]
    pub const fn is_hardened(&self) -> bool {
        matches!(self, Self::Hardened(_))
    }

    /// Get the index value without the hardened flag.
    #[inline]
    pub const fn index(&self) -> u32 {
        match self {
            Self::Normal(i) | Self::Hardened(i) => *i,
        }
    }

    /// Raw `ser32` value used in CKDpriv, including the hardened offset.
    #[inline]
    pub const fn to_u32(&self) -> u32 {
        match self {
            Self::Normal(i) => *i,
            Self::Hardened(i) => *i | Self::HARDENED_OFFSET,
        }
    }
}

impl From<u32> for ChildIndex {
    fn from(value: u32) -> Self {
        if value >= Self::HARDENED_OFFSET {
            Self::Hardened(value & !Self::HARDENED_OFFSET)
        } else {
            Self::Normal(value)
        }
    }
}

impl fmt::Display for ChildIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal(i) => write!(f, "{}", i),
            Self::Hardened(i) => write!(f, "{}'", i),
        }
    }
}

impl FromStr for ChildIndex {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || Error::InvalidPath(format!("bad segment \"{s}\""));

        match s.strip_suffix(['\'', 'h', 'H']) {
            Some(digits) => Self::hardened(digits.parse().map_err(|_| invalid())?),
            None => Self::normal(s.parse().map_err(|_| invalid())?),
        }
    }
}

/// A BIP-32 derivation path: the ordered child indices below the master key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct DerivationPath {
    indices: Vec<ChildIndex>,
}

impl DerivationPath {
    /// The empty path addressing the master key.
    pub fn master() -> Self {
        Self::default()
    }

    /// Create a derivation path from child indices.
    pub fn new(indices: Vec<ChildIndex>) -> Self {
        Self { indices }
    }

    /// Parse a derivation path.
    ///
    /// Accepts `m/44'/60'/0'/0/0`, `m/44h/60h/0h/0/0` and the same without
    /// the leading `m/`. Empty segments are rejected.
    pub fn parse(path: &str) -> Result<Self> {
        let path = path.trim();
        if path.is_empty() || path == "m" || path == "M" {
            return Ok(Self::master());
        }

        let rest = path
            .strip_prefix("m/")
            .or_else(|| path.strip_prefix("M/"))
            .unwrap_or(path);

        let indices = rest
            .split('/')
            .map(|segment| {
                if segment.is_empty() {
                    Err(Error::InvalidPath(format!("empty segment in \"{path}\"")))
                } else {
                    segment.parse()
                }
            })
            .collect::<Result<Vec<ChildIndex>>>()?;

        Ok(Self { indices })
    }

    /// BIP-44 path: `m/44'/coin_type'/account'/change/address_index`.
    pub fn bip44(coin_type: u32, account: u32, change: u32, address_index: u32) -> Result<Self> {
        Ok(Self {
            indices: vec![
                ChildIndex::hardened(44)?,
                ChildIndex::hardened(coin_type)?,
                ChildIndex::hardened(account)?,
                ChildIndex::normal(change)?,
                ChildIndex::normal(address_index)?,
            ],
        })
    }

    /// Get the child indices in this path.
    #[inline]
    pub fn indices(&self) -> &[ChildIndex] {
        &self.indices
    }

    /// Number of derivation steps.
    #[inline]
    pub fn depth(&self) -> usize {
        self.indices.len()
    }

    /// Check if this path is empty (master key).
    #[inline]
    pub fn is_master(&self) -> bool {
        self.indices.is_empty()
    }

    /// Append a child index to the path.
    pub fn child(&self, index: ChildIndex) -> Self {
        let mut indices = self.indices.clone();
        indices.push(index);
        Self { indices }
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for index in &self.indices {
            write!(f, "/{}", index)?;
        }
        Ok(())
    }
}

impl FromStr for DerivationPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
