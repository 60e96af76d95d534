//! What a transfer should do, before nonce, fees and gas are known.

use core::fmt;

use alloy_primitives::{Address, Bytes, U256};

use crate::abi;

/// A native-currency or ERC-20 transfer request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransferIntent {
    /// Send `amount` wei to `to`.
    Native {
        /// Recipient.
        to: Address,
        /// Amount in wei.
        amount: U256,
    },
    /// Call `token.transfer(to, amount)`.
    Token {
        /// ERC-20 contract.
        token: Address,
        /// Recipient.
        to: Address,
        /// Amount in the token's base units.
        amount: U256,
    },
}

impl TransferIntent {
    /// Native-currency transfer.
    pub const fn native(to: Address, amount: U256) -> Self {
        Self::Native { to, amount }
    }

    /// ERC-20 `transfer` call.
    pub const fn token(token: Address, to: Address, amount: U256) -> Self {
        Self::Token { token, to, amount }
    }

    /// The final recipient of the value.
    pub const fn recipient(&self) -> Address {
        match self {
            Self::Native { to, .. } | Self::Token { to, .. } => *to,
        }
    }

    /// The amount in base units.
    pub const fn amount(&self) -> U256 {
        match self {
            Self::Native { amount, .. } | Self::Token { amount, .. } => *amount,
        }
    }

    /// Transaction `to` field: the payee or the token contract.
    pub const fn tx_to(&self) -> Address {
        match self {
            Self::Native { to, .. } => *to,
            Self::Token { token, .. } => *token,
        }
    }

    /// Transaction `value` field: zero for token transfers.
    pub const fn tx_value(&self) -> U256 {
        match self {
            Self::Native { amount, .. } => *amount,
            Self::Token { .. } => U256::ZERO,
        }
    }

    /// Transaction call data: empty for native transfers.
    pub fn call_data(&self) -> Bytes {
        match self {
            Self::Native { .. } => Bytes::new(),
            Self::Token { to, amount, .. } => abi::encode_transfer(*to, *amount),
        }
    }
}

impl fmt::Display for TransferIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native { to, amount } => write!(f, "native {amount} wei to {to}"),
            Self::Token { token, to, amount } => {
                write!(f, "token {token} {amount} units to {to}")
            }
        }
    }
}
