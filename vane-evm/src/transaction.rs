//! EIP-1559 (type 2) transactions.
//!
//! Signing hash: `keccak256(0x02 || rlp([chain_id, nonce, max_priority_fee,
//! max_fee, gas_limit, to, value, data, access_list]))`. The signed envelope
//! appends `y_parity, r, s` to the same list.

use alloy_primitives::{Address, B256, Bytes, U256, keccak256};

use crate::account::Account;
use crate::client::TxHash;
use crate::error::Result;
use crate::signature::Signature;

/// EIP-2718 type byte of dynamic-fee transactions.
pub const EIP1559_TX_TYPE: u8 = 0x02;

/// An unsigned EIP-1559 transaction with an empty access list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Eip1559Transaction {
    /// Chain ID.
    pub chain_id: u64,
    /// Transaction nonce.
    pub nonce: u64,
    /// Max priority fee per gas (tip).
    pub max_priority_fee_per_gas: u128,
    /// Max fee per gas.
    pub max_fee_per_gas: u128,
    /// Gas limit.
    pub gas_limit: u64,
    /// Recipient: the payee for native transfers, the token contract for
    /// token transfers.
    pub to: Address,
    /// Value in wei.
    pub value: U256,
    /// Call data.
    pub data: Bytes,
}

impl Eip1559Transaction {
    /// Hash signed by the sender.
    pub fn signing_hash(&self) -> B256 {
        keccak256(typed_envelope(&rlp_encode_list(&self.rlp_fields())))
    }

    /// Sign with `account`, consuming the unsigned transaction.
    pub fn sign(self, account: &Account) -> Result<SignedTransaction> {
        let signature = account.sign_hash(&self.signing_hash().0)?;
        Ok(SignedTransaction {
            tx: self,
            signature,
        })
    }

    fn rlp_fields(&self) -> Vec<Vec<u8>> {
        vec![
            rlp_encode_u64(self.chain_id),
            rlp_encode_u64(self.nonce),
            rlp_encode_u128(self.max_priority_fee_per_gas),
            rlp_encode_u128(self.max_fee_per_gas),
            rlp_encode_u64(self.gas_limit),
            rlp_encode_bytes(self.to.as_slice()),
            rlp_encode_u256(self.value),
            rlp_encode_bytes(&self.data),
            rlp_encode_list(&[]),
        ]
    }
}

/// A signed EIP-1559 transaction ready for `eth_sendRawTransaction`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedTransaction {
    tx: Eip1559Transaction,
    signature: Signature,
}

impl SignedTransaction {
    /// The unsigned transaction.
    pub const fn transaction(&self) -> &Eip1559Transaction {
        &self.tx
    }

    /// The sender's signature over [`Eip1559Transaction::signing_hash`].
    pub const fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Raw EIP-2718 encoding: `0x02 || rlp([..fields, y_parity, r, s])`.
    pub fn encoded(&self) -> Vec<u8> {
        let mut items = self.tx.rlp_fields();
        items.push(rlp_encode_u64(u64::from(self.signature.v)));
        items.push(rlp_encode_bytes(trim_leading_zeros(&self.signature.r)));
        items.push(rlp_encode_bytes(trim_leading_zeros(&self.signature.s)));
        typed_envelope(&rlp_encode_list(&items))
    }

    /// Transaction hash: keccak256 of the raw encoding.
    pub fn hash(&self) -> TxHash {
        keccak256(self.encoded())
    }

    /// Recover the sender address from the signature.
    pub fn signer(&self) -> Result<Address> {
        self.signature.recover_address(&self.tx.signing_hash().0)
    }
}

fn typed_envelope(rlp: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(1 + rlp.len());
    out.push(EIP1559_TX_TYPE);
    out.extend_from_slice(rlp);
    out
}

/// RLP encode a u64.
fn rlp_encode_u64(value: u64) -> Vec<u8> {
    rlp_encode_bytes(trim_leading_zeros(&value.to_be_bytes()))
}

/// RLP encode a u128.
fn rlp_encode_u128(value: u128) -> Vec<u8> {
    rlp_encode_bytes(trim_leading_zeros(&value.to_be_bytes()))
}

/// RLP encode a 256-bit integer.
fn rlp_encode_u256(value: U256) -> Vec<u8> {
    rlp_encode_bytes(trim_leading_zeros(&value.to_be_bytes::<32>()))
}

/// RLP encode a byte string.
fn rlp_encode_bytes(bytes: &[u8]) -> Vec<u8> {
    if bytes.len() == 1 && bytes[0] < 0x80 {
        return vec![bytes[0]];
    }
    with_header(0x80, bytes.len(), &[bytes])
}

/// RLP encode a list of already-encoded items.
fn rlp_encode_list(items: &[Vec<u8>]) -> Vec<u8> {
    let total_len = items.iter().map(Vec::len).sum();
    let parts: Vec<&[u8]> = items.iter().map(Vec::as_slice).collect();
    with_header(0xc0, total_len, &parts)
}

/// Prefix `parts` with a short (`offset + len`) or long
/// (`offset + 55 + len_of_len`) RLP header.
fn with_header(offset: u8, len: usize, parts: &[&[u8]]) -> Vec<u8> {
    let mut out = Vec::with_capacity(9 + len);
    if len <= 55 {
        out.push(offset + len as u8);
    } else {
        let len_bytes = len.to_be_bytes();
        let len_bytes = trim_leading_zeros(&len_bytes);
        out.push(offset + 55 + len_bytes.len() as u8);
        out.extend_from_slice(len_bytes);
    }
    for part in parts {
        out.extend_from_slice(part);
    }
    out
}

/// Trim leading zeros from bytes.
fn trim_leading_zeros(bytes: &[u8]) -> &[u8] {
    let first_nonzero = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    &bytes[first_nonzero..]
}
