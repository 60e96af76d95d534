//! Chain client capability and its JSON-RPC implementation.
//!
//! The [`ChainClient`] trait is the only way the submitter talks to the
//! network. [`RpcClient`] implements it over HTTP with an `alloy` provider;
//! tests substitute an in-memory client.

use std::future::Future;
use std::sync::Arc;

use alloy::network::{Ethereum, TransactionBuilder};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::transports::TransportError;
use alloy_primitives::{Address, B256, Bytes, U256};
use thiserror::Error;
use tracing::{debug, info};

use crate::abi;
use crate::config::NetworkConfig;
use crate::error::{Error, Result};

/// 32-byte transaction hash, displayed as `0x`-prefixed lowercase hex.
pub type TxHash = B256;

/// Failures reported by a chain client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// Sender cannot cover value plus maximum gas cost.
    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),
    /// Nonce already used or a conflicting transaction is pending.
    #[error("nonce conflict: {0}")]
    NonceConflict(String),
    /// Simulation or execution reverted.
    #[error("execution reverted: {0}")]
    Reverted(String),
    /// Transport failure: connection, HTTP or decoding.
    #[error("network error: {0}")]
    Network(String),
    /// No response before the deadline.
    #[error("request timed out")]
    Timeout,
    /// Any other node-side rejection.
    #[error("rejected by node: {0}")]
    Rejected(String),
}

impl ClientError {
    /// Classify a node error message.
    pub fn from_node_message(message: &str) -> Self {
        let lower = message.to_ascii_lowercase();
        let message = message.to_owned();

        if lower.contains("insufficient funds") {
            Self::InsufficientFunds(message)
        } else if lower.contains("nonce too low")
            || lower.contains("nonce too high")
            || lower.contains("already known")
            || lower.contains("replacement transaction underpriced")
        {
            Self::NonceConflict(message)
        } else if lower.contains("revert") {
            Self::Reverted(message)
        } else {
            Self::Rejected(message)
        }
    }
}

impl From<TransportError> for ClientError {
    fn from(err: TransportError) -> Self {
        match err.as_error_resp() {
            Some(payload) => Self::from_node_message(&payload.message),
            None => Self::Network(err.to_string()),
        }
    }
}

/// EIP-1559 fee parameters per gas unit, in wei.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeEstimate {
    /// Max fee per gas.
    pub max_fee_per_gas: u128,
    /// Max priority fee per gas (tip).
    pub max_priority_fee_per_gas: u128,
}

/// Call parameters for gas estimation and read-only calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRequest {
    /// Sender.
    pub from: Address,
    /// Target.
    pub to: Address,
    /// Value in wei.
    pub value: U256,
    /// Call data.
    pub data: Bytes,
}

/// Network operations a transfer needs.
///
/// Success of [`send_raw_transaction`](Self::send_raw_transaction) means the
/// node accepted the transaction, not that it was mined.
pub trait ChainClient: Send + Sync {
    /// Chain id served by the endpoint.
    fn chain_id(&self) -> impl Future<Output = Result<u64, ClientError>> + Send;

    /// Transaction count of `address` including pending transactions.
    fn pending_nonce(
        &self,
        address: Address,
    ) -> impl Future<Output = Result<u64, ClientError>> + Send;

    /// The node's EIP-1559 fee suggestion.
    fn fee_estimate(&self) -> impl Future<Output = Result<FeeEstimate, ClientError>> + Send;

    /// Gas needed to execute `call`.
    fn estimate_gas(
        &self,
        call: &CallRequest,
    ) -> impl Future<Output = Result<u64, ClientError>> + Send;

    /// Broadcast a signed raw transaction.
    fn send_raw_transaction(
        &self,
        raw: &[u8],
    ) -> impl Future<Output = Result<TxHash, ClientError>> + Send;
}

impl<C: ChainClient> ChainClient for Arc<C> {
    fn chain_id(&self) -> impl Future<Output = Result<u64, ClientError>> + Send {
        (**self).chain_id()
    }

    fn pending_nonce(
        &self,
        address: Address,
    ) -> impl Future<Output = Result<u64, ClientError>> + Send {
        (**self).pending_nonce(address)
    }

    fn fee_estimate(&self) -> impl Future<Output = Result<FeeEstimate, ClientError>> + Send {
        (**self).fee_estimate()
    }

    fn estimate_gas(
        &self,
        call: &CallRequest,
    ) -> impl Future<Output = Result<u64, ClientError>> + Send {
        (**self).estimate_gas(call)
    }

    fn send_raw_transaction(
        &self,
        raw: &[u8],
    ) -> impl Future<Output = Result<TxHash, ClientError>> + Send {
        (**self).send_raw_transaction(raw)
    }
}

/// JSON-RPC chain client backed by an `alloy` HTTP provider.
#[derive(Clone)]
pub struct RpcClient {
    provider: DynProvider<Ethereum>,
    chain_id: u64,
}

impl RpcClient {
    /// Connect to `config.rpc_url` and check that it serves `config.chain_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Rpc`] if the endpoint is unreachable and
    /// [`Error::ChainMismatch`] if it reports another chain.
    pub async fn connect(config: &NetworkConfig) -> Result<Self> {
        let provider: DynProvider<Ethereum> = ProviderBuilder::new()
            .disable_recommended_fillers()
            .connect(&config.rpc_url)
            .await
            .map_err(ClientError::from)?
            .erased();

        let actual = provider.get_chain_id().await.map_err(ClientError::from)?;
        if actual != config.chain_id {
            return Err(Error::ChainMismatch {
                expected: config.chain_id,
                actual,
            });
        }

        info!(network = %config.name, chain_id = actual, "connected to rpc endpoint");

        Ok(Self {
            provider,
            chain_id: actual,
        })
    }

    /// Chain id verified at connection time.
    #[inline]
    pub const fn verified_chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Native balance of `address` in wei.
    pub async fn balance(&self, address: Address) -> Result<U256> {
        let balance = self
            .provider
            .get_balance(address)
            .await
            .map_err(ClientError::from)?;
        debug!(address = %address, balance = %balance, "fetched native balance");
        Ok(balance)
    }

    /// ERC-20 `balanceOf(owner)` on `token`, in base units.
    pub async fn token_balance(&self, token: Address, owner: Address) -> Result<U256> {
        let output = self.read(token, abi::encode_balance_of(owner)).await?;
        let balance = abi::decode_uint256(&output)?;
        debug!(token = %token, owner = %owner, balance = %balance, "fetched token balance");
        Ok(balance)
    }

    /// ERC-20 `decimals()` of `token`.
    pub async fn token_decimals(&self, token: Address) -> Result<u8> {
        let output = self.read(token, abi::encode_decimals()).await?;
        let decimals = abi::decode_uint8(&output)?;
        debug!(token = %token, decimals = decimals, "fetched token decimals");
        Ok(decimals)
    }

    /// ERC-20 `symbol()` of `token`.
    pub async fn token_symbol(&self, token: Address) -> Result<String> {
        let output = self.read(token, abi::encode_symbol()).await?;
        let symbol = abi::decode_string(&output)?;
        debug!(token = %token, symbol = %symbol, "fetched token symbol");
        Ok(symbol)
    }

    async fn read(&self, to: Address, input: Bytes) -> Result<Bytes> {
        let request = TransactionRequest::default().with_to(to).with_input(input);
        Ok(self.provider.call(request).await.map_err(ClientError::from)?)
    }
}

impl ChainClient for RpcClient {
    async fn chain_id(&self) -> Result<u64, ClientError> {
        Ok(self.provider.get_chain_id().await?)
    }

    async fn pending_nonce(&self, address: Address) -> Result<u64, ClientError> {
        Ok(self.provider.get_transaction_count(address).pending().await?)
    }

    async fn fee_estimate(&self) -> Result<FeeEstimate, ClientError> {
        let estimate = self.provider.estimate_eip1559_fees().await?;
        Ok(FeeEstimate {
            max_fee_per_gas: estimate.max_fee_per_gas,
            max_priority_fee_per_gas: estimate.max_priority_fee_per_gas,
        })
    }

    async fn estimate_gas(&self, call: &CallRequest) -> Result<u64, ClientError> {
        let request = TransactionRequest::default()
            .with_from(call.from)
            .with_to(call.to)
            .with_value(call.value)
            .with_input(call.data.clone());
        Ok(self.provider.estimate_gas(request).await?)
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<TxHash, ClientError> {
        let pending = self.provider.send_raw_transaction(raw).await?;
        Ok(*pending.tx_hash())
    }
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("chain_id", &self.chain_id)
            .finish_non_exhaustive()
    }
}
