//! Transfer submission: resolve nonce, fees and gas, sign, broadcast.
//!
//! A transfer moves through [`TransferStage::Building`], local signing and
//! [`TransferStage::Submitting`]. The first failure is terminal. Client
//! failures are reported with the stage they happened in; a signing failure is
//! [`Error::Signature`]. Nothing is retried.

use core::fmt;
use std::future::Future;
use std::time::Duration;

use alloy_primitives::{Address, U256};
use tokio::time::{Instant, timeout_at};
use tracing::{debug, info, warn};

use crate::account::Account;
use crate::client::{CallRequest, ChainClient, ClientError, FeeEstimate, TxHash};
use crate::error::{Error, Result};
use crate::intent::TransferIntent;
use crate::transaction::Eip1559Transaction;

/// Default bound on the network round-trips of one transfer.
pub const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(60);

/// Where a transfer was when it finished or failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransferStage {
    /// Resolving nonce, fees and gas limit.
    Building,
    /// Broadcasting the raw transaction.
    Submitting,
}

impl fmt::Display for TransferStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Building => "building",
            Self::Submitting => "submitting",
        })
    }
}

/// Per-submitter overrides. `None` fields are asked from the chain client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmitOptions {
    /// Deadline for all network calls of one transfer.
    pub timeout: Duration,
    /// Fixed nonce instead of the pending transaction count.
    pub nonce: Option<u64>,
    /// Fixed gas limit instead of the client's estimate.
    pub gas_limit: Option<u64>,
    /// Fixed max fee per gas.
    pub max_fee_per_gas: Option<u128>,
    /// Fixed max priority fee per gas.
    pub max_priority_fee_per_gas: Option<u128>,
}

impl Default for SubmitOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_SUBMIT_TIMEOUT,
            nonce: None,
            gas_limit: None,
            max_fee_per_gas: None,
            max_priority_fee_per_gas: None,
        }
    }
}

/// Builds, signs and submits transfers on one chain.
///
/// Holds no per-account state, so one submitter can serve many accounts
/// concurrently. Transfers from the same account must be serialized by the
/// caller unless [`SubmitOptions::nonce`] is managed explicitly.
#[derive(Clone, Debug)]
pub struct Submitter<C> {
    client: C,
    chain_id: u64,
    options: SubmitOptions,
}

impl<C: ChainClient> Submitter<C> {
    /// Submitter for `chain_id` with default options.
    pub fn new(client: C, chain_id: u64) -> Self {
        Self {
            client,
            chain_id,
            options: SubmitOptions::default(),
        }
    }

    /// Replace the submit options.
    #[must_use]
    pub fn with_options(mut self, options: SubmitOptions) -> Self {
        self.options = options;
        self
    }

    /// The chain id embedded in every signed transaction.
    #[inline]
    pub const fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// The active options.
    #[inline]
    pub const fn options(&self) -> &SubmitOptions {
        &self.options
    }

    /// The underlying chain client.
    #[inline]
    pub const fn client(&self) -> &C {
        &self.client
    }

    /// Send `amount` wei from `account` to `to`.
    pub async fn transfer_native(
        &self,
        account: &Account,
        to: Address,
        amount: U256,
    ) -> Result<TxHash> {
        self.submit(&TransferIntent::native(to, amount), account).await
    }

    /// Call `token.transfer(to, amount)` from `account`.
    pub async fn transfer_token(
        &self,
        account: &Account,
        token: Address,
        to: Address,
        amount: U256,
    ) -> Result<TxHash> {
        self.submit(&TransferIntent::token(token, to, amount), account)
            .await
    }

    /// Build, sign and broadcast `intent` from `account`.
    ///
    /// Returns the transaction hash once the node has accepted the
    /// transaction. Acceptance is not inclusion.
    ///
    /// # Errors
    ///
    /// Any chain client failure, including the deadline passing, is returned
    /// as [`Error::Submission`] with the stage it happened in.
    pub async fn submit(&self, intent: &TransferIntent, account: &Account) -> Result<TxHash> {
        // A timeout too large to represent means no deadline.
        let deadline = Instant::now().checked_add(self.options.timeout);
        let from = account.address();

        let tx = self.build(intent, from, deadline).await?;
        let nonce = tx.nonce;

        let signed = tx.sign(account)?;
        let raw = signed.encoded();
        debug!(address = %from, nonce = nonce, size = raw.len(), "signed transaction");

        let tx_hash = within(
            deadline,
            TransferStage::Submitting,
            self.client.send_raw_transaction(&raw),
        )
        .await?;

        info!(
            address = %from,
            chain_id = self.chain_id,
            nonce = nonce,
            tx_hash = %tx_hash,
            "transaction accepted"
        );
        Ok(tx_hash)
    }

    async fn build(
        &self,
        intent: &TransferIntent,
        from: Address,
        deadline: Option<Instant>,
    ) -> Result<Eip1559Transaction> {
        let stage = TransferStage::Building;

        let nonce = match self.options.nonce {
            Some(nonce) => nonce,
            None => within(deadline, stage, self.client.pending_nonce(from)).await?,
        };

        let fees = match (
            self.options.max_fee_per_gas,
            self.options.max_priority_fee_per_gas,
        ) {
            (Some(max_fee_per_gas), Some(max_priority_fee_per_gas)) => FeeEstimate {
                max_fee_per_gas,
                max_priority_fee_per_gas,
            },
            (max_fee, tip) => {
                let estimate = within(deadline, stage, self.client.fee_estimate()).await?;
                FeeEstimate {
                    max_fee_per_gas: max_fee.unwrap_or(estimate.max_fee_per_gas),
                    max_priority_fee_per_gas: tip.unwrap_or(estimate.max_priority_fee_per_gas),
                }
            }
        };
        // The tip can never exceed the fee cap.
        let max_priority_fee_per_gas = fees.max_priority_fee_per_gas.min(fees.max_fee_per_gas);

        let call = CallRequest {
            from,
            to: intent.tx_to(),
            value: intent.tx_value(),
            data: intent.call_data(),
        };
        let gas_limit = match self.options.gas_limit {
            Some(gas) => gas,
            None => within(deadline, stage, self.client.estimate_gas(&call)).await?,
        };

        debug!(
            address = %from,
            nonce = nonce,
            gas_limit = gas_limit,
            max_fee_per_gas = fees.max_fee_per_gas,
            max_priority_fee_per_gas = max_priority_fee_per_gas,
            "resolved transaction parameters"
        );

        Ok(Eip1559Transaction {
            chain_id: self.chain_id,
            nonce,
            max_priority_fee_per_gas,
            max_fee_per_gas: fees.max_fee_per_gas,
            gas_limit,
            to: call.to,
            value: call.value,
            data: call.data,
        })
    }
}

/// Await a client call, mapping failures and the deadline to
/// [`Error::Submission`].
async fn within<T>(
    deadline: Option<Instant>,
    stage: TransferStage,
    call: impl Future<Output = Result<T, ClientError>>,
) -> Result<T> {
    let outcome = match deadline {
        Some(deadline) => timeout_at(deadline, call).await,
        None => Ok(call.await),
    };
    let cause = match outcome {
        Ok(Ok(value)) => return Ok(value),
        Ok(Err(cause)) => cause,
        Err(_) => ClientError::Timeout,
    };
    warn!(stage = %stage, error = %cause, "transfer failed");
    Err(Error::Submission { stage, cause })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use alloy_primitives::keccak256;
    use hex_literal::hex;

    use super::*;

    const KEY: [u8; 32] = hex!("4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318");

    #[derive(Default)]
    struct StubClient {
        nonce: u64,
        gas: u64,
        fail_send: Option<ClientError>,
        stall: Option<Duration>,
        calls: AtomicUsize,
        sent: Mutex<Vec<Vec<u8>>>,
    }

    impl StubClient {
        fn new() -> Self {
            Self {
                nonce: 3,
                gas: 21_000,
                ..Self::default()
            }
        }

        async fn tick(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(stall) = self.stall {
                tokio::time::sleep(stall).await;
            }
        }
    }

    impl ChainClient for StubClient {
        async fn chain_id(&self) -> Result<u64, ClientError> {
            Ok(1)
        }

        async fn pending_nonce(&self, _address: Address) -> Result<u64, ClientError> {
            self.tick().await;
            Ok(self.nonce)
        }

        async fn fee_estimate(&self) -> Result<FeeEstimate, ClientError> {
            self.tick().await;
            Ok(FeeEstimate {
                max_fee_per_gas: 20,
                max_priority_fee_per_gas: 2,
            })
        }

        async fn estimate_gas(&self, _call: &CallRequest) -> Result<u64, ClientError> {
            self.tick().await;
            Ok(self.gas)
        }

        async fn send_raw_transaction(&self, raw: &[u8]) -> Result<TxHash, ClientError> {
            self.tick().await;
            if let Some(err) = &self.fail_send {
                return Err(err.clone());
            }
            self.sent.lock().unwrap().push(raw.to_vec());
            Ok(keccak256(raw))
        }
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(TransferStage::Building.to_string(), "building");
        assert_eq!(TransferStage::Submitting.to_string(), "submitting");
    }

    #[tokio::test]
    async fn test_submit_uses_client_values() {
        let account = Account::from_private_key(&KEY).unwrap();
        let submitter = Submitter::new(StubClient::new(), 5);
        let to = Address::repeat_byte(0x44);

        let hash = submitter
            .transfer_native(&account, to, U256::from(1u8))
            .await
            .unwrap();

        let sent = submitter.client().sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(hash, keccak256(&sent[0]));

        let expected = Eip1559Transaction {
            chain_id: 5,
            nonce: 3,
            max_priority_fee_per_gas: 2,
            max_fee_per_gas: 20,
            gas_limit: 21_000,
            to,
            value: U256::from(1u8),
            data: Default::default(),
        }
        .sign(&account)
        .unwrap();
        assert_eq!(sent[0], expected.encoded());
    }

    #[tokio::test]
    async fn test_overrides_skip_client_calls() {
        let account = Account::from_private_key(&KEY).unwrap();
        let options = SubmitOptions {
            nonce: Some(9),
            gas_limit: Some(50_000),
            max_fee_per_gas: Some(100),
            max_priority_fee_per_gas: Some(200),
            ..SubmitOptions::default()
        };
        let submitter = Submitter::new(StubClient::new(), 5).with_options(options);

        submitter
            .transfer_token(
                &account,
                Address::repeat_byte(0x11),
                Address::repeat_byte(0x22),
                U256::from(7u8),
            )
            .await
            .unwrap();

        // Only the broadcast reached the client.
        assert_eq!(submitter.client().calls.load(Ordering::SeqCst), 1);

        let sent = submitter.client().sent.lock().unwrap();
        let expected = Eip1559Transaction {
            chain_id: 5,
            nonce: 9,
            max_priority_fee_per_gas: 100,
            max_fee_per_gas: 100,
            gas_limit: 50_000,
            to: Address::repeat_byte(0x11),
            value: U256::ZERO,
            data: crate::abi::encode_transfer(Address::repeat_byte(0x22), U256::from(7u8)),
        }
        .sign(&account)
        .unwrap();
        assert_eq!(sent[0], expected.encoded());
    }

    #[tokio::test]
    async fn test_send_failure_reports_stage() {
        let account = Account::from_private_key(&KEY).unwrap();
        let client = StubClient {
            fail_send: Some(ClientError::InsufficientFunds("balance 0".into())),
            ..StubClient::new()
        };
        let submitter = Submitter::new(client, 5);

        let err = submitter
            .transfer_native(&account, Address::ZERO, U256::from(1u8))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Submission {
                stage: TransferStage::Submitting,
                cause: ClientError::InsufficientFunds(_)
            }
        ));
    }

    #[tokio::test]
    async fn test_unbounded_timeout_does_not_overflow() {
        let account = Account::from_private_key(&KEY).unwrap();
        let options = SubmitOptions {
            timeout: Duration::MAX,
            ..SubmitOptions::default()
        };
        let submitter = Submitter::new(StubClient::new(), 5).with_options(options);

        submitter
            .transfer_native(&account, Address::ZERO, U256::from(1u8))
            .await
            .unwrap();
        assert_eq!(submitter.client().sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_deadline_becomes_timeout() {
        let account = Account::from_private_key(&KEY).unwrap();
        let client = StubClient {
            stall: Some(Duration::from_secs(30)),
            ..StubClient::new()
        };
        let options = SubmitOptions {
            timeout: Duration::from_millis(20),
            ..SubmitOptions::default()
        };
        let submitter = Submitter::new(client, 5).with_options(options);

        let err = submitter
            .transfer_native(&account, Address::ZERO, U256::from(1u8))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Submission {
                stage: TransferStage::Building,
                cause: ClientError::Timeout
            }
        ));
        assert!(submitter.client().sent.lock().unwrap().is_empty());
    }
}
