//! Error types for EVM accounts, configuration and transfer submission.

use thiserror::Error;

use crate::client::ClientError;
use crate::submit::TransferStage;

/// Errors that can occur in the EVM layer.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Mnemonic, derivation path, BIP-32 or amount error from the core crate.
    #[error(transparent)]
    Core(#[from] vane::Error),

    /// Private key bytes are not a valid non-zero secp256k1 scalar.
    #[error("invalid private key")]
    InvalidKey,

    /// Malformed address or failed EIP-55 checksum.
    #[error("invalid address \"{0}\"")]
    InvalidAddress(String),

    /// ECDSA signing or public key recovery failed.
    #[error("signature error: {0}")]
    Signature(String),

    /// A chain client call failed while a transfer was in flight.
    #[error("transfer failed while {stage}: {cause}")]
    Submission {
        /// Stage the transfer had reached.
        stage: TransferStage,
        /// What the chain client reported.
        cause: ClientError,
    },

    /// A chain client call failed outside of a transfer.
    #[error("rpc error: {0}")]
    Rpc(#[from] ClientError),

    /// The endpoint serves a different chain than configured.
    #[error("chain id mismatch: configured {expected}, endpoint reports {actual}")]
    ChainMismatch {
        /// Chain id from the network configuration.
        expected: u64,
        /// Chain id reported by the endpoint.
        actual: u64,
    },

    /// Invalid or unreadable network configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// The underlying chain client failure, if any.
    pub const fn client_error(&self) -> Option<&ClientError> {
        match self {
            Self::Submission { cause, .. } | Self::Rpc(cause) => Some(cause),
            _ => None,
        }
    }
}

/// A convenient Result type alias for vane-evm operations.
pub type Result<T, E = Error> = core::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected() -> Result<u64, ClientError> {
        Err(ClientError::Rejected("bad".into()))
    }

    #[test]
    fn test_result_alias_accepts_client_error() {
        let err: Result<u64> = rejected().map_err(Error::from);
        assert!(matches!(
            err.unwrap_err().client_error(),
            Some(ClientError::Rejected(_))
        ));
    }

    #[test]
    fn test_submission_display_names_stage() {
        let err = Error::Submission {
            stage: TransferStage::Submitting,
            cause: ClientError::Timeout,
        };
        assert!(err.to_string().starts_with("transfer failed while submitting"));
        assert!(Error::InvalidKey.client_error().is_none());
    }
}
