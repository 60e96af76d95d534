//! EVM accounts and transfers for vane.
//!
//! Turns keys derived by [`vane::Wallet`] into signing accounts and submits
//! native and ERC-20 transfers as EIP-1559 transactions through a
//! [`ChainClient`].
//!
//! # Usage
//!
//! ```
//! use vane::Wallet;
//! use vane_evm::Deriver;
//!
//! let wallet = Wallet::from_mnemonic(
//!     "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about",
//!     None
//! ).unwrap();
//!
//! let derived = Deriver::new(&wallet).derive(0, false, 0).unwrap();
//! assert_eq!(
//!     derived.account.checksum_address(),
//!     "0x9858EfFD232B4033E47d90003D41EC34EcaEda94"
//! );
//! ```
//!
//! Submitting needs a connected client:
//!
//! ```no_run
//! # async fn demo() -> vane_evm::Result<()> {
//! use vane_evm::{NetworkConfig, RpcClient, Submitter, derive_wallet};
//!
//! let config = NetworkConfig::sepolia();
//! let sender = derive_wallet(Some("..."), None, &config.derivation_path()?)?;
//! let client = RpcClient::connect(&config).await?;
//! let submitter = Submitter::new(client, config.chain_id);
//!
//! let to = vane_evm::address::parse("0xbb6d7ADBBbb75006957351835a2EEA5858cA0413")?;
//! let hash = submitter
//!     .transfer_native(sender.account(), to, vane::parse_units("0.01", 18)?)
//!     .await?;
//! println!("{hash}");
//! # Ok(())
//! # }
//! ```

#![warn(
    missing_docs,
    rust_2018_idioms,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::doc_markdown,
    clippy::missing_const_for_fn,
    clippy::uninlined_format_args,
    clippy::return_self_not_must_use,
    clippy::cast_possible_truncation,
    clippy::missing_fields_in_debug,
    clippy::future_not_send
)]
#![forbid(unsafe_code)]

pub mod abi;
mod account;
pub mod address;
pub mod client;
pub mod config;
mod deriver;
mod error;
mod intent;
mod signature;
pub mod submit;
pub mod transaction;

pub use account::Account;
pub use client::{CallRequest, ChainClient, ClientError, FeeEstimate, RpcClient, TxHash};
pub use config::{NetworkConfig, TokenConfig};
pub use deriver::{DerivedAccount, DerivedWallet, Deriver, derive_wallet};
pub use error::{Error, Result};
pub use intent::TransferIntent;
pub use signature::Signature;
pub use submit::{SubmitOptions, Submitter, TransferStage};
pub use transaction::{Eip1559Transaction, SignedTransaction};
