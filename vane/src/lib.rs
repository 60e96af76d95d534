//! # Vane - HD Wallet Core
//!
//! Chain-agnostic building blocks for deriving signing keys from a BIP-39
//! seed phrase.
//!
//! ## Features
//!
//! - **BIP-39**: phrase generation, validation, prefix expansion and seed
//!   derivation
//! - **BIP-32**: extended private keys with strict invalid-key handling
//! - **Amounts**: exact decimal parsing and formatting of base units
//! - **Zeroized secrets**: seeds and private keys are wiped on drop
//!
//! ## Example
//!
//! ```
//! use vane::{DerivationPath, ExtendedPrivateKey, Wallet};
//!
//! let wallet = Wallet::from_mnemonic(
//!     "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about",
//!     None,
//! )
//! .unwrap();
//!
//! let path: DerivationPath = "m/44'/60'/0'/0/0".parse().unwrap();
//! let leaf = ExtendedPrivateKey::from_seed(wallet.seed())
//!     .and_then(|master| master.derive_path(&path))
//!     .unwrap();
//! assert_eq!(leaf.depth(), 5);
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
    clippy::similar_names,
    clippy::option_if_let_else,
    clippy::missing_fields_in_debug
)]
#![forbid(unsafe_code)]

pub mod amount;
pub mod encoding;
pub mod error;
pub mod extended_key;
pub mod hash;
pub mod hdpath;
pub mod mnemonic;
mod wallet;

pub use amount::{format_units, parse_units};
pub use error::{Error, Result};
pub use extended_key::ExtendedPrivateKey;
pub use hdpath::{ChildIndex, DerivationPath};
pub use wallet::Wallet;

// Re-exported so downstream crates share a single BIP-39 version.
pub use bip39::{Language, Mnemonic};
