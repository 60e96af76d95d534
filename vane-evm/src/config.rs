//! Network configuration: chain id, RPC endpoint, derivation path and tokens.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use alloy_primitives::{Address, address};
use serde::{Deserialize, Serialize};
use tracing::debug;
use vane::DerivationPath;

use crate::error::{Error, Result};

/// Default account path: first external address of account 0.
pub const DEFAULT_DERIVATION_PATH: &str = "m/44'/60'/0'/0/0";

/// Sepolia chain id.
pub const SEPOLIA_CHAIN_ID: u64 = 11_155_111;

const DEFAULT_SUBMIT_TIMEOUT_SECS: u64 = 60;

/// Upper bound accepted for `submit_timeout_secs`.
pub const MAX_SUBMIT_TIMEOUT_SECS: u64 = 3_600;

/// An ERC-20 token known to the network configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Contract address.
    pub address: Address,
    /// Decimal places of one whole token.
    pub decimals: u8,
}

/// One EVM network the wallet transacts on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Display name.
    pub name: String,
    /// Chain id signed into every transaction.
    pub chain_id: u64,
    /// JSON-RPC HTTP endpoint.
    pub rpc_url: String,
    /// BIP-32 path of the signing account.
    #[serde(default = "default_derivation_path")]
    pub derivation_path: String,
    /// Bound on the network round-trips of one transfer, in seconds.
    #[serde(default = "default_submit_timeout_secs")]
    pub submit_timeout_secs: u64,
    /// Known tokens by symbol.
    #[serde(default)]
    pub tokens: BTreeMap<String, TokenConfig>,
}

fn default_derivation_path() -> String {
    DEFAULT_DERIVATION_PATH.to_owned()
}

const fn default_submit_timeout_secs() -> u64 {
    DEFAULT_SUBMIT_TIMEOUT_SECS
}

impl NetworkConfig {
    /// Sepolia testnet with the Circle USDC and EURC test tokens.
    pub fn sepolia() -> Self {
        let mut tokens = BTreeMap::new();
        tokens.insert(
            "USDC".to_owned(),
            TokenConfig {
                address: address!("1c7D4B196Cb0C7B01d743Fbc6116a902379C7238"),
                decimals: 6,
            },
        );
        tokens.insert(
            "EURC".to_owned(),
            TokenConfig {
                address: address!("08210F9170F89Ab7658F0B5E3fF39b0E03C594D4"),
                decimals: 6,
            },
        );

        Self {
            name: "sepolia".to_owned(),
            chain_id: SEPOLIA_CHAIN_ID,
            rpc_url: "https://sepolia.drpc.org".to_owned(),
            derivation_path: default_derivation_path(),
            submit_timeout_secs: DEFAULT_SUBMIT_TIMEOUT_SECS,
            tokens,
        }
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        let config = Self::from_json(&json)?;
        debug!(path = %path.display(), network = %config.name, "loaded network config");
        Ok(config)
    }

    /// Check the values a transfer depends on.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for a zero chain id, a non-HTTP endpoint, a
    /// timeout outside `1..=MAX_SUBMIT_TIMEOUT_SECS` or duplicate token symbols, and [`Error::Core`] for an
    /// unparsable derivation path.
    pub fn validate(&self) -> Result<()> {
        if self.chain_id == 0 {
            return Err(Error::Config("chain_id must be non-zero".into()));
        }
        if !(self.rpc_url.starts_with("http://") || self.rpc_url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "rpc_url must be an http(s) URL, got \"{}\"",
                self.rpc_url
            )));
        }
        if self.submit_timeout_secs == 0 {
            return Err(Error::Config("submit_timeout_secs must be non-zero".into()));
        }
        if self.submit_timeout_secs > MAX_SUBMIT_TIMEOUT_SECS {
            return Err(Error::Config(format!(
                "submit_timeout_secs must be at most {MAX_SUBMIT_TIMEOUT_SECS}"
            )));
        }
        self.derivation_path()?;

        let mut seen = Vec::with_capacity(self.tokens.len());
        for symbol in self.tokens.keys() {
            let upper = symbol.to_ascii_uppercase();
            if seen.contains(&upper) {
                return Err(Error::Config(format!("duplicate token symbol \"{symbol}\"")));
            }
            seen.push(upper);
        }
        Ok(())
    }

    /// The parsed derivation path.
    pub fn derivation_path(&self) -> Result<DerivationPath> {
        Ok(self.derivation_path.parse()?)
    }

    /// Transfer deadline.
    pub const fn submit_timeout(&self) -> Duration {
        Duration::from_secs(self.submit_timeout_secs)
    }

    /// Look up a token by symbol, ignoring case.
    pub fn token(&self, symbol: &str) -> Option<&TokenConfig> {
        self.tokens
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(symbol))
            .map(|(_, token)| token)
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self::sepolia()
    }
}
