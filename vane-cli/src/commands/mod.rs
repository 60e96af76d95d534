//! CLI command definitions and handlers.

mod balance;
mod transfer;
mod wallet;

use std::path::PathBuf;

pub use balance::BalanceCommand;
use clap::{Args, Parser, Subcommand};
pub use transfer::{SendCommand, SendTokenCommand};
use vane::DerivationPath;
use vane_evm::{DerivedWallet, NetworkConfig};
pub use wallet::WalletCommand;

/// Vane - an HD wallet for native and ERC-20 transfers on EVM chains.
#[derive(Parser)]
#[command(name = "vane")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub network: NetworkArgs,

    /// Verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Create, import or inspect an HD wallet.
    Wallet(WalletCommand),

    /// Send native currency.
    Send(SendCommand),

    /// Send an ERC-20 token.
    #[command(name = "send-token")]
    SendToken(SendTokenCommand),

    /// Show native and token balances.
    Balance(BalanceCommand),
}

/// Network selection shared by all commands.
#[derive(Args)]
pub struct NetworkArgs {
    /// JSON network configuration file (defaults to the Sepolia preset).
    #[arg(long, global = true, env = "VANE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the configured RPC endpoint.
    #[arg(long, global = true, env = "VANE_RPC_URL")]
    pub rpc_url: Option<String>,

    /// Override the configured chain id.
    #[arg(long, global = true)]
    pub chain_id: Option<u64>,
}

impl NetworkArgs {
    /// Load the configuration file or preset and apply the overrides.
    pub fn resolve(&self) -> vane_evm::Result<NetworkConfig> {
        let mut config = match &self.config {
            Some(path) => NetworkConfig::from_file(path)?,
            None => NetworkConfig::sepolia(),
        };
        if let Some(rpc_url) = &self.rpc_url {
            config.rpc_url.clone_from(rpc_url);
        }
        if let Some(chain_id) = self.chain_id {
            config.chain_id = chain_id;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Where the signing key comes from.
#[derive(Args)]
pub struct KeyArgs {
    /// BIP-39 phrase; unique 4-letter prefixes are expanded.
    #[arg(short, long, env = "VANE_MNEMONIC", hide_env_values = true)]
    pub mnemonic: String,

    /// BIP-39 passphrase, if one was used when creating the wallet.
    #[arg(short, long, env = "VANE_PASSPHRASE", hide_env_values = true)]
    pub passphrase: Option<String>,

    /// Derivation path (defaults to the network's configured path).
    #[arg(long)]
    pub path: Option<String>,
}

impl KeyArgs {
    /// Restore the wallet and derive the signing account.
    pub fn derive(&self, config: &NetworkConfig) -> vane_evm::Result<DerivedWallet> {
        let path: DerivationPath = match &self.path {
            Some(path) => path.parse()?,
            None => config.derivation_path()?,
        };
        let phrase = vane::mnemonic::expand(&self.mnemonic)?;
        vane_evm::derive_wallet(Some(&phrase), self.passphrase.as_deref(), &path)
    }
}
