//! Transfer CLI commands.

use clap::Args;
use colored::Colorize;
use alloy_primitives::Address;
use tracing::{info, warn};
use vane::amount::ETHER_DECIMALS;
use vane_evm::{
    NetworkConfig, RpcClient, SubmitOptions, Submitter, TransferIntent, TxHash, address,
};

use super::{KeyArgs, NetworkArgs};

/// Overrides for values normally asked from the node.
#[derive(Args)]
pub struct SubmitArgs {
    /// Use this nonce instead of the pending transaction count.
    #[arg(long)]
    nonce: Option<u64>,

    /// Use this gas limit instead of the node's estimate.
    #[arg(long)]
    gas_limit: Option<u64>,
}

impl SubmitArgs {
    fn options(&self, config: &NetworkConfig) -> SubmitOptions {
        SubmitOptions {
            timeout: config.submit_timeout(),
            nonce: self.nonce,
            gas_limit: self.gas_limit,
            ..SubmitOptions::default()
        }
    }
}

/// Send native currency to an address.
#[derive(Args)]
pub struct SendCommand {
    #[command(flatten)]
    key: KeyArgs,

    /// Recipient address.
    #[arg(long)]
    to: String,

    /// Amount in ether, e.g. `0.01`.
    #[arg(long)]
    amount: String,

    #[command(flatten)]
    submit: SubmitArgs,
}

impl SendCommand {
    /// Execute the send command.
    pub async fn execute(self, network: &NetworkArgs) -> Result<(), Box<dyn std::error::Error>> {
        let config = network.resolve()?;
        let sender = self.key.derive(&config)?;
        let to = address::parse(&self.to)?;
        let amount = vane::parse_units(&self.amount, ETHER_DECIMALS)?;

        let client = RpcClient::connect(&config).await?;
        let submitter = Submitter::new(client, config.chain_id).with_options(self.submit.options(&config));

        let intent = TransferIntent::native(to, amount);
        info!(intent = %intent, "submitting transfer");
        let tx_hash = submitter.submit(&intent, sender.account()).await?;

        print_transfer(
            &config,
            &sender.account().checksum_address(),
            &intent,
            &format!("{} ETH", vane::format_units(amount, ETHER_DECIMALS)),
            &tx_hash,
        );
        Ok(())
    }
}

/// Send an ERC-20 token to an address.
#[derive(Args)]
pub struct SendTokenCommand {
    #[command(flatten)]
    key: KeyArgs,

    /// Token symbol from the network configuration, or a contract address.
    #[arg(long)]
    token: String,

    /// Decimals of the token; read from the contract when omitted.
    #[arg(long)]
    decimals: Option<u8>,

    /// Recipient address.
    #[arg(long)]
    to: String,

    /// Amount in whole tokens, e.g. `0.1`.
    #[arg(long)]
    amount: String,

    #[command(flatten)]
    submit: SubmitArgs,
}

impl SendTokenCommand {
    /// Execute the send-token command.
    pub async fn execute(self, network: &NetworkArgs) -> Result<(), Box<dyn std::error::Error>> {
        let config = network.resolve()?;
        let token = TokenArg::resolve(&config, &self.token, self.decimals)?;
        let sender = self.key.derive(&config)?;
        let to = address::parse(&self.to)?;

        let client = RpcClient::connect(&config).await?;
        let (decimals, symbol) = tokio::join!(token.decimals(&client), token.symbol(&client));
        let decimals = decimals?;
        let amount = vane::parse_units(&self.amount, decimals)?;

        let submitter = Submitter::new(client, config.chain_id).with_options(self.submit.options(&config));

        let intent = TransferIntent::token(token.address, to, amount);
        info!(intent = %intent, "submitting transfer");
        let tx_hash = submitter.submit(&intent, sender.account()).await?;

        print_transfer(
            &config,
            &sender.account().checksum_address(),
            &intent,
            &format!("{} {}", vane::format_units(amount, decimals), symbol),
            &tx_hash,
        );
        Ok(())
    }
}

/// A token named on the command line, resolved against the network
/// configuration but not yet against the chain.
pub(super) struct TokenArg {
    pub(super) address: Address,
    decimals: Option<u8>,
    name: String,
}

impl TokenArg {
    /// Look `token` up by symbol, falling back to a literal contract address.
    pub(super) fn resolve(
        config: &NetworkConfig,
        token: &str,
        decimals: Option<u8>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        if let Some(known) = config.token(token) {
            return Ok(Self {
                address: known.address,
                decimals: Some(decimals.unwrap_or(known.decimals)),
                name: token.to_ascii_uppercase(),
            });
        }
        let address = address::parse(token).map_err(|_| {
            format!("token \"{token}\" is neither configured for {} nor a contract address", config.name)
        })?;
        Ok(Self {
            address,
            decimals,
            name: address::to_checksum(&address),
        })
    }

    /// Known decimals, else `decimals()` of the contract.
    pub(super) async fn decimals(&self, client: &RpcClient) -> vane_evm::Result<u8> {
        match self.decimals {
            Some(decimals) => Ok(decimals),
            None => client.token_decimals(self.address).await,
        }
    }

    /// `symbol()` of the contract, else the configured name or address.
    pub(super) async fn symbol(&self, client: &RpcClient) -> String {
        match client.token_symbol(self.address).await {
            Ok(symbol) if !symbol.is_empty() => symbol,
            Ok(_) => self.name.clone(),
            Err(err) => {
                warn!(token = %self.address, error = %err, "symbol lookup failed");
                self.name.clone()
            }
        }
    }
}

#[rustfmt::skip]
fn print_transfer(
    config: &NetworkConfig,
    from: &str,
    intent: &TransferIntent,
    amount: &str,
    tx_hash: &TxHash,
) {
    println!();
    println!("      {}      {} ({})", "Network".cyan().bold(), config.name, config.chain_id);
    println!("      {}         {}", "From".cyan().bold(), from);
    println!("      {}           {}", "To".cyan().bold(), address::to_checksum(&intent.recipient()));
    if let TransferIntent::Token { token, .. } = intent {
        println!("      {}        {}", "Token".cyan().bold(), address::to_checksum(token).dimmed());
    }
    println!("      {}       {}", "Amount".cyan().bold(), amount);
    println!("      {}      {}", "Tx Hash".cyan().bold(), tx_hash.to_string().green());
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_configured_symbol() {
        let config = NetworkConfig::sepolia();
        let token = TokenArg::resolve(&config, "usdc", None).unwrap();
        assert_eq!(token.decimals, Some(6));
        assert_eq!(token.name, "USDC");
        assert_eq!(token.address, config.token("USDC").unwrap().address);

        let token = TokenArg::resolve(&config, "usdc", Some(18)).unwrap();
        assert_eq!(token.decimals, Some(18));
    }

    #[test]
    fn test_resolve_literal_address_defers_decimals() {
        let config = NetworkConfig::sepolia();
        let literal = "0x1c7D4B196Cb0C7B01d743Fbc6116a902379C7238";

        let token = TokenArg::resolve(&config, literal, None).unwrap();
        assert_eq!(token.decimals, None);
        assert_eq!(token.name, literal);

        assert_eq!(TokenArg::resolve(&config, literal, Some(18)).unwrap().decimals, Some(18));
        assert!(TokenArg::resolve(&config, "DAI", Some(18)).is_err());
    }
}
