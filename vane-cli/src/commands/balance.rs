//! Balance CLI command.

use std::future::Future;

use clap::Args;
use colored::Colorize;
use futures::future::try_join_all;
use vane::amount::ETHER_DECIMALS;
use vane_evm::{RpcClient, address};

use super::NetworkArgs;
use super::transfer::TokenArg;

/// Show native and token balances of an address.
#[derive(Args)]
pub struct BalanceCommand {
    /// Address to query.
    #[arg(long)]
    address: String,

    /// Only query these tokens (symbols or contract addresses); defaults to
    /// every configured token.
    #[arg(long = "token")]
    tokens: Vec<String>,

    /// Decimals for tokens given as contract addresses; read from the
    /// contract when omitted.
    #[arg(long)]
    decimals: Option<u8>,
}

impl BalanceCommand {
    /// Execute the balance command.
    #[rustfmt::skip]
    pub async fn execute(self, network: &NetworkArgs) -> Result<(), Box<dyn std::error::Error>> {
        let config = network.resolve()?;
        let owner = address::parse(&self.address)?;

        let names: Vec<String> = if self.tokens.is_empty() {
            config.tokens.keys().cloned().collect()
        } else {
            self.tokens
        };
        let tokens = names
            .iter()
            .map(|name| TokenArg::resolve(&config, name, self.decimals))
            .collect::<Result<Vec<_>, _>>()?;

        let client = RpcClient::connect(&config).await?;

        let client = &client;
        let rows = lookup_all(&tokens, |token| async move {
            let (balance, decimals, symbol) = tokio::join!(
                client.token_balance(token.address, owner),
                token.decimals(client),
                token.symbol(client),
            );
            Ok::<_, vane_evm::Error>((balance?, decimals?, symbol))
        });
        let (native, rows) = tokio::try_join!(client.balance(owner), rows)?;

        println!();
        println!("      {}      {} ({})", "Network".cyan().bold(), config.name, config.chain_id);
        println!("      {}      {}", "Address".cyan().bold(), address::to_checksum(&owner).green());
        println!("      {}      {} ETH", "Balance".cyan().bold(), vane::format_units(native, ETHER_DECIMALS));
        for (balance, decimals, symbol) in rows {
            println!("      {}      {} {}", "Balance".cyan().bold(), vane::format_units(balance, decimals), symbol);
        }
        println!();
        Ok(())
    }
}

/// Run `lookup` for every item at once, keeping input order. The first error
/// wins.
async fn lookup_all<'a, T, R, E, Fut>(
    items: &'a [T],
    lookup: impl FnMut(&'a T) -> Fut,
) -> Result<Vec<R>, E>
where
    Fut: Future<Output = Result<R, E>>,
{
    try_join_all(items.iter().map(lookup)).await
}
