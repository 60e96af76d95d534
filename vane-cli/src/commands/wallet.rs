//! Wallet CLI commands.

use clap::{Args, Subcommand};
use colored::Colorize;
use vane::{DerivationPath, ExtendedPrivateKey, Wallet};
use vane_evm::{DerivedWallet, Deriver};

use super::{KeyArgs, NetworkArgs};

/// HD wallet operations.
#[derive(Args)]
pub struct WalletCommand {
    #[command(subcommand)]
    command: WalletSubcommand,
}

#[derive(Subcommand)]
enum WalletSubcommand {
    /// Generate a new wallet (with mnemonic).
    New {
        /// Number of mnemonic words (12, 15, 18, 21, or 24).
        #[arg(short, long, default_value = "12")]
        words: usize,

        /// BIP39 passphrase (optional extra security).
        #[arg(short, long)]
        passphrase: Option<String>,

        /// Derivation path (defaults to the network's configured path).
        #[arg(long)]
        path: Option<String>,
    },

    /// Import a wallet from its mnemonic phrase.
    Import {
        #[command(flatten)]
        key: KeyArgs,
    },

    /// Show the derivation of a wallet's account.
    Show {
        #[command(flatten)]
        key: KeyArgs,

        /// Also print master and leaf private keys and xprv strings.
        #[arg(long)]
        reveal: bool,
    },
}

impl WalletCommand {
    /// Execute the wallet command.
    pub fn execute(self, network: &NetworkArgs) -> Result<(), Box<dyn std::error::Error>> {
        let config = network.resolve()?;
        match self.command {
            WalletSubcommand::New {
                words,
                passphrase,
                path,
            } => {
                let path: DerivationPath = match path {
                    Some(path) => path.parse()?,
                    None => config.derivation_path()?,
                };
                let wallet = Wallet::generate(words, passphrase.as_deref())?;
                let master_key = wallet.master_key()?;
                let derived = Deriver::new(&wallet).derive_at_path(&path)?;
                print_wallet(&DerivedWallet {
                    wallet,
                    master_key,
                    derived,
                });
            }
            WalletSubcommand::Import { key } => {
                let derived = key.derive(&config)?;
                print_wallet(&derived);
            }
            WalletSubcommand::Show { key, reveal } => {
                let derived = key.derive(&config)?;
                print_derivation(&derived, reveal);
            }
        }
        Ok(())
    }
}

#[rustfmt::skip]
fn print_wallet(derived: &DerivedWallet) {
    let account = derived.account();

    println!();
    println!("      {}     {}", "Mnemonic".cyan().bold(), derived.wallet.expose_mnemonic());
    if derived.wallet.has_passphrase() {
        println!("      {}   {}", "Passphrase".cyan().bold(), "(set)".dimmed());
    }
    println!("      {}         {}", "Path".cyan().bold(), derived.derived.path);
    println!("      {}      {}", "Address".cyan().bold(), account.checksum_address().green());
    println!("      {}  0x{}", "Private Key".cyan().bold(), account.expose_private_key_hex().as_str());
    println!();
}

#[rustfmt::skip]
fn print_derivation(derived: &DerivedWallet, reveal: bool) {
    let account = derived.account();

    println!();
    println!("      {}         {}", "Path".cyan().bold(), derived.derived.path);
    println!("      {}      {}", "Address".cyan().bold(), account.checksum_address().green());
    println!("      {}   0x{}", "Public Key".cyan().bold(), hex::encode(account.public_key()).dimmed());
    if reveal {
        println!();
        print_key("Master", &derived.master_key);
        print_key("Leaf", &derived.derived.extended_key);
    }
    println!();
}

#[rustfmt::skip]
fn print_key(label: &str, key: &ExtendedPrivateKey) {
    println!("      {}  {}", format!("{label:<6}").cyan().bold(), format!("depth {}", key.depth()).dimmed());
    println!("      {}  0x{}", "Private Key".cyan().bold(), hex::encode(key.expose_private_key().as_slice()));
    println!("      {}         {}", "xprv".cyan().bold(), key.expose_xprv().as_str());
}
