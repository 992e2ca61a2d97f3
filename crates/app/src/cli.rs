//! Command line definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

/// Command line client for the Purse digital wallet.
#[derive(Parser, Debug)]
#[command(name = "purse", version)]
pub struct Cli {
    /// Path to a TOML config file. Example config:
    ///
    /// ```toml
    /// base_url = "https://wallet.example.com/api/v1"
    /// refresh_timeout_ms = 30000
    /// ```
    #[arg(long, short, global = true, env = "PURSE_CONFIG")]
    pub config: Option<PathBuf>,

    /// API base URL, overriding the config file.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Log debug output to stderr.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and store the session tokens.
    Login {
        /// Account email.
        #[arg(long, short)]
        email: String,
        /// Account password.
        #[arg(long, short, env = "PURSE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and sign in.
    Register {
        /// Account email.
        #[arg(long, short)]
        email: String,
        /// Account password.
        #[arg(long, short, env = "PURSE_PASSWORD", hide_env_values = true)]
        password: String,
        /// Given name.
        #[arg(long)]
        first_name: String,
        /// Family name.
        #[arg(long)]
        last_name: String,
    },
    /// Sign out and forget the stored tokens.
    Logout,
    /// Exchange the refresh token for a new access token.
    Refresh,
    /// Show the signed-in user.
    Whoami,
    /// Change the account password.
    ChangePassword {
        /// Current password.
        #[arg(long)]
        current: String,
        /// New password.
        #[arg(long)]
        new: String,
    },
    /// Show or edit the customer profile.
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// Manage wallets.
    #[command(subcommand)]
    Wallets(WalletCommand),
    /// Deposit money into a wallet.
    Deposit(MoneyArgs),
    /// Withdraw money from a wallet.
    Withdraw(MoneyArgs),
    /// Move money between two wallets.
    Transfer {
        /// Source wallet.
        from: Uuid,
        /// Destination wallet.
        to: Uuid,
        /// Amount in major units, e.g. `12.50`.
        amount: String,
        /// Note shown in the history.
        #[arg(long, short)]
        description: Option<String>,
    },
    /// List a wallet's transactions.
    Transactions {
        /// Wallet id.
        wallet: Uuid,
        #[command(flatten)]
        paging: PageArgs,
    },
    /// List ledger entries.
    Ledger {
        /// Only entries of this wallet.
        #[arg(long, short)]
        wallet: Option<Uuid>,
        #[command(flatten)]
        paging: PageArgs,
    },
    /// Notifications and their preferences.
    #[command(subcommand)]
    Notifications(NotificationCommand),
    /// Estimate the card fee of an amount without contacting the server.
    Fee {
        /// Amount in major units.
        amount: String,
        /// Currency code.
        #[arg(long, default_value = "USD")]
        currency: String,
        /// Card provider: VISA, MASTERCARD, UZCARD, HUMO or anything else.
        #[arg(long, short, default_value = "STANDARD")]
        provider: String,
    },
}

/// Profile subcommands.
#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Show the profile.
    Show,
    /// Update profile fields.
    Update {
        /// New given name.
        #[arg(long)]
        first_name: Option<String>,
        /// New family name.
        #[arg(long)]
        last_name: Option<String>,
        /// New phone number.
        #[arg(long)]
        phone: Option<String>,
    },
}

/// Wallet subcommands.
#[derive(Subcommand, Debug)]
pub enum WalletCommand {
    /// List your wallets.
    List,
    /// Show one wallet.
    Show {
        /// Wallet id.
        wallet: Uuid,
    },
    /// Open a wallet.
    Create {
        /// Currency code, e.g. USD.
        currency: String,
    },
    /// Freeze a wallet.
    Freeze {
        /// Wallet id.
        wallet: Uuid,
    },
    /// Unfreeze a wallet.
    Unfreeze {
        /// Wallet id.
        wallet: Uuid,
    },
}

/// Notification subcommands.
#[derive(Subcommand, Debug)]
pub enum NotificationCommand {
    /// List notifications.
    List {
        #[command(flatten)]
        paging: PageArgs,
    },
    /// Mark one notification as read.
    Read {
        /// Notification id.
        id: Uuid,
    },
    /// Mark every notification as read.
    ReadAll,
    /// Show notification preferences.
    Preferences,
}

/// Arguments of deposits and withdrawals.
#[derive(Args, Debug)]
pub struct MoneyArgs {
    /// Wallet id.
    pub wallet: Uuid,
    /// Amount in major units, e.g. `12.50`.
    pub amount: String,
    /// Note shown in the history.
    #[arg(long, short)]
    pub description: Option<String>,
    /// Card provider, to print a fee estimate first.
    #[arg(long, short)]
    pub provider: Option<String>,
}

/// Paging of listings.
#[derive(Args, Debug)]
pub struct PageArgs {
    /// Zero-based page number.
    #[arg(long)]
    pub page: Option<u32>,
    /// Page size.
    #[arg(long)]
    pub size: Option<u32>,
}
