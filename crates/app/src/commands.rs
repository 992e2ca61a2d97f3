//! Command execution and terminal output.

use anyhow::{Context, bail};
use purse_domain::{
    CardProvider, CustomerProfile, FeeEstimate, LedgerEntry, Notification, NotificationPreferences,
    RegisterRequest, Transaction, TransactionRequest, TransactionTotals, TransferRequest,
    UpdateProfileRequest, Wallet, estimate_card_fee, format_minor_units, format_number,
    parse_major_units,
};
use purse_infrastructure::PurseClient;

use crate::cli::{Command, MoneyArgs, NotificationCommand, ProfileCommand, WalletCommand};

/// Runs one command against the API.
pub async fn execute(command: Command, client: &PurseClient) -> anyhow::Result<()> {
    match command {
        Command::Login { email, password } => {
            let user = client.auth().login(&email, &password).await?;
            println!("Signed in as {}", user.display_name());
        }
        Command::Register {
            email,
            password,
            first_name,
            last_name,
        } => {
            let registration = RegisterRequest {
                email,
                password,
                first_name,
                last_name,
            };
            let user = client.auth().register(&registration).await?;
            println!("Account created for {}", user.display_name());
        }
        Command::Logout => {
            client.auth().logout().await?;
            println!("Signed out");
        }
        Command::Refresh => {
            client.auth().refresh().await?;
            println!("Session refreshed");
        }
        Command::Whoami => whoami(client).await?,
        Command::ChangePassword { current, new } => {
            client.auth().change_password(&current, &new).await?;
            println!("Password changed");
        }
        Command::Profile(command) => profile(command, client).await?,
        Command::Wallets(command) => wallets(command, client).await?,
        Command::Deposit(args) => move_money(args, client, Direction::Deposit).await?,
        Command::Withdraw(args) => move_money(args, client, Direction::Withdraw).await?,
        Command::Transfer {
            from,
            to,
            amount,
            description,
        } => {
            let source = client.wallets().wallet(from).await?;
            let amount = parse_major_units(&amount, &source.currency)?;
            let transfer = client
                .wallets()
                .transfer(&TransferRequest::new(from, to, amount, description))
                .await?;
            println!(
                "Transfer {} {:?}: {}",
                transfer.transaction_id,
                transfer.status,
                format_minor_units(transfer.amount, &source.currency)
            );
        }
        Command::Transactions { wallet, paging } => {
            let wallet = client.wallets().wallet(wallet).await?;
            let page = client
                .wallets()
                .transactions(wallet.id, paging.page, paging.size)
                .await?;
            for tx in &page.content {
                println!("{}", render_transaction(tx, &wallet.currency));
            }
            let totals = TransactionTotals::from_transactions(&page.content);
            println!(
                "{} of {} transactions, in {}, out {}",
                totals.count,
                format_count(page.total_elements),
                format_minor_units(totals.credits, &wallet.currency),
                format_minor_units(totals.debits, &wallet.currency)
            );
        }
        Command::Ledger { wallet, paging } => {
            let page = match wallet {
                Some(id) => {
                    client
                        .ledger()
                        .wallet_entries(id, paging.page, paging.size)
                        .await?
                }
                None => client.ledger().my_entries(paging.page, paging.size).await?,
            };
            for entry in &page.content {
                println!("{}", render_ledger_entry(entry));
            }
            println!(
                "{} entries of {}",
                page.content.len(),
                format_count(page.total_elements)
            );
        }
        Command::Notifications(command) => notifications(command, client).await?,
        Command::Fee {
            amount,
            currency,
            provider,
        } => {
            let minor = parse_major_units(&amount, &currency)?;
            let provider: CardProvider = provider.parse()?;
            println!(
                "{}",
                render_fee(&estimate_card_fee(minor, provider), provider, &currency)
            );
        }
    }
    Ok(())
}

async fn whoami(client: &PurseClient) -> anyhow::Result<()> {
    if !client.auth().is_authenticated().await? {
        bail!("not signed in, run `purse login`");
    }
    match client.profile().my_profile().await? {
        Some(profile) => println!("{}", render_profile(&profile)),
        None => println!("Signed in. No customer profile yet."),
    }
    Ok(())
}

async fn profile(command: ProfileCommand, client: &PurseClient) -> anyhow::Result<()> {
    match command {
        ProfileCommand::Show => match client.profile().my_profile().await? {
            Some(profile) => println!("{}", render_profile(&profile)),
            None => println!("No customer profile yet."),
        },
        ProfileCommand::Update {
            first_name,
            last_name,
            phone,
        } => {
            let update = UpdateProfileRequest {
                first_name,
                last_name,
                phone_number: phone,
            };
            if update.is_empty() {
                bail!("nothing to update, pass --first-name, --last-name or --phone");
            }
            let profile = client.profile().update_profile(&update).await?;
            println!("{}", render_profile(&profile));
        }
    }
    Ok(())
}

async fn wallets(command: WalletCommand, client: &PurseClient) -> anyhow::Result<()> {
    match command {
        WalletCommand::List => {
            let wallets = client.wallets().my_wallets().await?;
            if wallets.is_empty() {
                println!("No wallets yet. Create one with `purse wallets create USD`.");
            }
            for wallet in &wallets {
                println!("{}", render_wallet(wallet));
            }
        }
        WalletCommand::Show { wallet } => {
            println!("{}", render_wallet(&client.wallets().wallet(wallet).await?));
        }
        WalletCommand::Create { currency } => {
            let wallet = client.wallets().create_wallet(&currency).await?;
            println!("{}", render_wallet(&wallet));
        }
        WalletCommand::Freeze { wallet } => {
            println!("{}", render_wallet(&client.wallets().freeze(wallet).await?));
        }
        WalletCommand::Unfreeze { wallet } => {
            println!("{}", render_wallet(&client.wallets().unfreeze(wallet).await?));
        }
    }
    Ok(())
}

async fn notifications(command: NotificationCommand, client: &PurseClient) -> anyhow::Result<()> {
    match command {
        NotificationCommand::List { paging } => {
            let page = client
                .notifications()
                .notifications(paging.page, paging.size)
                .await?;
            for notification in &page.content {
                println!("{}", render_notification(notification));
            }
        }
        NotificationCommand::Read { id } => {
            client.notifications().mark_read(id).await?;
            println!("Marked {id} as read");
        }
        NotificationCommand::ReadAll => {
            client.notifications().mark_all_read().await?;
            println!("All notifications marked as read");
        }
        NotificationCommand::Preferences => {
            let preferences = client.notifications().preferences().await?;
            println!("{}", render_preferences(&preferences));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Deposit,
    Withdraw,
}

async fn move_money(
    args: MoneyArgs,
    client: &PurseClient,
    direction: Direction,
) -> anyhow::Result<()> {
    let wallet = client.wallets().wallet(args.wallet).await?;
    if !wallet.is_active() {
        bail!("wallet {} is {}", wallet.id, wallet.status);
    }
    let amount = parse_major_units(&args.amount, &wallet.currency)?;

    if let Some(provider) = &args.provider {
        let provider: CardProvider = provider.parse()?;
        println!(
            "{}",
            render_fee(&estimate_card_fee(amount, provider), provider, &wallet.currency)
        );
    }

    // One key per operation; a retry of this command is a new operation.
    let request = TransactionRequest::new(amount, args.description);
    let tx = match direction {
        Direction::Deposit => client.wallets().deposit(wallet.id, &request).await,
        Direction::Withdraw => client.wallets().withdraw(wallet.id, &request).await,
    }
    .with_context(|| format!("{direction:?} of {} failed", args.amount))?;

    println!("{}", render_transaction(&tx, &wallet.currency));
    Ok(())
}

fn format_count(count: u64) -> String {
    format_number(i64::try_from(count).unwrap_or(i64::MAX))
}

fn render_preferences(preferences: &NotificationPreferences) -> String {
    preferences
        .0
        .iter()
        .map(|(key, value)| format!("{key}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_wallet(wallet: &Wallet) -> String {
    format!(
        "{}  {}  {}  {}",
        wallet.id,
        wallet.currency,
        wallet.formatted_balance(),
        wallet.status
    )
}

fn render_transaction(tx: &Transaction, currency: &str) -> String {
    let when = tx
        .created_at
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();
    format!(
        "{when:16}  {:6}  {:>14}  balance {}  {}",
        tx.entry_type.to_string(),
        format_minor_units(tx.amount, currency),
        format_minor_units(tx.balance_after, currency),
        tx.description.as_deref().unwrap_or("")
    )
    .trim_end()
    .to_string()
}

fn render_ledger_entry(entry: &LedgerEntry) -> String {
    let when = entry
        .created_at
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();
    format!(
        "{when:16}  {:12}  {:>14}  {}",
        entry.transaction_type,
        entry.signed_amount(),
        entry.description.as_deref().unwrap_or("")
    )
    .trim_end()
    .to_string()
}

fn render_notification(notification: &Notification) -> String {
    format!(
        "{}  {}  {}  {}",
        notification.id,
        notification.status,
        notification.notification_type,
        notification.subject.as_deref().unwrap_or("")
    )
    .trim_end()
    .to_string()
}

fn render_profile(profile: &CustomerProfile) -> String {
    let mut lines = vec![profile.display_name()];
    if let Some(phone) = &profile.phone_number {
        lines.push(format!("phone: {phone}"));
    }
    if let Some(kyc) = &profile.kyc_status {
        lines.push(format!("kyc: {kyc}"));
    }
    lines.join("\n")
}

fn render_fee(estimate: &FeeEstimate, provider: CardProvider, currency: &str) -> String {
    format!(
        "{provider} fee ({}%): {}\ntotal: {}",
        estimate.rate_percent(),
        format_minor_units(estimate.fee, currency),
        format_minor_units(estimate.total, currency)
    )
}
