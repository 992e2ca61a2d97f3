//! Wallet, transaction and transfer types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::id::generate_idempotency_key;
use crate::money::format_minor_units;

/// Lifecycle status of a wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WalletStatus {
    /// Accepts deposits, withdrawals and transfers.
    Active,
    /// Temporarily blocked.
    Frozen,
    /// Permanently closed.
    Closed,
}

impl WalletStatus {
    /// Returns the wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Frozen => "FROZEN",
            Self::Closed => "CLOSED",
        }
    }
}

impl std::fmt::Display for WalletStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single-currency wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    /// Wallet id.
    pub id: Uuid,
    /// Owner's user id.
    pub user_id: Uuid,
    /// ISO currency code.
    pub currency: String,
    /// Balance in minor units.
    #[serde(alias = "balanceMinorUnits")]
    pub balance: i64,
    /// Wallet status.
    pub status: WalletStatus,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Wallet {
    /// Balance formatted with the wallet's currency.
    #[must_use]
    pub fn formatted_balance(&self) -> String {
        format_minor_units(self.balance, &self.currency)
    }

    /// Returns true if the wallet can move money.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.status, WalletStatus::Active)
    }
}

/// Body of `POST /wallets/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateWalletRequest {
    /// ISO currency code of the new wallet.
    pub currency: String,
}

/// Body of deposit and withdrawal requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    /// Amount in minor units.
    pub amount_minor_units: i64,
    /// Key that makes a retried request safe to replay.
    pub idempotency_key: String,
    /// Free-form note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TransactionRequest {
    /// Creates a request with a freshly generated idempotency key.
    #[must_use]
    pub fn new(amount_minor_units: i64, description: Option<String>) -> Self {
        Self {
            amount_minor_units,
            idempotency_key: generate_idempotency_key(),
            description,
        }
    }
}

/// Body of `POST /wallets/transfer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    /// Source wallet.
    pub from_wallet_id: Uuid,
    /// Destination wallet.
    pub to_wallet_id: Uuid,
    /// Amount in minor units.
    pub amount_minor_units: i64,
    /// Key that makes a retried request safe to replay.
    pub idempotency_key: String,
    /// Free-form note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TransferRequest {
    /// Creates a transfer with a freshly generated idempotency key.
    #[must_use]
    pub fn new(
        from_wallet_id: Uuid,
        to_wallet_id: Uuid,
        amount_minor_units: i64,
        description: Option<String>,
    ) -> Self {
        Self {
            from_wallet_id,
            to_wallet_id,
            amount_minor_units,
            idempotency_key: generate_idempotency_key(),
            description,
        }
    }
}

/// Direction of a balance movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntryType {
    /// Money left the wallet.
    Debit,
    /// Money entered the wallet.
    Credit,
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Debit => "DEBIT",
            Self::Credit => "CREDIT",
        })
    }
}

/// A wallet transaction as returned by deposit, withdrawal and history calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Transaction id.
    pub id: Uuid,
    /// Debit or credit.
    #[serde(rename = "type", alias = "entryType")]
    pub entry_type: EntryType,
    /// Amount in minor units.
    #[serde(alias = "amountMinorUnits")]
    pub amount: i64,
    /// Balance after the transaction in minor units.
    #[serde(alias = "balanceAfterMinorUnits")]
    pub balance_after: i64,
    /// Free-form note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// When the transaction happened.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Outcome of a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransferStatus {
    /// Both legs were booked.
    Completed,
    /// Booking is in progress.
    Pending,
    /// The transfer was rejected.
    Failed,
}

/// Response of `POST /wallets/transfer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferResponse {
    /// Transaction id shared by both legs.
    pub transaction_id: Uuid,
    /// Source wallet.
    pub from_wallet_id: Uuid,
    /// Destination wallet.
    pub to_wallet_id: Uuid,
    /// Amount in minor units.
    pub amount: i64,
    /// Transfer status.
    pub status: TransferStatus,
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page.
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    /// Total number of items across all pages.
    #[serde(default)]
    pub total_elements: u64,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Returns true if the page has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Summary of a page of transactions, as shown above a history listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransactionTotals {
    /// Sum of credited amounts.
    pub credits: i64,
    /// Sum of debited amounts.
    pub debits: i64,
    /// Number of transactions summed.
    pub count: usize,
}

impl TransactionTotals {
    /// Sums credits and debits over a set of transactions.
    #[must_use]
    pub fn from_transactions<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        transactions
            .into_iter()
            .fold(Self::default(), |mut totals, tx| {
                match tx.entry_type {
                    EntryType::Credit => totals.credits = totals.credits.saturating_add(tx.amount),
                    EntryType::Debit => totals.debits = totals.debits.saturating_add(tx.amount),
                }
                totals.count += 1;
                totals
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_wallet_from_backend_json() {
        let wallet: Wallet = serde_json::from_value(json!({
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "userId": "660e8400-e29b-41d4-a716-446655440001",
            "currency": "USD",
            "balance": 150000,
            "status": "ACTIVE"
        }))
        .unwrap();

        assert_eq!(wallet.formatted_balance(), "$1 500.00");
        assert!(wallet.is_active());
        assert_eq!(wallet.created_at, None);
    }

    #[test]
    fn test_wallet_accepts_balance_alias() {
        let wallet: Wallet = serde_json::from_value(json!({
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "userId": "660e8400-e29b-41d4-a716-446655440001",
            "currency": "JPY",
            "balanceMinorUnits": 1500,
            "status": "FROZEN"
        }))
        .unwrap();

        assert_eq!(wallet.balance, 1_500);
        assert_eq!(wallet.status, WalletStatus::Frozen);
    }

    #[test]
    fn test_transaction_request_wire_format() {
        let request = TransactionRequest {
            amount_minor_units: 1_000,
            idempotency_key: "1-abc".to_string(),
            description: None,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "amountMinorUnits": 1000, "idempotencyKey": "1-abc" })
        );
    }

    #[test]
    fn test_new_requests_get_distinct_keys() {
        let a = TransactionRequest::new(100, None);
        let b = TransactionRequest::new(100, None);
        assert_ne!(a.idempotency_key, b.idempotency_key);
    }

    #[test]
    fn test_transaction_accepts_type_and_entry_type() {
        let by_type: Transaction = serde_json::from_value(json!({
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "type": "CREDIT",
            "amount": 100,
            "balanceAfter": 100
        }))
        .unwrap();
        let by_entry_type: Transaction = serde_json::from_value(json!({
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "entryType": "DEBIT",
            "amountMinorUnits": 40,
            "balanceAfterMinorUnits": 60
        }))
        .unwrap();

        assert_eq!(by_type.entry_type, EntryType::Credit);
        assert_eq!(by_entry_type.entry_type, EntryType::Debit);
        assert_eq!(by_entry_type.amount, 40);

        let totals = TransactionTotals::from_transactions([&by_type, &by_entry_type]);
        assert_eq!(
            totals,
            TransactionTotals {
                credits: 100,
                debits: 40,
                count: 2
            }
        );
    }

    #[test]
    fn test_page_defaults() {
        let page: Page<Transaction> = serde_json::from_value(json!({})).unwrap();
        assert!(page.is_empty());
        assert_eq!(page.total_pages, 0);
    }
}
