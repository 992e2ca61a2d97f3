//! Immutable ledger entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::EntryType;
use crate::money::format_minor_units;

/// One immutable ledger line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    /// Entry id.
    pub id: Uuid,
    /// Wallet the entry was booked on.
    pub wallet_id: Uuid,
    /// Owner of the wallet.
    pub user_id: Uuid,
    /// Debit or credit.
    pub entry_type: EntryType,
    /// Business transaction type, e.g. `DEPOSIT` or `TRANSFER`.
    pub transaction_type: String,
    /// Amount in minor units.
    pub amount_minor_units: i64,
    /// ISO currency code.
    pub currency: String,
    /// Balance after the entry in minor units.
    pub balance_after: i64,
    /// Business transaction the entry belongs to.
    pub transaction_id: Uuid,
    /// Other side of a transfer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counterparty_wallet_id: Option<Uuid>,
    /// Free-form note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Booking time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl LedgerEntry {
    /// Amount with the sign of the movement, formatted in the entry currency.
    #[must_use]
    pub fn signed_amount(&self) -> String {
        let amount = match self.entry_type {
            EntryType::Credit => self.amount_minor_units,
            EntryType::Debit => -self.amount_minor_units,
        };
        format_minor_units(amount, &self.currency)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_ledger_entry_from_backend_json() {
        let entry: LedgerEntry = serde_json::from_value(json!({
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "walletId": "660e8400-e29b-41d4-a716-446655440001",
            "userId": "770e8400-e29b-41d4-a716-446655440002",
            "entryType": "DEBIT",
            "transactionType": "WITHDRAWAL",
            "amountMinorUnits": 2500,
            "currency": "EUR",
            "balanceAfter": 7500,
            "transactionId": "880e8400-e29b-41d4-a716-446655440003",
            "counterpartyWalletId": null,
            "createdAt": "2024-01-15T10:30:00Z"
        }))
        .unwrap();

        assert_eq!(entry.signed_amount(), "-€25.00");
        assert_eq!(entry.counterparty_wallet_id, None);
        assert!(entry.created_at.is_some());
    }
}
