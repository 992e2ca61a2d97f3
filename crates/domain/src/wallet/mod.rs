//! Wallet, ledger, notification and customer profile types.
//!
//! These mirror the JSON bodies of the wallet backend (camelCase on the wire).

mod customer;
mod ledger;
mod notification;
mod types;

pub use customer::{Address, CreateProfileRequest, CustomerProfile, UpdateProfileRequest};
pub use ledger::LedgerEntry;
pub use notification::{Notification, NotificationPreferences};
pub use types::{
    CreateWalletRequest, EntryType, Page, Transaction, TransactionRequest, TransactionTotals,
    TransferRequest, TransferResponse, TransferStatus, Wallet, WalletStatus,
};
