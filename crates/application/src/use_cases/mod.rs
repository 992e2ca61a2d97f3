//! Application use cases (business logic orchestration).

mod auth;
mod ledger;
mod notifications;
mod profile;
mod wallets;

pub use auth::AuthService;
pub use ledger::{DEFAULT_LEDGER_PAGE_SIZE, LedgerService};
pub use notifications::{DEFAULT_NOTIFICATIONS_PAGE_SIZE, NotificationService};
pub use profile::ProfileService;
pub use wallets::{DEFAULT_TRANSACTIONS_PAGE_SIZE, WalletService};
