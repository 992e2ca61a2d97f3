//! Purse Domain - Core wallet client types
//!
//! This crate defines the domain model for the Purse wallet client.
//! All types here are pure Rust with no I/O dependencies.

pub mod auth;
pub mod error;
pub mod id;
pub mod money;
pub mod request;
pub mod response;
pub mod wallet;

pub use auth::{
    AuthError, AuthResponse, ChangePasswordRequest, CredentialKey, LoginRequest, RefreshRequest,
    RefreshResponse, RegisterRequest, SessionUser, TokenPair, token_preview,
};
pub use error::{DomainError, DomainResult};
pub use id::generate_idempotency_key;
pub use money::{
    CardProvider, Currency, FeeEstimate, estimate_card_fee, format_minor_units, format_number,
    parse_major_units,
};
pub use request::{ApiRequest, HttpMethod};
pub use response::{ApiErrorBody, ApiResponse, StatusCode};
pub use wallet::{
    Address, CreateProfileRequest, CreateWalletRequest, CustomerProfile, EntryType, LedgerEntry,
    Notification, NotificationPreferences, Page, Transaction, TransactionRequest,
    TransactionTotals, TransferRequest, TransferResponse, TransferStatus, UpdateProfileRequest,
    Wallet, WalletStatus,
};
