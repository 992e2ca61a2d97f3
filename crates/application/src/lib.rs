//! Purse Application - Session handling, ports and use cases
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for external dependencies)
//! - Single-flight token refresh and the authenticated transport
//! - Use case orchestration
//! - Application-level error handling

pub mod api;
pub mod auth;
pub mod error;
pub mod ports;
pub mod use_cases;

pub use api::ApiClient;
pub use auth::{
    AuthenticatedTransport, MemoryCredentialStore, RefreshCoordinator, RefreshPhase, RefreshRole,
};
pub use error::{ApplicationError, ApplicationResult};
pub use ports::{
    CredentialError, CredentialStore, HttpTransport, LoginRedirect, TokenRefresher, TransportError,
};
pub use use_cases::{
    AuthService, LedgerService, NotificationService, ProfileService, WalletService,
};
