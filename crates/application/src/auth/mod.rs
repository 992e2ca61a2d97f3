//! Session handling for the wallet API.
//!
//! This module provides:
//! - Single-flight refresh coordination
//! - A bearer-token transport that recovers expired sessions
//! - In-memory credential storage

mod coordinator;
mod memory_store;
mod transport;

pub use coordinator::{
    RefreshCoordinator, RefreshLease, RefreshOutcome, RefreshPhase, RefreshRole, RefreshWaiter,
};
pub use memory_store::MemoryCredentialStore;
pub use transport::{AuthenticatedTransport, DEFAULT_REFRESH_TIMEOUT};
