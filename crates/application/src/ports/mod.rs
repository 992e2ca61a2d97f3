//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod credential_store;
mod http_transport;
mod login_redirect;
mod token_refresher;

pub use credential_store::{CredentialError, CredentialStore};
pub use http_transport::{HttpTransport, TransportError};
pub use login_redirect::LoginRedirect;
pub use token_refresher::TokenRefresher;
