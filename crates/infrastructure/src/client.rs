//! Assembly of a ready-to-use wallet client.

use std::sync::Arc;

use purse_application::ports::{CredentialStore, HttpTransport, LoginRedirect, TransportError};
use purse_application::{
    ApiClient, AuthService, AuthenticatedTransport, LedgerService, NotificationService,
    ProfileService, WalletService,
};

use crate::auth::HttpTokenRefresher;
use crate::config::ClientConfig;
use crate::http::ReqwestTransport;
use crate::persistence::FileCredentialStore;

/// Wallet API client with every service wired to one authenticated transport.
///
/// All services share the same refresh coordinator, so a burst of expired
/// requests from any of them triggers a single refresh.
#[derive(Clone)]
pub struct PurseClient {
    api: ApiClient,
    auth: AuthService,
    wallets: WalletService,
    ledger: LedgerService,
    notifications: NotificationService,
    profile: ProfileService,
}

impl PurseClient {
    /// Builds a client storing tokens in the configured credentials file.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn from_config(
        config: &ClientConfig,
        redirect: Arc<dyn LoginRedirect>,
    ) -> Result<Self, TransportError> {
        let store = Arc::new(FileCredentialStore::new(&config.credentials_path));
        Self::with_store(config, store, redirect)
    }

    /// Builds a client with a caller-provided credential store.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_store(
        config: &ClientConfig,
        store: Arc<dyn CredentialStore>,
        redirect: Arc<dyn LoginRedirect>,
    ) -> Result<Self, TransportError> {
        let raw: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new(
            &config.base_url,
            config.request_timeout(),
            &config.user_agent,
        )?);
        let refresher = Arc::new(HttpTokenRefresher::new(Arc::clone(&raw)));

        let transport = AuthenticatedTransport::new(raw, store, refresher, redirect)
            .with_refresh_timeout(config.refresh_timeout());
        Ok(Self::from_transport(transport))
    }

    /// Wires every service to an existing transport.
    #[must_use]
    pub fn from_transport(transport: AuthenticatedTransport) -> Self {
        let api = ApiClient::new(transport);
        Self {
            auth: AuthService::new(api.clone()),
            wallets: WalletService::new(api.clone()),
            ledger: LedgerService::new(api.clone()),
            notifications: NotificationService::new(api.clone()),
            profile: ProfileService::new(api.clone()),
            api,
        }
    }

    /// Raw typed API access.
    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Authentication endpoints.
    #[must_use]
    pub const fn auth(&self) -> &AuthService {
        &self.auth
    }

    /// Wallet endpoints.
    #[must_use]
    pub const fn wallets(&self) -> &WalletService {
        &self.wallets
    }

    /// Ledger endpoints.
    #[must_use]
    pub const fn ledger(&self) -> &LedgerService {
        &self.ledger
    }

    /// Notification endpoints.
    #[must_use]
    pub const fn notifications(&self) -> &NotificationService {
        &self.notifications
    }

    /// Customer profile endpoints.
    #[must_use]
    pub const fn profile(&self) -> &ProfileService {
        &self.profile
    }
}
