//! Wallet use cases.

use purse_domain::{
    ApiRequest, CreateWalletRequest, Page, Transaction, TransactionRequest, TransferRequest,
    TransferResponse, Wallet,
};
use tracing::info;
use uuid::Uuid;

use crate::api::ApiClient;
use crate::error::ApplicationResult;

/// Default page size of the transaction history.
pub const DEFAULT_TRANSACTIONS_PAGE_SIZE: u32 = 20;

/// Use case for the wallet endpoints.
#[derive(Clone)]
pub struct WalletService {
    api: ApiClient,
}

impl WalletService {
    /// Creates the service.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Lists the signed-in user's wallets.
    ///
    /// # Errors
    ///
    /// Returns any API, transport or session error.
    pub async fn my_wallets(&self) -> ApplicationResult<Vec<Wallet>> {
        self.api.fetch(ApiRequest::get("/wallets/me")).await
    }

    /// Fetches one wallet.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Api` with status 404 if it does not exist.
    pub async fn wallet(&self, wallet_id: Uuid) -> ApplicationResult<Wallet> {
        self.api
            .fetch(ApiRequest::get(format!("/wallets/{wallet_id}")))
            .await
    }

    /// Opens a wallet in `currency`.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Api` if the backend refuses the currency or
    /// the user already has a wallet in it.
    pub async fn create_wallet(&self, currency: &str) -> ApplicationResult<Wallet> {
        let request = ApiRequest::post("/wallets/me").with_json(&CreateWalletRequest {
            currency: currency.trim().to_uppercase(),
        })?;
        let wallet: Wallet = self.api.fetch(request).await?;
        info!(wallet_id = %wallet.id, currency = %wallet.currency, "Wallet created");
        Ok(wallet)
    }

    /// Deposits into a wallet.
    ///
    /// # Errors
    ///
    /// Returns any API, transport or session error.
    pub async fn deposit(
        &self,
        wallet_id: Uuid,
        request: &TransactionRequest,
    ) -> ApplicationResult<Transaction> {
        let request = ApiRequest::post(format!("/wallets/{wallet_id}/deposit")).with_json(request)?;
        self.api.fetch(request).await
    }

    /// Withdraws from a wallet.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Api` if the balance is too low, or any
    /// transport or session error.
    pub async fn withdraw(
        &self,
        wallet_id: Uuid,
        request: &TransactionRequest,
    ) -> ApplicationResult<Transaction> {
        let request =
            ApiRequest::post(format!("/wallets/{wallet_id}/withdraw")).with_json(request)?;
        self.api.fetch(request).await
    }

    /// Moves money between two wallets.
    ///
    /// # Errors
    ///
    /// Returns any API, transport or session error.
    pub async fn transfer(&self, request: &TransferRequest) -> ApplicationResult<TransferResponse> {
        let request = ApiRequest::post("/wallets/transfer").with_json(request)?;
        self.api.fetch(request).await
    }

    /// Fetches a page of a wallet's transaction history.
    ///
    /// # Errors
    ///
    /// Returns any API, transport or session error.
    pub async fn transactions(
        &self,
        wallet_id: Uuid,
        page: Option<u32>,
        size: Option<u32>,
    ) -> ApplicationResult<Page<Transaction>> {
        let request = ApiRequest::get(format!("/wallets/{wallet_id}/transactions"))
            .with_query("page", page.unwrap_or(0))
            .with_query("size", size.unwrap_or(DEFAULT_TRANSACTIONS_PAGE_SIZE));
        self.api.fetch(request).await
    }

    /// Freezes a wallet.
    ///
    /// # Errors
    ///
    /// Returns any API, transport or session error.
    pub async fn freeze(&self, wallet_id: Uuid) -> ApplicationResult<Wallet> {
        self.api
            .fetch(ApiRequest::post(format!("/wallets/{wallet_id}/freeze")))
            .await
    }

    /// Unfreezes a wallet.
    ///
    /// # Errors
    ///
    /// Returns any API, transport or session error.
    pub async fn unfreeze(&self, wallet_id: Uuid) -> ApplicationResult<Wallet> {
        self.api
            .fetch(ApiRequest::post(format!("/wallets/{wallet_id}/unfreeze")))
            .await
    }
}
