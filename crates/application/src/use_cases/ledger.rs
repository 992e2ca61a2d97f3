//! Ledger use cases.

use purse_domain::{ApiRequest, LedgerEntry, Page};
use uuid::Uuid;

use crate::api::ApiClient;
use crate::error::ApplicationResult;

/// Default page size of ledger listings.
pub const DEFAULT_LEDGER_PAGE_SIZE: u32 = 50;

/// Read access to the immutable ledger.
#[derive(Clone)]
pub struct LedgerService {
    api: ApiClient,
}

impl LedgerService {
    /// Creates the service.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Ledger entries of one wallet.
    ///
    /// # Errors
    ///
    /// Returns any API, transport or session error.
    pub async fn wallet_entries(
        &self,
        wallet_id: Uuid,
        page: Option<u32>,
        size: Option<u32>,
    ) -> ApplicationResult<Page<LedgerEntry>> {
        let request = paged(ApiRequest::get(format!("/ledger/wallet/{wallet_id}")), page, size);
        self.api.fetch(request).await
    }

    /// Ledger entries across all of the user's wallets.
    ///
    /// # Errors
    ///
    /// Returns any API, transport or session error.
    pub async fn my_entries(
        &self,
        page: Option<u32>,
        size: Option<u32>,
    ) -> ApplicationResult<Page<LedgerEntry>> {
        self.api
            .fetch(paged(ApiRequest::get("/ledger/me"), page, size))
            .await
    }
}

fn paged(request: ApiRequest, page: Option<u32>, size: Option<u32>) -> ApiRequest {
    request
        .with_query("page", page.unwrap_or(0))
        .with_query("size", size.unwrap_or(DEFAULT_LEDGER_PAGE_SIZE))
}
