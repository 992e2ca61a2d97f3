//! Customer profile use cases.

use purse_domain::{ApiRequest, CreateProfileRequest, CustomerProfile, UpdateProfileRequest};

use crate::api::ApiClient;
use crate::error::{ApplicationError, ApplicationResult};

/// Use case for the signed-in user's customer profile.
#[derive(Clone)]
pub struct ProfileService {
    api: ApiClient,
}

impl ProfileService {
    /// Creates the service.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// The user's profile, or `None` if none was created yet.
    ///
    /// # Errors
    ///
    /// Returns any API error other than 404, or a transport or session error.
    pub async fn my_profile(&self) -> ApplicationResult<Option<CustomerProfile>> {
        match self.api.fetch(ApiRequest::get("/customers/me")).await {
            Ok(profile) => Ok(Some(profile)),
            Err(ApplicationError::Api { status: 404, .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Updates the user's profile.
    ///
    /// # Errors
    ///
    /// Returns any API, transport or session error.
    pub async fn update_profile(
        &self,
        update: &UpdateProfileRequest,
    ) -> ApplicationResult<CustomerProfile> {
        let request = ApiRequest::put("/customers/me").with_json(update)?;
        self.api.fetch(request).await
    }

    /// Creates a profile for a user that has none.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Api` with status 409 if one already exists.
    pub async fn create_profile(
        &self,
        profile: &CreateProfileRequest,
    ) -> ApplicationResult<CustomerProfile> {
        let request = ApiRequest::post("/customers").with_json(profile)?;
        self.api.fetch(request).await
    }
}
