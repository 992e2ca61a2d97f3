//! Notification use cases.

use purse_domain::{ApiRequest, Notification, NotificationPreferences, Page};
use uuid::Uuid;

use crate::api::ApiClient;
use crate::error::ApplicationResult;

/// Default page size of the notification listing.
pub const DEFAULT_NOTIFICATIONS_PAGE_SIZE: u32 = 20;

/// Use case for notifications and their preferences.
#[derive(Clone)]
pub struct NotificationService {
    api: ApiClient,
}

impl NotificationService {
    /// Creates the service.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Current notification preferences.
    ///
    /// # Errors
    ///
    /// Returns any API, transport or session error.
    pub async fn preferences(&self) -> ApplicationResult<NotificationPreferences> {
        self.api
            .fetch(ApiRequest::get("/notifications/preferences"))
            .await
    }

    /// Replaces the notification preferences and returns the stored result.
    ///
    /// # Errors
    ///
    /// Returns any API, transport or session error.
    pub async fn update_preferences(
        &self,
        preferences: &NotificationPreferences,
    ) -> ApplicationResult<NotificationPreferences> {
        let request = ApiRequest::put("/notifications/preferences").with_json(preferences)?;
        self.api.fetch(request).await
    }

    /// A page of notifications.
    ///
    /// # Errors
    ///
    /// Returns any API, transport or session error.
    pub async fn notifications(
        &self,
        page: Option<u32>,
        size: Option<u32>,
    ) -> ApplicationResult<Page<Notification>> {
        let request = ApiRequest::get("/notifications")
            .with_query("page", page.unwrap_or(0))
            .with_query("size", size.unwrap_or(DEFAULT_NOTIFICATIONS_PAGE_SIZE));
        self.api.fetch(request).await
    }

    /// Marks one notification as read.
    ///
    /// # Errors
    ///
    /// Returns any API, transport or session error.
    pub async fn mark_read(&self, notification_id: Uuid) -> ApplicationResult<()> {
        self.api
            .execute(ApiRequest::put(format!(
                "/notifications/{notification_id}/read"
            )))
            .await
    }

    /// Marks every notification as read.
    ///
    /// # Errors
    ///
    /// Returns any API, transport or session error.
    pub async fn mark_all_read(&self) -> ApplicationResult<()> {
        self.api
            .execute(ApiRequest::put("/notifications/read-all"))
            .await
    }
}
