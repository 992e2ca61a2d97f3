//! Customer profile types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Postal address.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Street line.
    #[serde(default)]
    pub street: Option<String>,
    /// City.
    #[serde(default)]
    pub city: Option<String>,
    /// State or region.
    #[serde(default)]
    pub state: Option<String>,
    /// Postal code.
    #[serde(default)]
    pub postal_code: Option<String>,
    /// Country.
    #[serde(default)]
    pub country: Option<String>,
}

/// Profile returned by `GET /customers/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerProfile {
    /// Customer id.
    pub id: Uuid,
    /// User id from the auth service.
    pub user_id: Uuid,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Full name as stored by the backend.
    #[serde(default)]
    pub full_name: Option<String>,
    /// Phone number.
    #[serde(default)]
    pub phone_number: Option<String>,
    /// Date of birth.
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    /// Postal address.
    #[serde(default)]
    pub address: Option<Address>,
    /// KYC verification status.
    #[serde(default)]
    pub kyc_status: Option<String>,
    /// Account status.
    #[serde(default)]
    pub status: Option<String>,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl CustomerProfile {
    /// Display name, preferring the backend's full name.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.full_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| format!("{} {}", self.first_name, self.last_name))
    }
}

/// Body of `PUT /customers/me`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    /// New given name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// New family name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// New phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

impl UpdateProfileRequest {
    /// Returns true if no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.phone_number.is_none()
    }
}

/// Body of `POST /customers`, used when no profile exists yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileRequest {
    /// Owning user.
    pub user_id: Uuid,
    /// Contact email.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_profile_display_name() {
        let profile: CustomerProfile = serde_json::from_value(json!({
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "userId": "660e8400-e29b-41d4-a716-446655440001",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "dateOfBirth": "1815-12-10",
            "kycStatus": "VERIFIED"
        }))
        .unwrap();

        assert_eq!(profile.display_name(), "Ada Lovelace");
        assert_eq!(
            profile.date_of_birth,
            NaiveDate::from_ymd_opt(1815, 12, 10)
        );
    }

    #[test]
    fn test_update_request_skips_unset_fields() {
        let request = UpdateProfileRequest {
            phone_number: Some("+998901234567".to_string()),
            ..UpdateProfileRequest::default()
        };
        assert!(!request.is_empty());
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "phoneNumber": "+998901234567" })
        );
    }
}
