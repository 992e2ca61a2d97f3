//! Credential store port
//!
//! Defines the interface for persisting the access and refresh tokens.

use async_trait::async_trait;
use purse_domain::{CredentialKey, TokenPair};

/// Errors that can occur during credential operations.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Key-value store holding the session's tokens.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Reads a credential.
    async fn get(&self, key: CredentialKey) -> Result<Option<String>, CredentialError>;

    /// Writes a credential, replacing any previous value.
    async fn set(&self, key: CredentialKey, value: &str) -> Result<(), CredentialError>;

    /// Deletes a credential. Deleting a missing key is not an error.
    async fn remove(&self, key: CredentialKey) -> Result<(), CredentialError>;

    /// Deletes every credential.
    ///
    /// Every key is attempted even if an earlier removal fails; the first
    /// error is returned.
    async fn clear(&self) -> Result<(), CredentialError> {
        let mut first_error = None;
        for key in CredentialKey::ALL {
            if let Err(err) = self.remove(key).await {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Stores both tokens of a pair.
    async fn save_tokens(&self, tokens: &TokenPair) -> Result<(), CredentialError> {
        self.set(CredentialKey::AccessToken, &tokens.access_token)
            .await?;
        self.set(CredentialKey::RefreshToken, &tokens.refresh_token)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use parking_lot::Mutex;

    use super::*;

    /// Store whose access token cannot be removed.
    #[derive(Default)]
    struct StuckAccessToken {
        values: Mutex<HashMap<CredentialKey, String>>,
    }

    #[async_trait]
    impl CredentialStore for StuckAccessToken {
        async fn get(&self, key: CredentialKey) -> Result<Option<String>, CredentialError> {
            Ok(self.values.lock().get(&key).cloned())
        }

        async fn set(&self, key: CredentialKey, value: &str) -> Result<(), CredentialError> {
            self.values.lock().insert(key, value.to_string());
            Ok(())
        }

        async fn remove(&self, key: CredentialKey) -> Result<(), CredentialError> {
            if key == CredentialKey::AccessToken {
                return Err(CredentialError::Serialization("locked".to_string()));
            }
            self.values.lock().remove(&key);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_clear_removes_remaining_keys_after_failure() {
        let store = StuckAccessToken::default();
        store
            .save_tokens(&TokenPair::new("T1", "R1"))
            .await
            .unwrap();

        let result = store.clear().await;

        assert!(matches!(result, Err(CredentialError::Serialization(_))));
        assert_eq!(
            store.get(CredentialKey::RefreshToken).await.unwrap(),
            None
        );
    }
}
