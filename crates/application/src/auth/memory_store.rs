//! In-memory credential storage.
//!
//! Used by tests and by callers that do not want tokens persisted.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use purse_domain::CredentialKey;
use tokio::sync::RwLock;

use crate::ports::{CredentialError, CredentialStore};

/// Thread-safe in-memory credential store.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    values: Arc<RwLock<HashMap<CredentialKey, String>>>,
}

impl MemoryCredentialStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of stored credentials.
    pub async fn count(&self) -> usize {
        self.values.read().await.len()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get(&self, key: CredentialKey) -> Result<Option<String>, CredentialError> {
        Ok(self.values.read().await.get(&key).cloned())
    }

    async fn set(&self, key: CredentialKey, value: &str) -> Result<(), CredentialError> {
        self.values.write().await.insert(key, value.to_string());
        Ok(())
    }

    async fn remove(&self, key: CredentialKey) -> Result<(), CredentialError> {
        self.values.write().await.remove(&key);
        Ok(())
    }

    async fn clear(&self) -> Result<(), CredentialError> {
        self.values.write().await.clear();
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use purse_domain::TokenPair;

    #[tokio::test]
    async fn test_set_and_get() {
        let store = MemoryCredentialStore::new();
        store.set(CredentialKey::AccessToken, "T1").await.unwrap();

        assert_eq!(
            store.get(CredentialKey::AccessToken).await.unwrap(),
            Some("T1".to_string())
        );
        assert_eq!(store.get(CredentialKey::RefreshToken).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_tokens_and_clear() {
        let store = MemoryCredentialStore::new();
        store
            .save_tokens(&TokenPair::new("T1", "R1"))
            .await
            .unwrap();
        assert_eq!(store.count().await, 2);

        store.clear().await.unwrap();
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn test_remove_missing_key() {
        let store = MemoryCredentialStore::new();
        assert!(store.remove(CredentialKey::RefreshToken).await.is_ok());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = MemoryCredentialStore::new();
        let other = store.clone();
        store.set(CredentialKey::RefreshToken, "R1").await.unwrap();
        assert_eq!(
            other.get(CredentialKey::RefreshToken).await.unwrap(),
            Some("R1".to_string())
        );
    }
}
