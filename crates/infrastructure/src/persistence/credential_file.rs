//! File-based credential store.
//!
//! Tokens are kept in a single JSON object keyed by credential name:
//! ```json
//! {
//!   "accessToken": "eyJhbGciOi...",
//!   "refreshToken": "3f2c..."
//! }
//! ```

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use purse_application::ports::{CredentialError, CredentialStore};
use purse_domain::CredentialKey;
use serde_json::ser::{PrettyFormatter, Serializer};
use tokio::fs;
use tokio::sync::Mutex;

type Credentials = BTreeMap<String, String>;

/// Credential store persisted to a JSON file.
///
/// Writes go to a temporary sibling file that is renamed over the target.
/// On Unix the file is readable by its owner only.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileCredentialStore {
    /// Creates a store backed by `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// The credentials file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Credentials, CredentialError> {
        match fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Credentials::new()),
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| CredentialError::Serialization(e.to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Credentials::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, credentials: &Credentials) -> Result<(), CredentialError> {
        if credentials.is_empty() {
            return match fs::remove_file(&self.path).await {
                Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            };
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = to_json_pretty(credentials)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content).await?;
        restrict_permissions(&tmp).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

fn to_json_pretty(credentials: &Credentials) -> Result<Vec<u8>, CredentialError> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"  ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    serde::Serialize::serialize(credentials, &mut serializer)
        .map_err(|e| CredentialError::Serialization(e.to_string()))?;
    buffer.push(b'\n');
    Ok(buffer)
}

#[cfg(unix)]
async fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await
}

#[cfg(not(unix))]
async fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn get(&self, key: CredentialKey) -> Result<Option<String>, CredentialError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.remove(key.as_str()))
    }

    async fn set(&self, key: CredentialKey, value: &str) -> Result<(), CredentialError> {
        let _guard = self.lock.lock().await;
        let mut credentials = self.load().await?;
        credentials.insert(key.as_str().to_string(), value.to_string());
        self.save(&credentials).await
    }

    async fn remove(&self, key: CredentialKey) -> Result<(), CredentialError> {
        let _guard = self.lock.lock().await;
        let mut credentials = self.load().await?;
        if credentials.remove(key.as_str()).is_some() {
            self.save(&credentials).await?;
        }
        Ok(())
    }

    async fn clear(&self) -> Result<(), CredentialError> {
        let _guard = self.lock.lock().await;
        self.save(&Credentials::new()).await
    }
}
