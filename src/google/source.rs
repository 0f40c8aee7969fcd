use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use super::types::ServiceAccount;
use crate::error::{Result, SendError};

/// Where the service-account key comes from. Resolved once, when the sender
/// is built.
#[async_trait]
pub trait CredentialProvider: Send + Sync + std::fmt::Debug {
    async fn service_account(&self, http: &reqwest::Client) -> Result<ServiceAccount>;
}

/// Picks the provider for a `FIREBASE_FILE` style locator: `http(s)://` URLs
/// are fetched, anything else is read from disk.
pub fn from_locator(locator: &str) -> Box<dyn CredentialProvider> {
    if locator.starts_with("http://") || locator.starts_with("https://") {
        Box::new(RemoteCredentials::new(locator))
    } else {
        Box::new(LocalFileCredentials::new(locator))
    }
}

#[derive(Debug, Clone)]
pub struct LocalFileCredentials {
    path: PathBuf,
}

impl LocalFileCredentials {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CredentialProvider for LocalFileCredentials {
    async fn service_account(&self, _http: &reqwest::Client) -> Result<ServiceAccount> {
        debug!(path = %self.path.display(), "loading service account from file");
        let content = tokio::fs::read(&self.path)
            .await
            .map_err(|e| SendError::InvalidCredentials(format!("{}: {e}", self.path.display())))?;

        ServiceAccount::try_from(content.as_slice())
            .map_err(|e| SendError::InvalidCredentials(format!("{}: {e}", self.path.display())))
    }
}

#[derive(Debug, Clone)]
pub struct RemoteCredentials {
    url: String,
}

impl RemoteCredentials {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl CredentialProvider for RemoteCredentials {
    async fn service_account(&self, http: &reqwest::Client) -> Result<ServiceAccount> {
        debug!(url = self.url, "fetching service account");
        let res = http
            .get(&self.url)
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(|e| SendError::InvalidCredentials(format!("{}: {e}", self.url)))?;

        let content = res
            .bytes()
            .await
            .map_err(|e| SendError::InvalidCredentials(format!("{}: {e}", self.url)))?;

        ServiceAccount::try_from(&content[..])
            .map_err(|e| SendError::InvalidCredentials(format!("{}: {e}", self.url)))
    }
}

/// An already-parsed key is its own provider.
#[async_trait]
impl CredentialProvider for ServiceAccount {
    async fn service_account(&self, _http: &reqwest::Client) -> Result<ServiceAccount> {
        Ok(self.clone())
    }
}
