//! Off-chain document storage.
//!
//! Documents are addressed by URI:
//! - `ipfs://<cid>/<path>` is fetched through the configured gateway,
//! - `http(s)://` URLs are fetched as-is,
//! - `file://<path>` and bare paths are read from the local filesystem.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::error::StorageError;

/// Byte-level access to off-chain documents.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Download the document at `uri`.
    async fn fetch(&self, uri: &str) -> Result<Vec<u8>, StorageError>;
}

/// Download and parse a JSON document.
///
/// # Errors
/// Propagates fetch failures and reports parse failures as [`StorageError::Json`].
pub async fn fetch_json<T, S>(storage: &S, uri: &str) -> Result<T, StorageError>
where
    T: DeserializeOwned,
    S: Storage + ?Sized,
{
    let bytes = storage.fetch(uri).await?;
    serde_json::from_slice(&bytes).map_err(|source| StorageError::Json {
        uri: uri.to_owned(),
        source,
    })
}

/// Where a URI resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Location {
    Http(String),
    File(PathBuf),
}

/// [`Storage`] backed by an HTTP client, an IPFS gateway and the local filesystem.
#[derive(Debug, Clone)]
pub struct GatewayStorage {
    client: reqwest::Client,
    gateway: String,
}

impl GatewayStorage {
    /// Create a storage client.
    ///
    /// # Errors
    /// Returns [`StorageError::Client`] if the HTTP client cannot be built.
    pub fn new(gateway: &str, timeout: Duration) -> Result<Self, StorageError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(StorageError::Client)?;
        Ok(Self::from_client(client, gateway))
    }

    pub(crate) fn from_client(client: reqwest::Client, gateway: &str) -> Self {
        Self {
            client,
            gateway: gateway.trim_end_matches('/').to_owned(),
        }
    }

    fn resolve(&self, uri: &str) -> Result<Location, StorageError> {
        if let Some(path) = uri.strip_prefix("ipfs://") {
            let path = path.strip_prefix("ipfs/").unwrap_or(path);
            return Ok(Location::Http(format!("{}/ipfs/{path}", self.gateway)));
        }
        if uri.starts_with("https://") || uri.starts_with("http://") {
            return Ok(Location::Http(uri.to_owned()));
        }
        if let Some(path) = uri.strip_prefix("file://") {
            return Ok(Location::File(PathBuf::from(path)));
        }
        if uri.contains("://") || uri.is_empty() {
            return Err(StorageError::UnsupportedUri(uri.to_owned()));
        }
        Ok(Location::File(PathBuf::from(uri)))
    }

    async fn fetch_http(&self, url: String) -> Result<Vec<u8>, StorageError> {
        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(source) => return Err(StorageError::Http { url, source }),
        };

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(StorageError::NotFound(url));
        }
        if !status.is_success() {
            return Err(StorageError::Status {
                url,
                status: status.as_u16(),
            });
        }

        match response.bytes().await {
            Ok(bytes) => Ok(bytes.to_vec()),
            Err(source) => Err(StorageError::Http { url, source }),
        }
    }
}

#[async_trait]
impl Storage for GatewayStorage {
    #[instrument(skip(self))]
    async fn fetch(&self, uri: &str) -> Result<Vec<u8>, StorageError> {
        let location = self.resolve(uri)?;
        debug!(?location, "Fetching document");
        match location {
            Location::Http(url) => self.fetch_http(url).await,
            Location::File(path) => match tokio::fs::read(&path).await {
                Ok(bytes) => Ok(bytes),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    Err(StorageError::NotFound(path.display().to_string()))
                }
                Err(source) => Err(StorageError::Io { path, source }),
            },
        }
    }
}
