//! Contract metadata lookup.

use alloy::primitives::Address;
use async_trait::async_trait;
use dropclaim_core::schema::metadata::ContractMetadata;
use tracing::{debug, instrument};

use crate::chain::ContractUriReader;
use crate::error::ClaimError;
use crate::storage::{Storage, fetch_json};

/// Reads the metadata document a drop contract publishes.
#[async_trait]
pub trait ContractMetadataReader: Send + Sync {
    /// Fetch and parse the contract's metadata.
    ///
    /// Failures are fatal for resolution and reported as [`ClaimError::Metadata`] or
    /// [`ClaimError::ChainRead`].
    async fn contract_metadata(&self, contract: Address) -> Result<ContractMetadata, ClaimError>;
}

/// Resolves `contractURI()` on chain, then downloads the document from storage.
#[derive(Debug, Clone)]
pub struct StorageMetadataReader<U, S> {
    uri_reader: U,
    storage: S,
}

impl<U, S> StorageMetadataReader<U, S> {
    /// Combine a URI reader with a storage backend.
    #[must_use]
    pub const fn new(uri_reader: U, storage: S) -> Self {
        Self {
            uri_reader,
            storage,
        }
    }
}

#[async_trait]
impl<U, S> ContractMetadataReader for StorageMetadataReader<U, S>
where
    U: ContractUriReader,
    S: Storage,
{
    #[instrument(skip(self))]
    async fn contract_metadata(&self, contract: Address) -> Result<ContractMetadata, ClaimError> {
        let uri = self.uri_reader.contract_uri(contract).await?;
        debug!(%uri, "Contract metadata URI");
        fetch_json(&self.storage, &uri)
            .await
            .map_err(|source| ClaimError::Metadata { contract, source })
    }
}
