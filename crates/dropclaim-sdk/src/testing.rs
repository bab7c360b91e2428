//! In-memory collaborators for unit tests.

#![allow(
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    reason = "Test code - relax these lints for clarity"
)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use alloy::primitives::Address;
use async_trait::async_trait;
use dropclaim_core::schema::claim::{AllowlistProof, ClaimCondition};
use dropclaim_core::schema::metadata::ContractMetadata;
use dropclaim_core::schema::token::DropContract;
use serde::Serialize;
use tokio::io::{AsyncReadExt as _, AsyncWriteExt as _};
use tokio::net::{TcpListener, TcpStream};

use crate::allowlist::AllowlistProofFetcher;
use crate::chain::{ClaimConditionReader, ContractUriReader, CurrencyDecimals};
use crate::error::{ClaimError, StorageError};
use crate::metadata::ContractMetadataReader;
use crate::storage::{GatewayStorage, Storage};

/// Shared call counter.
#[derive(Debug, Clone, Default)]
pub struct Calls(Arc<AtomicUsize>);

impl Calls {
    pub fn record(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Documents keyed by URI.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    documents: BTreeMap<String, Vec<u8>>,
    pub fetches: Calls,
}

impl MemoryStorage {
    pub fn with_json<T: Serialize>(mut self, uri: &str, document: &T) -> Self {
        self.documents
            .insert(uri.to_owned(), serde_json::to_vec(document).unwrap());
        self
    }

    pub fn with_bytes(mut self, uri: &str, bytes: &[u8]) -> Self {
        self.documents.insert(uri.to_owned(), bytes.to_vec());
        self
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn fetch(&self, uri: &str) -> Result<Vec<u8>, StorageError> {
        self.fetches.record();
        self.documents
            .get(uri)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(uri.to_owned()))
    }
}

/// Local HTTP/1.1 server answering fixed routes; any other path gets a 404.
#[derive(Debug, Clone, Default)]
pub struct HttpStub {
    routes: BTreeMap<String, (u16, Vec<u8>)>,
}

impl HttpStub {
    pub fn route(mut self, path: &str, status: u16, body: &[u8]) -> Self {
        self.routes
            .insert(path.to_owned(), (status, body.to_vec()));
        self
    }

    pub fn json<T: Serialize>(self, path: &str, document: &T) -> Self {
        let body = serde_json::to_vec(document).unwrap();
        self.route(path, 200, &body)
    }

    /// Start serving and return the base URL, e.g. `http://127.0.0.1:40123`.
    pub async fn serve(self) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let routes = Arc::new(self.routes);
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                tokio::spawn(answer(socket, Arc::clone(&routes)));
            }
        });
        base
    }
}

async fn answer(mut socket: TcpStream, routes: Arc<BTreeMap<String, (u16, Vec<u8>)>>) {
    let mut request = Vec::new();
    let mut buf = [0_u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }

    let request = String::from_utf8_lossy(&request);
    let path = request.split_whitespace().nth(1).unwrap_or("/");
    let (status, body) = routes
        .get(path)
        .cloned()
        .unwrap_or((404, b"not found".to_vec()));
    let head = format!(
        "HTTP/1.1 {status} Stub\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
        body.len()
    );
    let _ = socket.write_all(head.as_bytes()).await;
    let _ = socket.write_all(&body).await;
    let _ = socket.shutdown().await;
}

/// Gateway storage that talks to `base` directly, ignoring proxy settings.
pub fn http_storage(base: &str) -> GatewayStorage {
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    GatewayStorage::from_client(client, base)
}

/// Fixed decimals per currency; the native coin is always known.
#[derive(Debug, Clone, Default)]
pub struct FixedDecimals {
    decimals: BTreeMap<Address, u8>,
    calls: Calls,
}

impl FixedDecimals {
    pub fn new(decimals: impl IntoIterator<Item = (Address, u8)>) -> Self {
        Self {
            decimals: decimals.into_iter().collect(),
            calls: Calls::default(),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.count()
    }
}

#[async_trait]
impl CurrencyDecimals for FixedDecimals {
    async fn currency_decimals(&self, currency: Address) -> Result<u8, ClaimError> {
        self.calls.record();
        if dropclaim_core::base::is_native_token(currency) {
            return Ok(dropclaim_core::base::NATIVE_TOKEN_DECIMALS);
        }
        self.decimals
            .get(&currency)
            .copied()
            .ok_or(ClaimError::UnknownDecimals(currency))
    }
}

/// Contract URI reader returning one fixed URI.
#[derive(Debug, Clone)]
pub struct StaticUri(pub String);

#[async_trait]
impl ContractUriReader for StaticUri {
    async fn contract_uri(&self, _contract: Address) -> Result<String, ClaimError> {
        Ok(self.0.clone())
    }
}

/// Condition reader serving one condition; `None` behaves like a drop with no open phase.
#[derive(Debug, Clone, Default)]
pub struct MockConditions {
    pub condition: Option<ClaimCondition>,
    pub active_calls: Calls,
    pub single_phase_calls: Calls,
}

impl MockConditions {
    pub fn new(condition: ClaimCondition) -> Self {
        Self {
            condition: Some(condition),
            ..Self::default()
        }
    }

    fn current(&self, contract: &DropContract) -> Result<ClaimCondition, ClaimError> {
        self.condition
            .clone()
            .ok_or(ClaimError::NoActiveClaimPhase {
                contract: contract.address,
            })
    }
}

#[async_trait]
impl ClaimConditionReader for MockConditions {
    async fn active_claim_condition(
        &self,
        contract: &DropContract,
    ) -> Result<ClaimCondition, ClaimError> {
        self.active_calls.record();
        self.current(contract)
    }

    async fn single_phase_claim_condition(
        &self,
        contract: &DropContract,
    ) -> Result<ClaimCondition, ClaimError> {
        self.single_phase_calls.record();
        self.current(contract)
    }
}

/// Metadata reader serving one document; `None` fails like an unreachable contract URI.
#[derive(Debug, Clone, Default)]
pub struct MockMetadata {
    pub metadata: Option<ContractMetadata>,
    pub calls: Calls,
}

impl MockMetadata {
    pub fn new(metadata: ContractMetadata) -> Self {
        Self {
            metadata: Some(metadata),
            calls: Calls::default(),
        }
    }
}

#[async_trait]
impl ContractMetadataReader for MockMetadata {
    async fn contract_metadata(&self, contract: Address) -> Result<ContractMetadata, ClaimError> {
        self.calls.record();
        self.metadata.clone().ok_or_else(|| ClaimError::Metadata {
            contract,
            source: StorageError::NotFound("contract uri".to_owned()),
        })
    }
}

/// Proof fetcher serving one answer and recording who asked.
#[derive(Debug, Clone, Default)]
pub struct MockAllowlist {
    pub proof: Option<AllowlistProof>,
    pub calls: Calls,
    pub last_request: Arc<Mutex<Option<(String, Address, u8)>>>,
}

impl MockAllowlist {
    pub fn new(proof: Option<AllowlistProof>) -> Self {
        Self {
            proof,
            ..Self::default()
        }
    }

    pub fn last_claimer(&self) -> Option<Address> {
        self.last_request
            .lock()
            .unwrap()
            .as_ref()
            .map(|(_, claimer, _)| *claimer)
    }

    pub fn last_request(&self) -> Option<(String, Address, u8)> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl AllowlistProofFetcher for MockAllowlist {
    async fn fetch_allowlist_proof(
        &self,
        snapshot_uri: &str,
        claimer: Address,
        token_decimals: u8,
    ) -> Result<Option<AllowlistProof>, ClaimError> {
        self.calls.record();
        *self.last_request.lock().unwrap() =
            Some((snapshot_uri.to_owned(), claimer, token_decimals));
        Ok(self.proof.clone())
    }
}
