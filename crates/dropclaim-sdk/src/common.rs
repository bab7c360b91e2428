//! Configuration shared by the command workflows.

use std::time::Duration;

/// Default public IPFS gateway.
pub const DEFAULT_IPFS_GATEWAY: &str = "https://ipfs.io";

/// Default timeout for off-chain document requests.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings used by every command.
#[derive(Debug, Clone)]
pub struct CommonConfig {
    /// JSON-RPC endpoint of the chain. Required by commands that read chain state.
    pub rpc_url: Option<String>,
    /// Gateway used to resolve `ipfs://` URIs.
    pub ipfs_gateway: String,
    /// Timeout applied to every HTTP request.
    pub request_timeout: Duration,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            rpc_url: None,
            ipfs_gateway: DEFAULT_IPFS_GATEWAY.to_owned(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Token standard selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStandard {
    /// ERC-721 drop.
    Erc721,
    /// ERC-20 drop.
    Erc20,
    /// ERC-1155 drop.
    Erc1155,
}
