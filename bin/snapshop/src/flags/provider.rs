//! Node connection arguments.

use clap::Parser;
use snapshop_providers_alloy::{AlloyProofProvider, ProviderConfig};
use url::Url;

/// Arguments for the archive node that serves headers and proofs.
#[derive(Parser, Clone, Debug)]
pub struct ProviderArgs {
    /// URL of the node's JSON-RPC API. The node must keep the state of the queried blocks.
    #[arg(long = "rpc-url", global = true, env = "SNAPSHOP_RPC_URL", default_value = "http://127.0.0.1:8545")]
    pub rpc_url: Url,
    /// Timeout of a single node request, in milliseconds.
    #[arg(long = "timeout-ms", global = true, default_value_t = ProviderConfig::default().timeout_ms)]
    pub timeout_ms: u64,
    /// Number of times a request failing transiently is retried.
    #[arg(long = "max-retries", global = true, default_value_t = ProviderConfig::default().max_retries)]
    pub max_retries: usize,
    /// Delay before the first retry, in milliseconds. Later retries back off exponentially.
    #[arg(
        long = "retry-backoff-ms",
        global = true,
        default_value_t = ProviderConfig::default().retry_backoff_ms
    )]
    pub retry_backoff_ms: u64,
}

impl ProviderArgs {
    /// Returns the request configuration.
    pub const fn config(&self) -> ProviderConfig {
        ProviderConfig {
            timeout_ms: self.timeout_ms,
            max_retries: self.max_retries,
            retry_backoff_ms: self.retry_backoff_ms,
        }
    }

    /// Returns a proof provider for the configured node.
    pub fn proof_provider(&self) -> AlloyProofProvider {
        AlloyProofProvider::new_http(self.rpc_url.clone(), self.config())
    }
}
