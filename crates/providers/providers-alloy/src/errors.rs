//! Errors returned by the proof providers.

use alloy_primitives::{Address, B256};
use alloy_json_rpc::RpcError;
use alloy_transport::TransportError;
use snapshop_protocol::FieldError;
use std::time::Duration;
use thiserror::Error;

/// Error messages with which nodes reject queries for state they no longer keep.
const PRUNED_STATE_MARKERS: [&str; 5] = [
    "missing trie node",
    "historical state",
    "state is not available",
    "pruned",
    "distance to target block exceeds maximum",
];

/// Error messages with which nodes reject queries for a block they do not know.
const UNKNOWN_BLOCK_MARKERS: [&str; 2] = ["header not found", "unknown block"];

/// JSON-RPC error codes nodes use for rate limiting.
const RATE_LIMIT_CODES: [i64; 2] = [429, -32005];

/// The node could not serve the requested historical state.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The node does not know the block.
    #[error("block {0} not found")]
    BlockNotFound(u64),
    /// The node no longer keeps (or never archived) the state at the block.
    #[error("state at block {block} is not available: {message}")]
    StatePruned {
        /// The queried block.
        block: u64,
        /// The node's error message.
        message: String,
    },
    /// The request did not complete within the configured timeout.
    #[error("node request timed out after {0:?}")]
    Timeout(Duration),
    /// The request failed in transport or was rejected by the node.
    #[error("node request failed: {0}")]
    Transport(#[from] TransportError),
    /// The node answered with an empty account proof, which no state trie can produce.
    #[error("node returned an empty account proof for {0}")]
    EmptyProof(Address),
    /// The node answered with an empty storage proof for an account with non-empty storage.
    #[error("node returned an empty storage proof for slot {slot} of {account}")]
    EmptyStorageProof {
        /// The queried account.
        account: Address,
        /// The queried slot.
        slot: B256,
    },
    /// The node's answer does not correspond to the query.
    #[error("malformed proof response: {0}")]
    MalformedResponse(String),
    /// A request parameter could not be encoded.
    #[error(transparent)]
    Field(#[from] FieldError),
}

impl ProviderError {
    /// Classifies an error returned by the node for a query at `block`.
    pub(crate) fn from_node(block: u64, err: TransportError) -> Self {
        if let RpcError::ErrorResp(payload) = &err {
            let message = payload.message.to_lowercase();
            if PRUNED_STATE_MARKERS.iter().any(|marker| message.contains(marker)) {
                return Self::StatePruned { block, message: payload.message.to_string() };
            }
            if UNKNOWN_BLOCK_MARKERS.iter().any(|marker| message.contains(marker)) {
                return Self::BlockNotFound(block);
            }
        }
        Self::Transport(err)
    }

    /// Returns `true` if retrying the same request may succeed.
    ///
    /// Pruned state, unknown blocks and malformed answers are answers, not failures, and asking
    /// the same node again returns the same thing.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout(_) => true,
            Self::Transport(RpcError::Transport(_)) => true,
            Self::Transport(RpcError::ErrorResp(payload)) => RATE_LIMIT_CODES.contains(&payload.code),
            _ => false,
        }
    }
}
