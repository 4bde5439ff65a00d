//! Errors for the snapshot crate.

use alloy_primitives::{Address, B256, TxHash};
use alloy_trie::proof::ProofVerificationError;
use alloy_transport::TransportError;
use snapshop_protocol::HeaderError;
use snapshop_providers_alloy::ProviderError;
use thiserror::Error;

/// A proof returned by the node does not walk to the value it claims.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// The account proof does not prove the reported account state under the state root.
    #[error("account proof for {account} does not verify: {reason}")]
    Account {
        /// The proven account.
        account: Address,
        /// The trie walk failure.
        reason: ProofVerificationError,
    },
    /// The storage proof does not prove the reported value under the storage root.
    #[error("storage proof for slot {slot} of {account} does not verify: {reason}")]
    Storage {
        /// The proven account.
        account: Address,
        /// The proven slot.
        slot: B256,
        /// The trie walk failure.
        reason: ProofVerificationError,
    },
    /// The proof response does not contain the requested slot.
    #[error("no storage proof for slot {slot} of {account}")]
    MissingStorageProof {
        /// The proven account.
        account: Address,
        /// The missing slot.
        slot: B256,
    },
}

/// The registry rejected or failed to process a snapshot submission.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The call could not be delivered to the node.
    #[error("registry call failed: {0}")]
    Transport(#[from] TransportError),
    /// The submission was mined but reverted: the registry rejected the artifact.
    #[error("registry transaction {0} reverted")]
    Reverted(TxHash),
    /// The submission was not mined within the receipt polling window.
    #[error("registry transaction {0} was not mined in time")]
    Unconfirmed(TxHash),
    /// The registry returned data that is not a 32-byte word.
    #[error("registry returned {0} bytes, expected a 32-byte word")]
    InvalidReturn(usize),
}

/// A snapshot could not be assembled or submitted.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The block header could not be canonicalized.
    #[error(transparent)]
    Header(#[from] HeaderError),
    /// The node could not serve the header or proof.
    #[error(transparent)]
    Provider(#[from] ProviderError),
    /// The self-check rejected a proof.
    #[error(transparent)]
    Verify(#[from] VerifyError),
    /// The registry rejected the snapshot.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}
