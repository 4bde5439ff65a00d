//! The artifacts a governance action hands to the snapshot registry.

use alloy_primitives::{Address, B256, Bytes, KECCAK256_EMPTY, U256};
use alloy_trie::{EMPTY_ROOT_HASH, TrieAccount};
use serde::{Deserialize, Serialize};
use snapshop_protocol::{CanonicalHeader, HeaderSchema};

/// A canonically encoded block header, ready for `createBlockSnapshot`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockSnapshot {
    /// The block number.
    pub number: u64,
    /// The keccak-256 hash of [`Self::header`].
    pub hash: B256,
    /// The state root committed to by the header.
    pub state_root: B256,
    /// The schema the header was encoded under.
    pub schema: HeaderSchema,
    /// The canonical header encoding.
    pub header: Bytes,
}

impl From<CanonicalHeader> for BlockSnapshot {
    fn from(canonical: CanonicalHeader) -> Self {
        Self {
            number: canonical.number,
            hash: canonical.hash(),
            state_root: canonical.state_root,
            schema: canonical.schema,
            header: canonical.encoded,
        }
    }
}

/// What an account proof establishes about the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum AccountState {
    /// The proof was verified as an exclusion proof: the account does not exist at the block.
    Absent,
    /// The proof was verified as an inclusion proof of this account leaf.
    Present {
        /// The proven leaf.
        account: TrieAccount,
    },
    /// The proof was not verified; these are the values the node reported.
    Unverified {
        /// The reported leaf.
        account: TrieAccount,
    },
}

impl AccountState {
    /// Returns the account leaf, or the all-default leaf of an absent account.
    pub fn account(&self) -> TrieAccount {
        match self {
            Self::Absent => TrieAccount {
                nonce: 0,
                balance: U256::ZERO,
                storage_root: EMPTY_ROOT_HASH,
                code_hash: KECCAK256_EMPTY,
            },
            Self::Present { account } | Self::Unverified { account } => *account,
        }
    }

    /// Returns `true` if the state was checked against the state root.
    pub const fn is_verified(&self) -> bool {
        !matches!(self, Self::Unverified { .. })
    }
}

/// An account proof at a block, ready for `createAccountSnapshot`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSnapshot {
    /// The block number.
    pub number: u64,
    /// The proven account.
    pub account: Address,
    /// The account proof nodes, root first.
    pub proof: Vec<Bytes>,
    /// What the proof establishes.
    pub state: AccountState,
}

/// A storage proof at a block, ready for `sloadFromSnapshot`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageSnapshot {
    /// The block number.
    pub number: u64,
    /// The account owning the storage.
    pub account: Address,
    /// The proven slot.
    pub slot: B256,
    /// The stored word reported by the node.
    pub value: U256,
    /// The storage proof nodes, storage root first.
    pub proof: Vec<Bytes>,
    /// Whether the value was checked against the state root.
    pub verified: bool,
}
