//! `eth_getProof` response types.

use crate::ProviderError;
use alloy_primitives::{Address, B256, Bytes, KECCAK256_EMPTY, U256};
use alloy_trie::EMPTY_ROOT_HASH;
use serde::{Deserialize, Deserializer, Serialize};
use snapshop_protocol::fixed_word;

/// An account's Merkle-Patricia proof at a block, with the proofs of the requested slots.
///
/// See [EIP-1186](https://eips.ethereum.org/EIPS/eip-1186).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountProof {
    /// The proven account.
    pub address: Address,
    /// The account balance reported by the node.
    pub balance: U256,
    /// The account nonce reported by the node.
    #[serde(with = "alloy_serde::quantity")]
    pub nonce: u64,
    /// The hash of the account code.
    pub code_hash: B256,
    /// The root of the account's storage trie.
    pub storage_hash: B256,
    /// RLP-encoded state trie nodes on the path from the state root to the account leaf.
    pub account_proof: Vec<Bytes>,
    /// The proofs of the requested storage slots, in request order.
    pub storage_proof: Vec<StorageProof>,
}

/// A storage slot's Merkle-Patricia proof from the account's storage root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageProof {
    /// The proven slot, normalized to 32 bytes.
    #[serde(deserialize_with = "deserialize_storage_key")]
    pub key: B256,
    /// The stored word. Zero for an unset slot.
    pub value: U256,
    /// RLP-encoded storage trie nodes on the path from the storage root to the slot.
    pub proof: Vec<Bytes>,
}

/// Nodes echo storage keys either as given or as minimal quantities.
fn deserialize_storage_key<'de, D: Deserializer<'de>>(deserializer: D) -> Result<B256, D::Error> {
    let key = String::deserialize(deserializer)?;
    fixed_word(key.as_str()).map_err(serde::de::Error::custom)
}

impl AccountProof {
    /// Returns `true` if the node reports the all-default account, as it does for an account
    /// that does not exist.
    ///
    /// Nodes differ in how they report the hashes of an absent account: either as the hashes of
    /// empty code and an empty trie, or as zero.
    pub fn is_empty_account(&self) -> bool {
        self.nonce == 0 &&
            self.balance.is_zero() &&
            (self.code_hash == KECCAK256_EMPTY || self.code_hash.is_zero()) &&
            (self.storage_hash == EMPTY_ROOT_HASH || self.storage_hash.is_zero())
    }

    /// Returns the proof of `slot`, if it was requested.
    pub fn storage(&self, slot: B256) -> Option<&StorageProof> {
        self.storage_proof.iter().find(|proof| proof.key == slot)
    }

    /// Checks that the response answers the query for `account` and `slots`.
    ///
    /// An empty account proof is rejected: even an account that does not exist is answered with
    /// the trie nodes proving its absence. An empty storage proof is accepted only for an account
    /// whose storage trie is empty, where it is the valid proof of a zero value.
    pub fn validate(&self, account: Address, slots: &[B256]) -> Result<(), ProviderError> {
        if self.address != account {
            return Err(ProviderError::MalformedResponse(format!(
                "requested proof for {account}, node returned {}",
                self.address
            )));
        }
        if self.account_proof.is_empty() {
            return Err(ProviderError::EmptyProof(account));
        }
        if self.storage_proof.len() != slots.len() {
            return Err(ProviderError::MalformedResponse(format!(
                "requested {} storage proofs, node returned {}",
                slots.len(),
                self.storage_proof.len()
            )));
        }

        let empty_storage = self.storage_hash == EMPTY_ROOT_HASH || self.storage_hash.is_zero();
        for (proof, slot) in self.storage_proof.iter().zip(slots) {
            if proof.key != *slot {
                return Err(ProviderError::MalformedResponse(format!(
                    "requested slot {slot}, node returned {}",
                    proof.key
                )));
            }
            if proof.proof.is_empty() && !empty_storage {
                return Err(ProviderError::EmptyStorageProof { account, slot: *slot });
            }
        }
        Ok(())
    }
}
