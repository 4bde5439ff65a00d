//! Local verification of node-supplied Merkle-Patricia proofs.
//!
//! The on-chain verifier performs the same walks. Running them here catches a bad proof before a
//! transaction is spent on it.

use crate::{AccountState, VerifyError};
use alloy_primitives::{Address, B256, keccak256};
use alloy_trie::{EMPTY_ROOT_HASH, Nibbles, TrieAccount, proof::verify_proof};
use snapshop_providers_alloy::{AccountProof, StorageProof};

/// Walks the account proof from `state_root`.
///
/// A node reporting the all-default account backs it either with an exclusion proof, which
/// yields [`AccountState::Absent`], or with the inclusion proof of an empty leaf left over from
/// before empty accounts were pruned, which yields [`AccountState::Present`]. Any other report
/// must be proven leaf for leaf, which yields [`AccountState::Present`].
pub fn verify_account(state_root: B256, proof: &AccountProof) -> Result<AccountState, VerifyError> {
    let walk = |expected: Option<Vec<u8>>| {
        let key = Nibbles::unpack(keccak256(proof.address));
        verify_proof(state_root, key, expected, &proof.account_proof)
            .map_err(|reason| VerifyError::Account { account: proof.address, reason })
    };

    if !proof.is_empty_account() {
        let account = TrieAccount {
            nonce: proof.nonce,
            balance: proof.balance,
            storage_root: proof.storage_hash,
            code_hash: proof.code_hash,
        };
        walk(Some(alloy_rlp::encode(account)))?;
        return Ok(AccountState::Present { account });
    }

    let excluded = walk(None);
    let empty = AccountState::Absent.account();
    if excluded.is_err() && walk(Some(alloy_rlp::encode(empty))).is_ok() {
        return Ok(AccountState::Present { account: empty });
    }
    excluded.map(|()| AccountState::Absent)
}

/// Walks a storage proof from `storage_root`. A zero value must be backed by an exclusion proof.
pub fn verify_storage(
    account: Address,
    storage_root: B256,
    storage: &StorageProof,
) -> Result<(), VerifyError> {
    let root = if storage_root.is_zero() { EMPTY_ROOT_HASH } else { storage_root };
    let expected = (!storage.value.is_zero()).then(|| alloy_rlp::encode(storage.value));

    verify_proof(root, Nibbles::unpack(keccak256(storage.key)), expected, &storage.proof)
        .map_err(|reason| VerifyError::Storage { account, slot: storage.key, reason })
}

/// Walks the proof of `slot` in `proof` from the account's storage root.
pub fn verify_slot(proof: &AccountProof, slot: B256) -> Result<(), VerifyError> {
    let storage = proof
        .storage(slot)
        .ok_or(VerifyError::MissingStorageProof { account: proof.address, slot })?;
    verify_storage(proof.address, proof.storage_hash, storage)
}
