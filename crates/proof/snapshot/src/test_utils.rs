//! Test utilities: single-leaf tries with real proofs, and an in-memory [`ProofProvider`].

use alloy_primitives::{Address, B256, Bytes, KECCAK256_EMPTY, U256, address, keccak256};
use alloy_rlp::Encodable;
use alloy_trie::{EMPTY_ROOT_HASH, TrieAccount};
use async_trait::async_trait;
use snapshop_protocol::{RawBlockHeader, canonicalize};
use snapshop_providers_alloy::{AccountProof, ProofProvider, ProviderError, StorageProof};
use std::sync::atomic::{AtomicUsize, Ordering};

/// The only account in the fixture state trie.
pub(crate) const TOKEN: Address = address!("5fbdb2315678afecb367f032d93f642f64180aa3");

/// An account absent from the fixture state trie.
pub(crate) const OUTSIDER: Address = address!("70997970c51812dc3a010c7d01b50e0d17dc79c8");

/// The block the fixture state belongs to.
pub(crate) const BLOCK: u64 = 16_000_000;

/// Encodes a leaf node holding `value` at the full path `hashed_key`.
pub(crate) fn leaf_node(hashed_key: B256, value: &[u8]) -> Bytes {
    let mut path = Vec::with_capacity(33);
    path.push(0x20);
    path.extend_from_slice(hashed_key.as_slice());

    let mut out = Vec::new();
    alloy_rlp::Header { list: true, payload_length: path.as_slice().length() + value.length() }
        .encode(&mut out);
    path.as_slice().encode(&mut out);
    value.encode(&mut out);
    out.into()
}

/// A state trie holding only [`TOKEN`], whose storage trie holds only `slot`.
#[derive(Debug, Clone)]
pub(crate) struct TokenState {
    pub(crate) slot: B256,
    pub(crate) value: U256,
    pub(crate) storage_node: Bytes,
    pub(crate) account: TrieAccount,
    pub(crate) account_node: Bytes,
    pub(crate) state_root: B256,
}

impl TokenState {
    pub(crate) fn new(slot: B256, value: U256) -> Self {
        let storage_node = leaf_node(keccak256(slot), &alloy_rlp::encode(value));
        let account = TrieAccount {
            nonce: 1,
            balance: U256::ZERO,
            storage_root: keccak256(&storage_node),
            code_hash: keccak256(b"token"),
        };
        let account_node = leaf_node(keccak256(TOKEN), &alloy_rlp::encode(account));
        let state_root = keccak256(&account_node);
        Self { slot, value, storage_node, account, account_node, state_root }
    }

    /// Returns the `eth_getProof` answer for `account` and `slots`.
    pub(crate) fn proof(&self, account: Address, slots: &[B256]) -> AccountProof {
        if account != TOKEN {
            return AccountProof {
                address: account,
                balance: U256::ZERO,
                nonce: 0,
                code_hash: KECCAK256_EMPTY,
                storage_hash: EMPTY_ROOT_HASH,
                account_proof: vec![self.account_node.clone()],
                storage_proof: slots
                    .iter()
                    .map(|slot| StorageProof { key: *slot, value: U256::ZERO, proof: vec![] })
                    .collect(),
            };
        }

        AccountProof {
            address: TOKEN,
            balance: self.account.balance,
            nonce: self.account.nonce,
            code_hash: self.account.code_hash,
            storage_hash: self.account.storage_root,
            account_proof: vec![self.account_node.clone()],
            storage_proof: slots
                .iter()
                .map(|slot| StorageProof {
                    key: *slot,
                    value: if *slot == self.slot { self.value } else { U256::ZERO },
                    proof: vec![self.storage_node.clone()],
                })
                .collect(),
        }
    }

    /// Returns a post-London header of [`BLOCK`] committing to this state.
    pub(crate) fn header(&self) -> RawBlockHeader {
        let mut raw = RawBlockHeader {
            hash: None,
            parent_hash: format!("{}", B256::with_last_byte(1)),
            sha3_uncles: "0x1dcc4de8dec75d7aab85b567b6ccd41ad312451b948a7413f0a142fd40d49347"
                .to_string(),
            miner: "0x95222290dd7278aa3ddd389cc1e1d165cc4bafe5".to_string(),
            state_root: format!("{}", self.state_root),
            transactions_root: format!("{}", B256::with_last_byte(2)),
            receipts_root: format!("{}", B256::with_last_byte(3)),
            logs_bloom: "0x0".to_string(),
            difficulty: "0x0".to_string(),
            number: format!("{BLOCK:#x}"),
            gas_limit: "0x1c9c380".to_string(),
            gas_used: "0x0".to_string(),
            timestamp: "0x6422c400".to_string(),
            extra_data: "0x".to_string(),
            mix_hash: format!("{}", B256::with_last_byte(4)),
            nonce: "0x0000000000000000".to_string(),
            base_fee_per_gas: Some("0x3b9aca00".to_string()),
            ..Default::default()
        };
        raw.hash = canonicalize(&raw).ok().map(|canonical| format!("{}", canonical.hash()));
        raw
    }
}

/// An in-memory [`ProofProvider`] serving a [`TokenState`] at [`BLOCK`].
#[derive(Debug)]
pub(crate) struct FixtureProvider {
    pub(crate) state: TokenState,
    pub(crate) header: RawBlockHeader,
    pub(crate) proof_requests: AtomicUsize,
}

impl FixtureProvider {
    pub(crate) fn new(state: TokenState) -> Self {
        let header = state.header();
        Self { state, header, proof_requests: AtomicUsize::new(0) }
    }

    pub(crate) fn proof_requests(&self) -> usize {
        self.proof_requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProofProvider for FixtureProvider {
    async fn raw_header(&self, block: u64) -> Result<RawBlockHeader, ProviderError> {
        if block != BLOCK {
            return Err(ProviderError::BlockNotFound(block));
        }
        Ok(self.header.clone())
    }

    async fn proof(
        &self,
        block: u64,
        account: Address,
        slots: &[B256],
    ) -> Result<AccountProof, ProviderError> {
        self.proof_requests.fetch_add(1, Ordering::SeqCst);
        if block != BLOCK {
            return Err(ProviderError::StatePruned { block, message: "missing trie node".into() });
        }
        let proof = self.state.proof(account, slots);
        proof.validate(account, slots)?;
        Ok(proof)
    }
}
