//! The header object as reported by `eth_getBlockByNumber`.

use serde::{Deserialize, Serialize};

/// A block header exactly as the node reports it.
///
/// Every value is kept as the node's hex string. Unknown members of the block object (such as
/// `transactions` or `size`) are ignored. Fork-specific fields are absent on blocks that predate
/// the fork; their absence, not an empty value, is what the canonical encoding relies on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBlockHeader {
    /// The block hash reported by the node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    /// The parent block hash.
    pub parent_hash: String,
    /// The ommers hash.
    pub sha3_uncles: String,
    /// The beneficiary (coinbase) address.
    pub miner: String,
    /// The state trie root.
    pub state_root: String,
    /// The transactions trie root.
    pub transactions_root: String,
    /// The receipts trie root.
    pub receipts_root: String,
    /// The 256-byte logs bloom filter.
    pub logs_bloom: String,
    /// The block difficulty.
    pub difficulty: String,
    /// The block number.
    pub number: String,
    /// The block gas limit.
    pub gas_limit: String,
    /// The gas used by the block.
    pub gas_used: String,
    /// The block timestamp.
    pub timestamp: String,
    /// Arbitrary producer data.
    pub extra_data: String,
    /// The mix hash, or `prevRandao` after the merge.
    pub mix_hash: String,
    /// The 8-byte proof-of-work nonce.
    pub nonce: String,
    /// The base fee, from London on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_fee_per_gas: Option<String>,
    /// The withdrawals trie root, from Shanghai on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub withdrawals_root: Option<String>,
    /// The blob gas used, from Cancun on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blob_gas_used: Option<String>,
    /// The excess blob gas, from Cancun on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excess_blob_gas: Option<String>,
    /// The parent beacon block root, from Cancun on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_beacon_block_root: Option<String>,
    /// The execution requests hash, from Prague on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requests_hash: Option<String>,
}
