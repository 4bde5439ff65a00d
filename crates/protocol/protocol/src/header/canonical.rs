//! Typed headers and their canonical RLP encoding.

use crate::{
    FieldError, ForkSchedule, HeaderError, HeaderSchema, RawBlockHeader,
    field::{data_field, fixed_field, fixed_word, uint_field, uint_u64, uint_u256},
};
use alloy_primitives::{Address, B64, B256, Bloom, Bytes, U256, keccak256};
use alloy_rlp::Encodable;
use tracing::{debug, trace};

/// A block header with every field coerced to its semantic type.
///
/// Fixed-width fields are held in fixed-size types, so a field of the wrong width cannot be
/// constructed. Fork-specific fields are `None` on blocks that predate the fork.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    /// The parent block hash.
    pub parent_hash: B256,
    /// The ommers hash.
    pub ommers_hash: B256,
    /// The beneficiary address.
    pub beneficiary: Address,
    /// The state trie root.
    pub state_root: B256,
    /// The transactions trie root.
    pub transactions_root: B256,
    /// The receipts trie root.
    pub receipts_root: B256,
    /// The logs bloom filter.
    pub logs_bloom: Bloom,
    /// The block difficulty.
    pub difficulty: U256,
    /// The block number.
    pub number: u64,
    /// The block gas limit.
    pub gas_limit: u64,
    /// The gas used by the block.
    pub gas_used: u64,
    /// The block timestamp.
    pub timestamp: u64,
    /// Arbitrary producer data.
    pub extra_data: Bytes,
    /// The mix hash.
    pub mix_hash: B256,
    /// The proof-of-work nonce.
    pub nonce: B64,
    /// The base fee (London).
    pub base_fee_per_gas: Option<u64>,
    /// The withdrawals trie root (Shanghai).
    pub withdrawals_root: Option<B256>,
    /// The blob gas used (Cancun).
    pub blob_gas_used: Option<u64>,
    /// The excess blob gas (Cancun).
    pub excess_blob_gas: Option<u64>,
    /// The parent beacon block root (Cancun).
    pub parent_beacon_block_root: Option<B256>,
    /// The execution requests hash (Prague).
    pub requests_hash: Option<B256>,
}

impl Header {
    /// Returns the schema implied by the fork-specific fields present on this header.
    pub fn schema(&self) -> Result<HeaderSchema, HeaderError> {
        HeaderSchema::from_presence([
            self.base_fee_per_gas.is_some(),
            self.withdrawals_root.is_some(),
            self.blob_gas_used.is_some(),
            self.excess_blob_gas.is_some(),
            self.parent_beacon_block_root.is_some(),
            self.requests_hash.is_some(),
        ])
    }

    /// Returns the encoded fields of the header, in canonical order.
    ///
    /// Fixed-width fields are emitted at full width, integers in minimal form, and `extraData`
    /// verbatim. Fork-specific fields are emitted only when present.
    pub fn encoded_fields(&self) -> Vec<Bytes> {
        let hash = |value: &B256| Bytes::copy_from_slice(value.as_slice());
        let uint = |value: u64| uint_field(U256::from(value));

        let mut fields = vec![
            hash(&self.parent_hash),
            hash(&self.ommers_hash),
            Bytes::copy_from_slice(self.beneficiary.as_slice()),
            hash(&self.state_root),
            hash(&self.transactions_root),
            hash(&self.receipts_root),
            Bytes::copy_from_slice(self.logs_bloom.as_slice()),
            uint_field(self.difficulty),
            uint(self.number),
            uint(self.gas_limit),
            uint(self.gas_used),
            uint(self.timestamp),
            self.extra_data.clone(),
            hash(&self.mix_hash),
            Bytes::copy_from_slice(self.nonce.as_slice()),
        ];
        fields.extend(self.base_fee_per_gas.map(uint));
        fields.extend(self.withdrawals_root.as_ref().map(hash));
        fields.extend(self.blob_gas_used.map(uint));
        fields.extend(self.excess_blob_gas.map(uint));
        fields.extend(self.parent_beacon_block_root.as_ref().map(hash));
        fields.extend(self.requests_hash.as_ref().map(hash));
        fields
    }

    /// Returns the RLP list encoding of [`Self::encoded_fields`].
    pub fn encode_canonical(&self) -> Bytes {
        let fields = self.encoded_fields();
        let payload_length = fields.iter().map(Encodable::length).sum();

        let mut out = Vec::with_capacity(payload_length + alloy_rlp::length_of_length(payload_length));
        alloy_rlp::Header { list: true, payload_length }.encode(&mut out);
        for field in &fields {
            field.encode(&mut out);
        }
        out.into()
    }

    /// Returns the keccak-256 hash of the canonical encoding.
    pub fn hash_slow(&self) -> B256 {
        keccak256(self.encode_canonical())
    }

    /// Encodes the header under the schema implied by its fork-specific fields.
    pub fn canonical(&self) -> Result<CanonicalHeader, HeaderError> {
        let schema = self.schema()?;
        let encoded = self.encode_canonical();

        trace!(
            target: "protocol::header",
            number = self.number,
            %schema,
            len = encoded.len(),
            "Canonicalized block header"
        );
        Ok(CanonicalHeader { schema, number: self.number, state_root: self.state_root, encoded })
    }
}

impl TryFrom<&RawBlockHeader> for Header {
    type Error = HeaderError;

    fn try_from(raw: &RawBlockHeader) -> Result<Self, Self::Error> {
        fn optional<T>(
            value: Option<&String>,
            name: &'static str,
            decode: impl Fn(&String) -> Result<T, FieldError>,
        ) -> Result<Option<T>, HeaderError> {
            value.map(decode).transpose().map_err(HeaderError::field(name))
        }

        let hash = |value: &String, name| fixed_word(value).map_err(HeaderError::field(name));
        let uint = |value: &String, name| uint_u64(value).map_err(HeaderError::field(name));

        Ok(Self {
            parent_hash: hash(&raw.parent_hash, "parentHash")?,
            ommers_hash: hash(&raw.sha3_uncles, "sha3Uncles")?,
            beneficiary: fixed_field(&raw.miner, 20)
                .map(|address| Address::from_slice(&address))
                .map_err(HeaderError::field("miner"))?,
            state_root: hash(&raw.state_root, "stateRoot")?,
            transactions_root: hash(&raw.transactions_root, "transactionsRoot")?,
            receipts_root: hash(&raw.receipts_root, "receiptsRoot")?,
            logs_bloom: fixed_field(&raw.logs_bloom, 256)
                .map(|bloom| Bloom::from_slice(&bloom))
                .map_err(HeaderError::field("logsBloom"))?,
            difficulty: uint_u256(&raw.difficulty).map_err(HeaderError::field("difficulty"))?,
            number: uint(&raw.number, "number")?,
            gas_limit: uint(&raw.gas_limit, "gasLimit")?,
            gas_used: uint(&raw.gas_used, "gasUsed")?,
            timestamp: uint(&raw.timestamp, "timestamp")?,
            extra_data: data_field(&raw.extra_data).map_err(HeaderError::field("extraData"))?,
            mix_hash: hash(&raw.mix_hash, "mixHash")?,
            nonce: fixed_field(&raw.nonce, 8)
                .map(|nonce| B64::from_slice(&nonce))
                .map_err(HeaderError::field("nonce"))?,
            base_fee_per_gas: optional(raw.base_fee_per_gas.as_ref(), "baseFeePerGas", |v| {
                uint_u64(v)
            })?,
            withdrawals_root: optional(raw.withdrawals_root.as_ref(), "withdrawalsRoot", |v| {
                fixed_word(v)
            })?,
            blob_gas_used: optional(raw.blob_gas_used.as_ref(), "blobGasUsed", |v| uint_u64(v))?,
            excess_blob_gas: optional(raw.excess_blob_gas.as_ref(), "excessBlobGas", |v| {
                uint_u64(v)
            })?,
            parent_beacon_block_root: optional(
                raw.parent_beacon_block_root.as_ref(),
                "parentBeaconBlockRoot",
                |v| fixed_word(v),
            )?,
            requests_hash: optional(raw.requests_hash.as_ref(), "requestsHash", |v| {
                fixed_word(v)
            })?,
        })
    }
}

/// The canonical encoding of a block header, as handed to the verifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalHeader {
    /// The schema the header was encoded under.
    pub schema: HeaderSchema,
    /// The block number.
    pub number: u64,
    /// The state root committed to by the header.
    pub state_root: B256,
    /// The RLP list encoding of the header fields.
    pub encoded: Bytes,
}

impl CanonicalHeader {
    /// Returns the keccak-256 hash of the encoding, which is the block hash.
    pub fn hash(&self) -> B256 {
        keccak256(&self.encoded)
    }
}

/// Canonicalizes a raw header.
///
/// The result is not checked against the node-reported hash; see [`canonicalize_checked`].
pub fn canonicalize(raw: &RawBlockHeader) -> Result<CanonicalHeader, HeaderError> {
    Header::try_from(raw)?.canonical()
}

/// Canonicalizes a raw header and checks that it hashes to the node-reported block hash.
///
/// Any difference means the field table, a width, or fork detection is wrong for this block, and
/// fails with [`HeaderError::CanonicalizationMismatch`].
pub fn canonicalize_checked(raw: &RawBlockHeader) -> Result<CanonicalHeader, HeaderError> {
    let expected = raw.hash.as_ref().ok_or(HeaderError::MissingField("hash"))?;
    let expected = fixed_word(expected).map_err(HeaderError::field("hash"))?;

    let canonical = canonicalize(raw)?;
    let computed = canonical.hash();
    if computed != expected {
        return Err(HeaderError::CanonicalizationMismatch { expected, computed });
    }

    debug!(target: "protocol::header", number = canonical.number, hash = %computed, "Header hash verified");
    Ok(canonical)
}

/// Canonicalizes a raw header, requiring its fields to match the schema scheduled for its block.
pub fn canonicalize_with_schedule(
    raw: &RawBlockHeader,
    schedule: &ForkSchedule,
) -> Result<CanonicalHeader, HeaderError> {
    let header = Header::try_from(raw)?;
    let canonical = header.canonical()?;
    let expected = schedule.schema_at(header.number, header.timestamp);
    if canonical.schema != expected {
        return Err(HeaderError::SchemaMismatch {
            number: header.number,
            detected: canonical.schema,
            expected,
        });
    }
    Ok(canonical)
}
