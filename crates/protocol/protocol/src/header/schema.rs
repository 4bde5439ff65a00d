//! The fork-aware header field table.

use crate::{HeaderError, RawBlockHeader};

/// The encoding rule of a header field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A 32-byte hash, fixed width.
    Hash,
    /// A 20-byte address, fixed width.
    Address,
    /// A 256-byte bloom filter, fixed width.
    Bloom,
    /// An 8-byte nonce, fixed width.
    Nonce,
    /// An unsigned integer, minimal encoding.
    Uint,
    /// An opaque byte string, copied verbatim.
    Data,
}

impl FieldKind {
    /// Returns the fixed width of the field in bytes, or `None` for dynamic fields.
    pub const fn width(self) -> Option<usize> {
        match self {
            Self::Hash => Some(32),
            Self::Address => Some(20),
            Self::Bloom => Some(256),
            Self::Nonce => Some(8),
            Self::Uint | Self::Data => None,
        }
    }
}

/// A named entry of the header field table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// The node-reported (JSON) name of the field.
    pub name: &'static str,
    /// The encoding rule of the field.
    pub kind: FieldKind,
}

impl FieldSpec {
    const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

/// Every header field in canonical order. Each schema encodes a prefix of this table.
const FIELDS: [FieldSpec; 21] = [
    FieldSpec::new("parentHash", FieldKind::Hash),
    FieldSpec::new("sha3Uncles", FieldKind::Hash),
    FieldSpec::new("miner", FieldKind::Address),
    FieldSpec::new("stateRoot", FieldKind::Hash),
    FieldSpec::new("transactionsRoot", FieldKind::Hash),
    FieldSpec::new("receiptsRoot", FieldKind::Hash),
    FieldSpec::new("logsBloom", FieldKind::Bloom),
    FieldSpec::new("difficulty", FieldKind::Uint),
    FieldSpec::new("number", FieldKind::Uint),
    FieldSpec::new("gasLimit", FieldKind::Uint),
    FieldSpec::new("gasUsed", FieldKind::Uint),
    FieldSpec::new("timestamp", FieldKind::Uint),
    FieldSpec::new("extraData", FieldKind::Data),
    FieldSpec::new("mixHash", FieldKind::Hash),
    FieldSpec::new("nonce", FieldKind::Nonce),
    FieldSpec::new("baseFeePerGas", FieldKind::Uint),
    FieldSpec::new("withdrawalsRoot", FieldKind::Hash),
    FieldSpec::new("blobGasUsed", FieldKind::Uint),
    FieldSpec::new("excessBlobGas", FieldKind::Uint),
    FieldSpec::new("parentBeaconBlockRoot", FieldKind::Hash),
    FieldSpec::new("requestsHash", FieldKind::Hash),
];

/// Number of fields shared by every schema.
const BASE_FIELD_COUNT: usize = 15;

/// The set of header fields a block carries, determined by the forks active at that block.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    derive_more::Display,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum HeaderSchema {
    /// Pre-London: the fifteen original fields.
    #[display("frontier")]
    Frontier,
    /// London: adds `baseFeePerGas`.
    #[display("london")]
    London,
    /// Shanghai: adds `withdrawalsRoot`.
    #[display("shanghai")]
    Shanghai,
    /// Cancun: adds `blobGasUsed`, `excessBlobGas` and `parentBeaconBlockRoot`.
    #[display("cancun")]
    Cancun,
    /// Prague: adds `requestsHash`.
    #[display("prague")]
    Prague,
}

impl HeaderSchema {
    /// Returns the number of fields encoded under this schema.
    pub const fn field_count(self) -> usize {
        match self {
            Self::Frontier => BASE_FIELD_COUNT,
            Self::London => BASE_FIELD_COUNT + 1,
            Self::Shanghai => BASE_FIELD_COUNT + 2,
            Self::Cancun => BASE_FIELD_COUNT + 5,
            Self::Prague => BASE_FIELD_COUNT + 6,
        }
    }

    /// Returns the ordered field table of this schema.
    pub fn fields(self) -> &'static [FieldSpec] {
        &FIELDS[..self.field_count()]
    }

    /// Selects the schema from the fork-specific fields present on a raw header.
    pub fn detect(raw: &RawBlockHeader) -> Result<Self, HeaderError> {
        Self::from_presence([
            raw.base_fee_per_gas.is_some(),
            raw.withdrawals_root.is_some(),
            raw.blob_gas_used.is_some(),
            raw.excess_blob_gas.is_some(),
            raw.parent_beacon_block_root.is_some(),
            raw.requests_hash.is_some(),
        ])
    }

    /// Selects the schema from the presence of each fork-specific field, in table order.
    ///
    /// Fork fields accumulate: a field may only be present if every field before it is, and the
    /// fields introduced together by one fork are present together.
    pub(crate) fn from_presence(present: [bool; 6]) -> Result<Self, HeaderError> {
        let count = present.iter().take_while(|present| **present).count();

        if let Some(stray) = present[count..].iter().position(|present| *present) {
            return Err(HeaderError::InconsistentSchema {
                present: FIELDS[BASE_FIELD_COUNT + count + stray].name,
                missing: FIELDS[BASE_FIELD_COUNT + count].name,
            });
        }

        match count {
            0 => Ok(Self::Frontier),
            1 => Ok(Self::London),
            2 => Ok(Self::Shanghai),
            5 => Ok(Self::Cancun),
            6 => Ok(Self::Prague),
            partial => Err(HeaderError::InconsistentSchema {
                present: FIELDS[BASE_FIELD_COUNT + partial - 1].name,
                missing: FIELDS[BASE_FIELD_COUNT + partial].name,
            }),
        }
    }
}

/// Fork activation points of a chain, used to select the expected [`HeaderSchema`] of a block.
///
/// London activates by block number; later forks activate by timestamp. A `None` activation
/// means the fork never activates on this chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ForkSchedule {
    /// The first block carrying `baseFeePerGas`.
    pub london_block: Option<u64>,
    /// The first timestamp carrying `withdrawalsRoot`.
    pub shanghai_time: Option<u64>,
    /// The first timestamp carrying the blob gas fields and `parentBeaconBlockRoot`.
    pub cancun_time: Option<u64>,
    /// The first timestamp carrying `requestsHash`.
    pub prague_time: Option<u64>,
}

impl ForkSchedule {
    /// The Ethereum mainnet fork schedule.
    pub const MAINNET: Self = Self {
        london_block: Some(12_965_000),
        shanghai_time: Some(1_681_338_455),
        cancun_time: Some(1_710_338_135),
        prague_time: Some(1_746_612_311),
    };

    /// Returns the schema a header at the given block number and timestamp must use.
    pub const fn schema_at(&self, number: u64, timestamp: u64) -> HeaderSchema {
        const fn active(activation: Option<u64>, at: u64) -> bool {
            matches!(activation, Some(activation) if at >= activation)
        }

        if active(self.prague_time, timestamp) {
            HeaderSchema::Prague
        } else if active(self.cancun_time, timestamp) {
            HeaderSchema::Cancun
        } else if active(self.shanghai_time, timestamp) {
            HeaderSchema::Shanghai
        } else if active(self.london_block, number) {
            HeaderSchema::London
        } else {
            HeaderSchema::Frontier
        }
    }
}
