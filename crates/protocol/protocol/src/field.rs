//! Canonical byte encodings for raw node values.
//!
//! Nodes report every header and proof value as a hexadecimal string of arbitrary padding and
//! case. The verifier needs two exact forms instead:
//!
//! - a *dynamic* form: the minimal big-endian bytes with leading zero bytes stripped, where
//!   zero is the empty string;
//! - a *fixed* form: the dynamic form left-padded with zero bytes to the field's semantic width
//!   (20 for an address, 32 for a hash or word, 256 for a bloom filter, 8 for a nonce).

use crate::FieldError;
use alloy_primitives::{Address, B256, Bytes, U256, hex};

/// The width of a storage word, hash or slot identifier, in bytes.
pub const WORD_WIDTH: usize = 32;

/// A raw value accepted by the field encoders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// A `0x`-prefixed hexadecimal string of any case and padding.
    Hex(String),
    /// An unsigned integer.
    Uint(U256),
    /// Raw bytes.
    Bytes(Bytes),
}

impl FieldValue {
    /// Returns the bytes of the value as given, leading zero bytes included.
    fn into_raw_bytes(self) -> Result<Vec<u8>, FieldError> {
        match self {
            Self::Hex(value) => parse_hex(&value),
            Self::Uint(value) => Ok(value.to_be_bytes_trimmed_vec()),
            Self::Bytes(value) => Ok(value.to_vec()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Hex(value.to_string())
    }
}

impl From<&String> for FieldValue {
    fn from(value: &String) -> Self {
        Self::Hex(value.clone())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Hex(value)
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        Self::Uint(U256::from(value))
    }
}

impl From<U256> for FieldValue {
    fn from(value: U256) -> Self {
        Self::Uint(value)
    }
}

impl From<B256> for FieldValue {
    fn from(value: B256) -> Self {
        Self::Bytes(Bytes::copy_from_slice(value.as_slice()))
    }
}

impl From<Address> for FieldValue {
    fn from(value: Address) -> Self {
        Self::Bytes(Bytes::copy_from_slice(value.as_slice()))
    }
}

impl From<Bytes> for FieldValue {
    fn from(value: Bytes) -> Self {
        Self::Bytes(value)
    }
}

impl From<&[u8]> for FieldValue {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(Bytes::copy_from_slice(value))
    }
}

/// Parses a hexadecimal string into bytes.
///
/// The `0x` prefix is required, digits may be of any case, and an odd number of digits is
/// padded with a single leading zero nibble. `"0x"` parses to no bytes. Unprefixed digits are
/// rejected rather than guessed at, since `"10"` reads as sixteen in hex but ten in decimal.
pub fn parse_hex(value: &str) -> Result<Vec<u8>, FieldError> {
    let malformed = || FieldError::Malformed(value.to_string());
    let digits =
        value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")).ok_or_else(malformed)?;
    if !digits.bytes().all(|digit| digit.is_ascii_hexdigit()) {
        return Err(malformed());
    }

    let decoded = if digits.len() % 2 == 1 {
        hex::decode(format!("0{digits}"))
    } else {
        hex::decode(digits)
    };
    decoded.map_err(|_| malformed())
}

/// Returns the minimal big-endian encoding of an integer. Zero encodes to no bytes.
pub fn uint_field(value: U256) -> Bytes {
    value.to_be_bytes_trimmed_vec().into()
}

/// Encodes a value into its minimal byte representation, with leading zero bytes stripped.
///
/// The integer zero, `"0x0"`, `"0x00"` and `"0x"` all encode to the empty byte string.
pub fn dynamic_field(value: impl Into<FieldValue>) -> Result<Bytes, FieldError> {
    let raw = value.into().into_raw_bytes()?;
    let start = raw.iter().position(|byte| *byte != 0).unwrap_or(raw.len());
    Ok(Bytes::copy_from_slice(&raw[start..]))
}

/// Encodes a value as an opaque byte string, copied verbatim.
///
/// Used for variable-length data such as a header's `extraData`, whose leading zero bytes are
/// part of the hashed value and must survive.
pub fn data_field(value: impl Into<FieldValue>) -> Result<Bytes, FieldError> {
    value.into().into_raw_bytes().map(Bytes::from)
}

/// Encodes a value as exactly `width` bytes: its [`dynamic_field`] encoding left-padded with
/// zero bytes.
///
/// Fails with [`FieldError::Overflow`] when the minimal encoding is already wider than `width`.
pub fn fixed_field(value: impl Into<FieldValue>, width: usize) -> Result<Bytes, FieldError> {
    let dynamic = dynamic_field(value)?;
    if dynamic.len() > width {
        return Err(FieldError::Overflow { width, actual: dynamic.len() });
    }

    let mut padded = vec![0u8; width];
    padded[width - dynamic.len()..].copy_from_slice(&dynamic);
    Ok(padded.into())
}

/// Encodes a value as a 32-byte word.
pub fn fixed_word(value: impl Into<FieldValue>) -> Result<B256, FieldError> {
    fixed_field(value, WORD_WIDTH).map(|word| B256::from_slice(&word))
}

/// Encodes a value as `width` bytes and renders it as a `0x`-prefixed lowercase hex string.
///
/// Node JSON-RPC methods expect hex strings rather than raw bytes, so this is the form handed
/// back to the node (for example the storage keys of an `eth_getProof` query).
pub fn fixed_string(value: impl Into<FieldValue>, width: usize) -> Result<String, FieldError> {
    fixed_field(value, width).map(hex::encode_prefixed)
}

/// Decodes a value into a `u64`, failing if it does not fit.
pub(crate) fn uint_u64(value: impl Into<FieldValue>) -> Result<u64, FieldError> {
    let bytes = fixed_field(value, 8)?;
    let mut word = [0u8; 8];
    word.copy_from_slice(&bytes);
    Ok(u64::from_be_bytes(word))
}

/// Decodes a value into a [`U256`], failing if it does not fit.
pub(crate) fn uint_u256(value: impl Into<FieldValue>) -> Result<U256, FieldError> {
    fixed_word(value).map(|word| U256::from_be_bytes(word.0))
}
