//! Value parsers for positional arguments.

use alloy_primitives::B256;
use snapshop_protocol::{FieldError, fixed_word};

/// Parses a block number given in decimal or as a `0x` quantity.
pub fn parse_block(value: &str) -> Result<u64, String> {
    match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => value.parse(),
    }
    .map_err(|err| format!("invalid block number {value}: {err}"))
}

/// Parses a 32-byte word given as `0x`-prefixed hex of any length up to 32 bytes.
pub fn parse_word(value: &str) -> Result<B256, FieldError> {
    fixed_word(value)
}
