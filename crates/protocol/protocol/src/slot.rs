//! Storage slot derivation for mapping entries.
//!
//! A value stored at `mapping[key]`, where the mapping occupies base slot `p`, lives at
//! `keccak256(pad32(key) ++ pad32(p))`. Key bytes come first. Swapping the operands yields a
//! well-formed slot that belongs to nothing, so the proof for it is a valid proof of zero.

use crate::{FieldError, FieldValue, fixed_word};
use alloy_primitives::{Address, B256, U256, keccak256};

/// Returns the storage slot of `mapping[key]` for a mapping at `base_slot`.
pub fn map_slot(
    base_slot: impl Into<FieldValue>,
    key: impl Into<FieldValue>,
) -> Result<B256, FieldError> {
    let key = fixed_word(key)?;
    let base_slot = fixed_word(base_slot)?;
    Ok(keccak256([key.as_slice(), base_slot.as_slice()].concat()))
}

/// Returns the storage slot of a holder's entry in an address-keyed mapping, such as an ERC-20
/// `balanceOf` mapping declared at `base_slot`.
pub fn balance_slot(holder: Address, base_slot: U256) -> B256 {
    let mut preimage = [0u8; 64];
    preimage[12..32].copy_from_slice(holder.as_slice());
    preimage[32..].copy_from_slice(&base_slot.to_be_bytes::<32>());
    keccak256(preimage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use alloy_sol_types::SolValue;

    const HOLDER: Address = address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266");

    #[test]
    fn test_matches_abi_layout() {
        for base in [0u64, 1, 3, 51] {
            let expected = keccak256((HOLDER, U256::from(base)).abi_encode());
            assert_eq!(map_slot(base, HOLDER).unwrap(), expected);
            assert_eq!(balance_slot(HOLDER, U256::from(base)), expected);
        }
    }

    #[test]
    fn test_hex_and_typed_inputs_agree() {
        let from_hex = map_slot("0x0", "0xF39FD6E51AAD88F6F4CE6AB8827279CFFFB92266").unwrap();
        assert_eq!(from_hex, balance_slot(HOLDER, U256::ZERO));
    }

    #[test]
    fn test_distinct_keys_give_distinct_slots() {
        let other = address!("70997970c51812dc3a010c7d01b50e0d17dc79c8");
        assert_ne!(map_slot(0u64, HOLDER).unwrap(), map_slot(0u64, other).unwrap());
        assert_ne!(map_slot(0u64, HOLDER).unwrap(), map_slot(1u64, HOLDER).unwrap());
    }

    #[test]
    fn test_operand_order_matters() {
        let slot = map_slot(2u64, 7u64).unwrap();
        assert_ne!(slot, map_slot(7u64, 2u64).unwrap());
        assert_eq!(slot, keccak256((U256::from(7), U256::from(2)).abi_encode()));
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(map_slot(5u64, HOLDER).unwrap(), map_slot(5u64, HOLDER).unwrap());
    }

    #[test]
    fn test_base_slot_requires_hex_prefix() {
        assert_eq!(map_slot("10", HOLDER), Err(FieldError::Malformed("10".to_string())));
        assert_eq!(map_slot("0xa", HOLDER).unwrap(), balance_slot(HOLDER, U256::from(10)));
        assert_ne!(map_slot("0x10", HOLDER).unwrap(), map_slot(10u64, HOLDER).unwrap());
    }

    #[test]
    fn test_oversized_key() {
        let key = format!("0x01{}", "00".repeat(32));
        assert_eq!(map_slot(0u64, key), Err(FieldError::Overflow { width: 32, actual: 33 }));
    }
}
