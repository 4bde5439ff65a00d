//! # snapshop-protocol
//!
//! Byte-exact encodings consumed by an on-chain snapshot verifier.
//!
//! The verifier trusts nothing it cannot re-derive: it recomputes a block hash from the header
//! bytes it is handed and walks Merkle-Patricia proofs against the state root inside them. This
//! crate produces those bytes.
//!
//! - [`field`]: fixed-width and minimal ("dynamic") encodings of raw node values.
//! - [`header`]: a fork-aware canonical header encoding whose keccak-256 equals the block hash.
//! - [`slot`]: storage slot derivation for values stored inside a key-indexed mapping.
//!
//! ## Example
//!
//! ```rust
//! use alloy_primitives::{U256, address};
//! use snapshop_protocol::{balance_slot, fixed_string};
//!
//! let holder = address!("00000000000000000000000000000000000000aa");
//! let slot = balance_slot(holder, U256::ZERO);
//! let request_key = fixed_string(slot, 32).unwrap();
//! assert_eq!(request_key.len(), 66);
//! ```

#![doc(issue_tracker_base_url = "https://github.com/snapshop-rs/snapshop/issues/")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod errors;
pub use errors::{FieldError, HeaderError};

pub mod field;
pub use field::{
    FieldValue, WORD_WIDTH, data_field, dynamic_field, fixed_field, fixed_string, fixed_word,
    parse_hex, uint_field,
};

pub mod header;
pub use header::{
    CanonicalHeader, FieldKind, FieldSpec, ForkSchedule, Header, HeaderSchema, RawBlockHeader,
    canonicalize, canonicalize_checked, canonicalize_with_schedule,
};

pub mod slot;
pub use slot::{balance_slot, map_slot};
