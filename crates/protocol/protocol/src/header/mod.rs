//! Canonical block header encoding.
//!
//! A node reports a block header as a JSON object of hex strings. The verifier recomputes the
//! block hash as the keccak-256 of the header's RLP list encoding, so every field must be
//! re-encoded exactly: in the right order, at the right width, and present only on the forks
//! that introduced it.

mod raw;
pub use raw::RawBlockHeader;

mod schema;
pub use schema::{FieldKind, FieldSpec, ForkSchedule, HeaderSchema};

mod canonical;
pub use canonical::{
    CanonicalHeader, Header, canonicalize, canonicalize_checked, canonicalize_with_schedule,
};
