//! Error types for the protocol encodings.

use crate::HeaderSchema;
use alloy_primitives::B256;
use thiserror::Error;

/// An error produced while coercing a raw value into its canonical byte form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The value cannot be interpreted as bytes.
    #[error("malformed field value: {0:?}")]
    Malformed(String),
    /// The minimal encoding of the value is wider than the declared fixed width.
    #[error("value of {actual} bytes overflows the fixed width of {width} bytes")]
    Overflow {
        /// The declared width, in bytes.
        width: usize,
        /// The width of the minimal encoding, in bytes.
        actual: usize,
    },
}

/// An error produced while canonicalizing a block header.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    /// A header field could not be encoded.
    #[error("invalid header field `{field}`: {source}")]
    Field {
        /// The node-reported name of the field.
        field: &'static str,
        /// The underlying encoding error.
        #[source]
        source: FieldError,
    },
    /// A field required by the requested operation is absent.
    #[error("missing header field `{0}`")]
    MissingField(&'static str),
    /// A fork-specific field is present without the fields of the forks preceding it.
    #[error("header field `{present}` is present but `{missing}` is not")]
    InconsistentSchema {
        /// The later-fork field that was found.
        present: &'static str,
        /// The earlier-fork field that is missing.
        missing: &'static str,
    },
    /// The schema detected from field presence differs from the scheduled one.
    #[error("block {number} carries a {detected} header but the fork schedule expects {expected}")]
    SchemaMismatch {
        /// The block number.
        number: u64,
        /// The schema detected from field presence.
        detected: HeaderSchema,
        /// The schema selected by the fork schedule.
        expected: HeaderSchema,
    },
    /// The canonical encoding does not hash to the node-reported block hash.
    #[error("canonical header hashes to {computed}, node reported {expected}")]
    CanonicalizationMismatch {
        /// The node-reported block hash.
        expected: B256,
        /// The keccak-256 of the canonical encoding.
        computed: B256,
    },
}

impl HeaderError {
    /// Returns a closure tagging a [`FieldError`] with the name of the field it came from.
    pub(crate) fn field(field: &'static str) -> impl Fn(FieldError) -> Self {
        move |source| Self::Field { field, source }
    }
}
