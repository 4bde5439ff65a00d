#![doc = "Alloy backed providers for historical block headers and Merkle-Patricia state proofs."]
#![doc = ""]
#![doc = "The [`ProofProvider`] trait is the only I/O boundary of the snapshot pipeline: one"]
#![doc = "`eth_getBlockByNumber` or `eth_getProof` round trip per call, bounded by a timeout and"]
#![doc = "retried with backoff only when the failure is transient."]
#![doc(issue_tracker_base_url = "https://github.com/snapshop-rs/snapshop/issues/")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[macro_use]
extern crate tracing;

mod config;
pub use config::ProviderConfig;

mod errors;
pub use errors::ProviderError;

mod proof;
pub use proof::{AccountProof, StorageProof};

mod provider;
pub use provider::{AlloyProofProvider, ProofProvider, block_quantity};

mod retry;

#[cfg(feature = "metrics")]
mod metrics;
#[cfg(feature = "metrics")]
pub use metrics::Metrics;
