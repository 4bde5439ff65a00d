#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/snapshop-rs/snapshop/issues/")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[macro_use]
extern crate tracing;

mod errors;
pub use errors::{RegistryError, SnapshotError, VerifyError};

mod artifacts;
pub use artifacts::{AccountSnapshot, AccountState, BlockSnapshot, StorageSnapshot};

pub mod verify;

mod registry;
#[cfg(test)]
pub use registry::MockSnapshotRegistry;
pub use registry::{ContractRegistry, ISnapshotRegistry, SnapshotRegistry};

mod assembler;
pub use assembler::SnapshotAssembler;

#[cfg(test)]
mod test_utils;
