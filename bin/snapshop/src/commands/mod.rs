//! Contains subcommands for snapshop.

mod header;
pub use header::HeaderCommand;

mod proof;
pub use proof::ProofCommand;

mod slot;
pub use slot::SlotCommand;

mod snapshot;
pub use snapshot::{
    AccountSnapshotCommand, BalanceSnapshotCommand, BlockSnapshotCommand, SnapshotCommand,
    StorageSnapshotCommand,
};
