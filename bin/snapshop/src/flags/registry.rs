//! Registry submission arguments.

use alloy_primitives::Address;
use clap::Parser;

/// Where to submit assembled snapshots. Without `--registry` snapshots are only printed.
#[derive(Parser, Clone, Debug, Default)]
pub struct RegistryArgs {
    /// Address of the snapshot registry contract.
    #[arg(long, requires = "from")]
    pub registry: Option<Address>,
    /// Node-managed account that sends the submission transactions.
    #[arg(long, requires = "registry")]
    pub from: Option<Address>,
}

impl RegistryArgs {
    /// Returns the registry and sender addresses, if submission was requested.
    pub fn target(&self) -> Option<(Address, Address)> {
        self.registry.zip(self.from)
    }
}
