//! Slot Subcommand

use crate::cli::print_json;
use clap::Parser;
use serde::Serialize;
use snapshop_protocol::map_slot;

/// The `slot` Subcommand
///
/// Derives the storage slot of the entry for `key` in a mapping declared at `base_slot`.
/// For the balance of a holder in most ERC-20 tokens, `key` is the holder address and
/// `base_slot` the declaration index of the balances mapping.
///
/// # Usage
///
/// ```sh
/// snapshop slot <BASE_SLOT> <KEY>
/// ```
#[derive(Parser, Debug, Clone)]
#[command(about = "Derives the storage slot of a mapping entry")]
pub struct SlotCommand {
    /// The mapping's base slot, as `0x`-prefixed hex.
    pub base_slot: String,
    /// The mapping key, as `0x`-prefixed hex. Addresses are left padded to 32 bytes.
    pub key: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SlotOutput<'a> {
    base_slot: &'a str,
    key: &'a str,
    slot: alloy_primitives::B256,
}

impl SlotCommand {
    /// Runs the subcommand.
    pub fn run(self) -> anyhow::Result<()> {
        let slot = map_slot(self.base_slot.as_str(), self.key.as_str())?;
        print_json(&SlotOutput { base_slot: &self.base_slot, key: &self.key, slot })
    }
}
