//! Header Subcommand

use crate::{
    cli::print_json,
    flags::{GlobalArgs, parse_block},
};
use clap::Parser;
use snapshop_protocol::{
    ForkSchedule, canonicalize, canonicalize_checked, canonicalize_with_schedule,
};
use snapshop_providers_alloy::ProofProvider;
use snapshop_snapshot::BlockSnapshot;

/// The `header` Subcommand
///
/// Fetches a block header and prints its canonical encoding together with the hash, schema and
/// state root.
///
/// # Usage
///
/// ```sh
/// snapshop header [FLAGS] [OPTIONS] <BLOCK>
/// ```
#[derive(Parser, Debug, Clone)]
#[command(about = "Prints the canonical encoding of a block header")]
pub struct HeaderCommand {
    /// The block number, in decimal or as a `0x` quantity.
    #[arg(value_parser = parse_block)]
    pub block: u64,
    /// Require the header's fields to match the Ethereum mainnet fork schedule.
    #[arg(long)]
    pub mainnet_schedule: bool,
}

impl HeaderCommand {
    /// Runs the subcommand.
    pub async fn run(self, args: &GlobalArgs) -> anyhow::Result<()> {
        let provider = args.provider.proof_provider();
        let raw = provider.raw_header(self.block).await?;

        let canonical = if self.mainnet_schedule {
            canonicalize_with_schedule(&raw, &ForkSchedule::MAINNET)?
        } else {
            canonicalize(&raw)?
        };
        if args.self_check {
            canonicalize_checked(&raw)?;
        }

        print_json(&BlockSnapshot::from(canonical))
    }
}
