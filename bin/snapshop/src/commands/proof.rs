//! Proof Subcommand

use crate::{
    cli::print_json,
    flags::{GlobalArgs, parse_block, parse_word},
};
use alloy_primitives::{Address, B256};
use clap::Parser;
use snapshop_providers_alloy::ProofProvider;
use snapshop_snapshot::{
    SnapshotAssembler,
    verify::{verify_account, verify_slot},
};

/// The `proof` Subcommand
///
/// Fetches the `eth_getProof` answer for an account, and optionally some of its storage slots,
/// at a block.
///
/// # Usage
///
/// ```sh
/// snapshop proof [FLAGS] [OPTIONS] <BLOCK> <ACCOUNT> [--slot <SLOT>]...
/// ```
#[derive(Parser, Debug, Clone)]
#[command(about = "Prints the account and storage proofs of an account at a block")]
pub struct ProofCommand {
    /// The block number, in decimal or as a `0x` quantity.
    #[arg(value_parser = parse_block)]
    pub block: u64,
    /// The account to prove.
    pub account: Address,
    /// A storage slot to prove. May be repeated.
    #[arg(long = "slot", value_parser = parse_word)]
    pub slots: Vec<B256>,
}

impl ProofCommand {
    /// Runs the subcommand.
    pub async fn run(self, args: &GlobalArgs) -> anyhow::Result<()> {
        let provider = args.provider.proof_provider();
        let proof = provider.proof(self.block, self.account, &self.slots).await?;

        if args.self_check {
            let header = SnapshotAssembler::new(provider)
                .with_self_check(true)
                .block_snapshot(self.block)
                .await?;
            verify_account(header.state_root, &proof)?;
            for slot in &self.slots {
                verify_slot(&proof, *slot)?;
            }
            tracing::info!(block = self.block, account = %self.account, "Proof verified");
        }

        print_json(&proof)
    }
}
