//! Contains the snapshop CLI.

use crate::{
    commands::{HeaderCommand, ProofCommand, SlotCommand, SnapshotCommand},
    flags::GlobalArgs,
};
use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use snapshop_cli::cli_styles;
use std::future::Future;

/// Snapshop's CLI.
///
/// Builds the byte-exact artifacts an on-chain snapshot registry needs to prove historical
/// account state: canonical block headers, account proofs and storage proofs.
#[derive(Parser, Clone, Debug)]
#[command(author, version, about, styles = cli_styles(), long_about = None)]
pub struct Cli {
    /// Global arguments for the CLI.
    #[command(flatten)]
    pub global: GlobalArgs,
    /// The subcommand to run.
    #[command(subcommand)]
    pub subcommand: Commands,
}

/// The snapshop subcommands.
#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Fetches a block header and prints its canonical encoding.
    Header(HeaderCommand),
    /// Fetches an account proof, with optional storage proofs, and prints it.
    Proof(ProofCommand),
    /// Derives the storage slot of a mapping entry.
    Slot(SlotCommand),
    /// Assembles snapshots and optionally submits them to a registry.
    #[command(subcommand)]
    Snapshot(SnapshotCommand),
}

impl Cli {
    /// Runs the CLI.
    pub fn run(self) -> Result<()> {
        self.global.log_args.init_tracing_subscriber()?;
        if self.global.metrics.init_metrics()? {
            snapshop_providers_alloy::Metrics::init();
        }

        match self.subcommand {
            Commands::Header(cmd) => Self::run_until_done(cmd.run(&self.global)),
            Commands::Proof(cmd) => Self::run_until_done(cmd.run(&self.global)),
            Commands::Slot(cmd) => cmd.run(),
            Commands::Snapshot(cmd) => Self::run_until_done(cmd.run(&self.global)),
        }
    }

    /// Runs the given future to completion on a fresh multi-threaded runtime.
    fn run_until_done<F>(fut: F) -> Result<()>
    where
        F: Future<Output = Result<()>>,
    {
        let rt = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
        rt.block_on(fut)
    }
}

/// Prints a value to stdout as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{B256, U256, address};

    #[test]
    fn test_parse_header() {
        let cli = Cli::try_parse_from(["snapshop", "header", "16000000", "--mainnet-schedule"])
            .unwrap();
        let Commands::Header(cmd) = cli.subcommand else { panic!("expected header command") };
        assert_eq!(cmd.block, 16_000_000);
        assert!(cmd.mainnet_schedule);
    }

    #[test]
    fn test_parse_proof_with_slots() {
        let cli = Cli::try_parse_from([
            "snapshop",
            "--self-check",
            "proof",
            "0x10",
            "0x5fbdb2315678afecb367f032d93f642f64180aa3",
            "--slot",
            "0x0",
            "--slot",
            "0x2",
        ])
        .unwrap();
        assert!(cli.global.self_check);
        let Commands::Proof(cmd) = cli.subcommand else { panic!("expected proof command") };
        assert_eq!(cmd.block, 16);
        assert_eq!(cmd.account, address!("5fbdb2315678afecb367f032d93f642f64180aa3"));
        assert_eq!(cmd.slots, vec![B256::ZERO, B256::with_last_byte(2)]);
    }

    #[test]
    fn test_parse_snapshot_balance() {
        let cli = Cli::try_parse_from([
            "snapshop",
            "snapshot",
            "balance",
            "16000000",
            "0x5fbdb2315678afecb367f032d93f642f64180aa3",
            "0x70997970c51812dc3a010c7d01b50e0d17dc79c8",
            "--base-slot",
            "3",
            "--registry",
            "0xe7f1725e7734ce288f8367e1bb143e90bb3f0512",
            "--from",
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266",
        ])
        .unwrap();
        let Commands::Snapshot(SnapshotCommand::Balance(cmd)) = cli.subcommand else {
            panic!("expected snapshot balance command")
        };
        assert_eq!(cmd.base_slot, U256::from(3));
        assert!(cmd.registry.target().is_some());
    }

    #[test]
    fn test_requires_subcommand() {
        assert!(Cli::try_parse_from(["snapshop"]).is_err());
    }
}
