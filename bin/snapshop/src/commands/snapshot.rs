//! Snapshot Subcommands

use crate::{
    cli::print_json,
    flags::{GlobalArgs, RegistryArgs, parse_block, parse_word},
};
use alloy_primitives::{Address, B256, TxHash, U256};
use alloy_provider::RootProvider;
use clap::{Parser, Subcommand};
use serde::Serialize;
use snapshop_providers_alloy::AlloyProofProvider;
use snapshop_snapshot::{ContractRegistry, SnapshotAssembler};

/// The `snapshot` Subcommands
///
/// Assemble the artifacts a governance action submits to the snapshot registry. A block must be
/// snapshotted before any account at that block, and an account before its storage is read.
///
/// # Usage
///
/// ```sh
/// snapshop snapshot <block|account|storage|balance> [ARGS] [--registry <ADDRESS> --from <ADDRESS>]
/// ```
#[derive(Subcommand, Debug, Clone)]
pub enum SnapshotCommand {
    /// Assembles a block snapshot: the canonical header encoding.
    Block(BlockSnapshotCommand),
    /// Assembles an account snapshot: the account proof at a block.
    Account(AccountSnapshotCommand),
    /// Assembles a storage read: the proof of one storage slot of an account.
    Storage(StorageSnapshotCommand),
    /// Assembles a storage read of a holder's balance in an ERC-20 token.
    Balance(BalanceSnapshotCommand),
}

/// Arguments of `snapshot block`.
#[derive(Parser, Debug, Clone)]
pub struct BlockSnapshotCommand {
    /// The block number, in decimal or as a `0x` quantity.
    #[arg(value_parser = parse_block)]
    pub block: u64,
    /// Submission target.
    #[command(flatten)]
    pub registry: RegistryArgs,
}

/// Arguments of `snapshot account`.
#[derive(Parser, Debug, Clone)]
pub struct AccountSnapshotCommand {
    /// The block number, in decimal or as a `0x` quantity.
    #[arg(value_parser = parse_block)]
    pub block: u64,
    /// The account to snapshot.
    pub account: Address,
    /// Submission target.
    #[command(flatten)]
    pub registry: RegistryArgs,
}

/// Arguments of `snapshot storage`.
#[derive(Parser, Debug, Clone)]
pub struct StorageSnapshotCommand {
    /// The block number, in decimal or as a `0x` quantity.
    #[arg(value_parser = parse_block)]
    pub block: u64,
    /// The account owning the storage.
    pub account: Address,
    /// The storage slot, as `0x`-prefixed hex.
    #[arg(value_parser = parse_word)]
    pub slot: B256,
    /// Submission target.
    #[command(flatten)]
    pub registry: RegistryArgs,
}

/// Arguments of `snapshot balance`.
#[derive(Parser, Debug, Clone)]
pub struct BalanceSnapshotCommand {
    /// The block number, in decimal or as a `0x` quantity.
    #[arg(value_parser = parse_block)]
    pub block: u64,
    /// The ERC-20 token.
    pub token: Address,
    /// The balance holder.
    pub holder: Address,
    /// The declaration slot of the token's balances mapping.
    #[arg(long, default_value = "0")]
    pub base_slot: U256,
    /// Submission target.
    #[command(flatten)]
    pub registry: RegistryArgs,
}

/// An assembled artifact, with the outcome of its submission.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Submission<T> {
    snapshot: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    transaction: Option<TxHash>,
    #[serde(skip_serializing_if = "Option::is_none")]
    registry_value: Option<B256>,
}

impl<T> Submission<T> {
    const fn local(snapshot: T) -> Self {
        Self { snapshot, transaction: None, registry_value: None }
    }
}

impl SnapshotCommand {
    /// Runs the subcommand.
    pub async fn run(self, args: &GlobalArgs) -> anyhow::Result<()> {
        let assembler = SnapshotAssembler::new(args.provider.proof_provider())
            .with_self_check(args.self_check);

        match self {
            Self::Block(cmd) => {
                let output = match registry(&assembler, &cmd.registry) {
                    Some(registry) => {
                        let (snapshot, tx) =
                            assembler.submit_block_snapshot(&registry, cmd.block).await?;
                        Submission { snapshot, transaction: Some(tx), registry_value: None }
                    }
                    None => Submission::local(assembler.block_snapshot(cmd.block).await?),
                };
                print_json(&output)
            }
            Self::Account(cmd) => {
                let output = match registry(&assembler, &cmd.registry) {
                    Some(registry) => {
                        let (snapshot, tx) = assembler
                            .submit_account_snapshot(&registry, cmd.block, cmd.account)
                            .await?;
                        Submission { snapshot, transaction: Some(tx), registry_value: None }
                    }
                    None => Submission::local(
                        assembler.account_snapshot(cmd.block, cmd.account).await?,
                    ),
                };
                print_json(&output)
            }
            Self::Storage(cmd) => {
                storage_read(&assembler, &cmd.registry, cmd.block, cmd.account, cmd.slot).await
            }
            Self::Balance(cmd) => {
                let output = match registry(&assembler, &cmd.registry) {
                    Some(registry) => {
                        let (snapshot, word) = assembler
                            .submit_balance_read(
                                &registry,
                                cmd.block,
                                cmd.token,
                                cmd.holder,
                                cmd.base_slot,
                            )
                            .await?;
                        Submission { snapshot, transaction: None, registry_value: Some(word) }
                    }
                    None => Submission::local(
                        assembler
                            .balance_snapshot(cmd.block, cmd.token, cmd.holder, cmd.base_slot)
                            .await?,
                    ),
                };
                print_json(&output)
            }
        }
    }
}

async fn storage_read(
    assembler: &SnapshotAssembler<AlloyProofProvider>,
    args: &RegistryArgs,
    block: u64,
    account: Address,
    slot: B256,
) -> anyhow::Result<()> {
    let output = match registry(assembler, args) {
        Some(registry) => {
            let (snapshot, word) =
                assembler.submit_storage_read(&registry, block, account, slot).await?;
            Submission { snapshot, transaction: None, registry_value: Some(word) }
        }
        None => Submission::local(assembler.storage_snapshot(block, account, slot).await?),
    };
    print_json(&output)
}

/// Returns the registry to submit to, sharing the assembler's node connection.
fn registry(
    assembler: &SnapshotAssembler<AlloyProofProvider>,
    args: &RegistryArgs,
) -> Option<ContractRegistry<RootProvider>> {
    let (address, from) = args.target()?;
    Some(ContractRegistry::new(assembler.provider().inner().clone(), address, from))
}
