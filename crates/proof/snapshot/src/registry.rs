//! The on-chain snapshot registry the assembled artifacts are submitted to.

use crate::RegistryError;
use alloy_network::ReceiptResponse;
use alloy_primitives::{Address, B256, Bytes, TxHash, U256};
use alloy_provider::Provider;
use alloy_rpc_types_eth::{TransactionInput, TransactionRequest};
use alloy_sol_types::{SolCall, sol};
use async_trait::async_trait;
use backon::{ConstantBuilder, Retryable};
use std::{fmt::Debug, time::Duration};

/// The default interval between receipt polls.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// The default number of receipt polls before a submission is reported unconfirmed.
const DEFAULT_MAX_POLLS: usize = 90;

sol! {
    /// The verifier contract surface of the snapshot registry.
    interface ISnapshotRegistry {
        function createBlockSnapshot(bytes blockHeader) external;
        function createAccountSnapshot(uint256 blockNumber, address account, bytes[] accountProof) external;
        function sloadFromSnapshot(uint256 blockNumber, address account, bytes32 slot, bytes[] storageProof) external view returns (bytes32);
    }
}

/// A registry that stores block and account snapshots and reads storage against them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnapshotRegistry: Debug + Send + Sync {
    /// Stores a canonical block header. The registry checks it against the block hash.
    ///
    /// Returns the hash of the transaction once it is mined and succeeded.
    async fn create_block_snapshot(&self, header: Bytes) -> Result<TxHash, RegistryError>;

    /// Stores an account's state at a snapshotted block, proven by `proof`.
    ///
    /// Returns the hash of the transaction once it is mined and succeeded.
    async fn create_account_snapshot(
        &self,
        block: u64,
        account: Address,
        proof: Vec<Bytes>,
    ) -> Result<TxHash, RegistryError>;

    /// Reads `slot` of a snapshotted account, proven by `proof`.
    async fn sload_from_snapshot(
        &self,
        block: u64,
        account: Address,
        slot: B256,
        proof: Vec<Bytes>,
    ) -> Result<B256, RegistryError>;
}

/// A [`SnapshotRegistry`] deployed at `address`, reached through an alloy [`Provider`].
///
/// State-changing calls are sent with `eth_sendTransaction` from `from`, which the node must be
/// able to sign for. A submission only counts once its receipt shows it succeeded, so a snapshot
/// the registry rejects surfaces as [`RegistryError::Reverted`] and a later submission never
/// races the inclusion of an earlier one.
#[derive(Debug, Clone)]
pub struct ContractRegistry<P> {
    provider: P,
    address: Address,
    from: Address,
    poll_interval: Duration,
    max_polls: usize,
}

impl<P> ContractRegistry<P> {
    /// Creates a new [`ContractRegistry`].
    pub const fn new(provider: P, address: Address, from: Address) -> Self {
        Self {
            provider,
            address,
            from,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polls: DEFAULT_MAX_POLLS,
        }
    }

    /// Sets how often, and how many times, the receipt of a submission is polled.
    pub const fn with_receipt_polling(mut self, interval: Duration, max_polls: usize) -> Self {
        self.poll_interval = interval;
        self.max_polls = max_polls;
        self
    }

    /// Returns the registry address.
    pub const fn address(&self) -> Address {
        self.address
    }

    fn request(&self, call: impl SolCall) -> TransactionRequest {
        TransactionRequest::default()
            .from(self.from)
            .to(self.address)
            .input(TransactionInput::new(call.abi_encode().into()))
    }
}

/// Decodes a single `bytes32` return value.
fn decode_word(data: &[u8]) -> Result<B256, RegistryError> {
    if data.len() != 32 {
        return Err(RegistryError::InvalidReturn(data.len()));
    }
    Ok(B256::from_slice(data))
}

impl<P: Provider> ContractRegistry<P> {
    /// Sends `request` and waits until its transaction is mined and succeeded.
    async fn submit(&self, request: TransactionRequest) -> Result<TxHash, RegistryError> {
        let pending = self.provider.send_transaction(request).await?;
        let hash = *pending.tx_hash();
        debug!(target: "snapshot::registry", registry = %self.address, %hash, "Awaiting receipt");

        let poll = || async {
            self.provider
                .get_transaction_receipt(hash)
                .await
                .map_err(RegistryError::Transport)
                .and_then(|receipt| receipt.ok_or(RegistryError::Unconfirmed(hash)))
        };
        let receipt = poll
            .retry(
                ConstantBuilder::default()
                    .with_delay(self.poll_interval)
                    .with_max_times(self.max_polls),
            )
            .when(|err| matches!(err, RegistryError::Unconfirmed(_)))
            .await?;

        if !ReceiptResponse::status(&receipt) {
            warn!(target: "snapshot::registry", registry = %self.address, %hash, "Submission reverted");
            return Err(RegistryError::Reverted(hash));
        }
        Ok(hash)
    }
}

#[async_trait]
impl<P> SnapshotRegistry for ContractRegistry<P>
where
    P: Provider + Debug,
{
    async fn create_block_snapshot(&self, header: Bytes) -> Result<TxHash, RegistryError> {
        let request =
            self.request(ISnapshotRegistry::createBlockSnapshotCall { blockHeader: header });
        let hash = self.submit(request).await?;

        info!(target: "snapshot::registry", registry = %self.address, %hash, "Submitted block snapshot");
        Ok(hash)
    }

    async fn create_account_snapshot(
        &self,
        block: u64,
        account: Address,
        proof: Vec<Bytes>,
    ) -> Result<TxHash, RegistryError> {
        let request = self.request(ISnapshotRegistry::createAccountSnapshotCall {
            blockNumber: U256::from(block),
            account,
            accountProof: proof,
        });
        let hash = self.submit(request).await?;

        info!(target: "snapshot::registry", registry = %self.address, block, %account, %hash, "Submitted account snapshot");
        Ok(hash)
    }

    async fn sload_from_snapshot(
        &self,
        block: u64,
        account: Address,
        slot: B256,
        proof: Vec<Bytes>,
    ) -> Result<B256, RegistryError> {
        let request = self.request(ISnapshotRegistry::sloadFromSnapshotCall {
            blockNumber: U256::from(block),
            account,
            slot,
            storageProof: proof,
        });
        let data = self.provider.call(request).await?;

        let word = decode_word(&data)?;
        debug!(target: "snapshot::registry", block, %account, %slot, %word, "Read slot from snapshot");
        Ok(word)
    }
}
