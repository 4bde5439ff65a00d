//! Assembles snapshots from node data and forwards them to a registry.

use crate::{
    AccountSnapshot, AccountState, BlockSnapshot, SnapshotError, SnapshotRegistry,
    StorageSnapshot, verify,
};
use alloy_primitives::{Address, B256, TxHash, U256};
use alloy_trie::TrieAccount;
use snapshop_protocol::{balance_slot, canonicalize, canonicalize_checked};
use snapshop_providers_alloy::{AccountProof, ProofProvider};

/// Builds block, account and storage snapshots from a [`ProofProvider`].
///
/// With `self_check` enabled, every artifact is verified before it is returned: the header must
/// hash to the node-reported block hash, and proofs must walk from the roots in that header.
/// Without it, artifacts are handed on as the node produced them and the registry is the only
/// verifier.
#[derive(Debug, Clone)]
pub struct SnapshotAssembler<P> {
    provider: P,
    self_check: bool,
}

impl<P: ProofProvider> SnapshotAssembler<P> {
    /// Creates a new [`SnapshotAssembler`] with the self-check disabled.
    pub const fn new(provider: P) -> Self {
        Self { provider, self_check: false }
    }

    /// Enables or disables local verification of every artifact.
    pub const fn with_self_check(mut self, self_check: bool) -> Self {
        self.self_check = self_check;
        self
    }

    /// Returns the underlying provider.
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Fetches and canonicalizes the header of `block`.
    pub async fn block_snapshot(&self, block: u64) -> Result<BlockSnapshot, SnapshotError> {
        let raw = self.provider.raw_header(block).await?;
        let canonical =
            if self.self_check { canonicalize_checked(&raw)? } else { canonicalize(&raw)? };

        let snapshot = BlockSnapshot::from(canonical);
        info!(
            target: "snapshot::assembler",
            block,
            hash = %snapshot.hash,
            schema = %snapshot.schema,
            "Assembled block snapshot"
        );
        Ok(snapshot)
    }

    /// Fetches the proof of `account` at `block`.
    pub async fn account_snapshot(
        &self,
        block: u64,
        account: Address,
    ) -> Result<AccountSnapshot, SnapshotError> {
        let proof = self.provider.proof(block, account, &[]).await?;
        let state = self.account_state(block, &proof).await?;

        info!(
            target: "snapshot::assembler",
            block,
            %account,
            nodes = proof.account_proof.len(),
            verified = state.is_verified(),
            "Assembled account snapshot"
        );
        Ok(AccountSnapshot { number: block, account, proof: proof.account_proof, state })
    }

    /// Fetches the proof of `slot` in the storage of `account` at `block`.
    pub async fn storage_snapshot(
        &self,
        block: u64,
        account: Address,
        slot: B256,
    ) -> Result<StorageSnapshot, SnapshotError> {
        let proof = self.provider.proof(block, account, &[slot]).await?;
        if self.self_check {
            self.account_state(block, &proof).await?;
            verify::verify_slot(&proof, slot)?;
        }

        let verified = self.self_check;
        let Some(storage) = proof.storage_proof.into_iter().find(|storage| storage.key == slot)
        else {
            return Err(crate::VerifyError::MissingStorageProof { account, slot }.into());
        };

        info!(
            target: "snapshot::assembler",
            block,
            %account,
            %slot,
            value = %storage.value,
            verified,
            "Assembled storage snapshot"
        );
        Ok(StorageSnapshot {
            number: block,
            account,
            slot,
            value: storage.value,
            proof: storage.proof,
            verified,
        })
    }

    /// Fetches the proof of `holder`'s balance in a token whose balances mapping is declared at
    /// `base_slot`.
    pub async fn balance_snapshot(
        &self,
        block: u64,
        token: Address,
        holder: Address,
        base_slot: U256,
    ) -> Result<StorageSnapshot, SnapshotError> {
        let slot = balance_slot(holder, base_slot);
        debug!(target: "snapshot::assembler", %token, %holder, %slot, "Derived balance slot");
        self.storage_snapshot(block, token, slot).await
    }

    /// Assembles the block snapshot of `block` and submits it to `registry`.
    pub async fn submit_block_snapshot<R: SnapshotRegistry>(
        &self,
        registry: &R,
        block: u64,
    ) -> Result<(BlockSnapshot, TxHash), SnapshotError> {
        let snapshot = self.block_snapshot(block).await?;
        let tx = registry.create_block_snapshot(snapshot.header.clone()).await?;
        Ok((snapshot, tx))
    }

    /// Assembles the account snapshot of `account` at `block` and submits it to `registry`.
    ///
    /// The registry only accepts account snapshots for blocks it already holds.
    pub async fn submit_account_snapshot<R: SnapshotRegistry>(
        &self,
        registry: &R,
        block: u64,
        account: Address,
    ) -> Result<(AccountSnapshot, TxHash), SnapshotError> {
        let snapshot = self.account_snapshot(block, account).await?;
        let tx = registry.create_account_snapshot(block, account, snapshot.proof.clone()).await?;
        Ok((snapshot, tx))
    }

    /// Assembles the storage snapshot of `slot` and reads it through `registry`, returning the
    /// word the registry proved.
    pub async fn submit_storage_read<R: SnapshotRegistry>(
        &self,
        registry: &R,
        block: u64,
        account: Address,
        slot: B256,
    ) -> Result<(StorageSnapshot, B256), SnapshotError> {
        let snapshot = self.storage_snapshot(block, account, slot).await?;
        Self::read_through(registry, snapshot).await
    }

    /// Assembles the balance snapshot of `holder` in `token` and reads it through `registry`,
    /// returning the word the registry proved.
    pub async fn submit_balance_read<R: SnapshotRegistry>(
        &self,
        registry: &R,
        block: u64,
        token: Address,
        holder: Address,
        base_slot: U256,
    ) -> Result<(StorageSnapshot, B256), SnapshotError> {
        let snapshot = self.balance_snapshot(block, token, holder, base_slot).await?;
        Self::read_through(registry, snapshot).await
    }

    async fn read_through<R: SnapshotRegistry>(
        registry: &R,
        snapshot: StorageSnapshot,
    ) -> Result<(StorageSnapshot, B256), SnapshotError> {
        let StorageSnapshot { number, account, slot, .. } = snapshot;
        let word =
            registry.sload_from_snapshot(number, account, slot, snapshot.proof.clone()).await?;

        if U256::from_be_bytes(word.0) != snapshot.value {
            warn!(
                target: "snapshot::assembler",
                %account,
                %slot,
                node = %snapshot.value,
                registry = %word,
                "Registry read differs from node-reported value"
            );
        }
        Ok((snapshot, word))
    }

    async fn account_state(
        &self,
        block: u64,
        proof: &AccountProof,
    ) -> Result<AccountState, SnapshotError> {
        if !self.self_check {
            return Ok(AccountState::Unverified {
                account: TrieAccount {
                    nonce: proof.nonce,
                    balance: proof.balance,
                    storage_root: proof.storage_hash,
                    code_hash: proof.code_hash,
                },
            });
        }

        let header = self.block_snapshot(block).await?;
        Ok(verify::verify_account(header.state_root, proof)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        MockSnapshotRegistry, VerifyError,
        test_utils::{BLOCK, FixtureProvider, OUTSIDER, TOKEN, TokenState},
    };
    use alloy_primitives::b256;
    use snapshop_protocol::{HeaderError, HeaderSchema};
    use snapshop_providers_alloy::ProviderError;

    const HOLDER: Address = alloy_primitives::address!("00000000000000000000000000000000000000aa");

    fn assembler(self_check: bool) -> SnapshotAssembler<FixtureProvider> {
        let state = TokenState::new(balance_slot(HOLDER, U256::ZERO), U256::from(250));
        SnapshotAssembler::new(FixtureProvider::new(state)).with_self_check(self_check)
    }

    #[tokio::test]
    async fn test_block_snapshot() {
        let assembler = assembler(true);
        let snapshot = assembler.block_snapshot(BLOCK).await.unwrap();

        assert_eq!(snapshot.number, BLOCK);
        assert_eq!(snapshot.schema, HeaderSchema::London);
        assert_eq!(snapshot.state_root, assembler.provider().state.state_root);
        assert_eq!(Some(format!("{}", snapshot.hash)), assembler.provider().header.hash);
    }

    #[tokio::test]
    async fn test_block_snapshot_self_check_rejects_wrong_hash() {
        let mut provider = FixtureProvider::new(TokenState::new(B256::ZERO, U256::from(1)));
        provider.header.hash =
            Some("0x0000000000000000000000000000000000000000000000000000000000000001".into());

        let unchecked = SnapshotAssembler::new(provider).with_self_check(false);
        assert!(unchecked.block_snapshot(BLOCK).await.is_ok());

        let checked = unchecked.with_self_check(true);
        assert!(matches!(
            checked.block_snapshot(BLOCK).await,
            Err(SnapshotError::Header(HeaderError::CanonicalizationMismatch { .. }))
        ));
    }

    #[tokio::test]
    async fn test_unknown_block() {
        assert!(matches!(
            assembler(false).block_snapshot(BLOCK + 1).await,
            Err(SnapshotError::Provider(ProviderError::BlockNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_account_snapshot_unverified() {
        let assembler = assembler(false);
        let snapshot = assembler.account_snapshot(BLOCK, TOKEN).await.unwrap();

        assert_eq!(snapshot.proof, vec![assembler.provider().state.account_node.clone()]);
        assert_eq!(
            snapshot.state,
            AccountState::Unverified { account: assembler.provider().state.account }
        );
        assert_eq!(assembler.provider().proof_requests(), 1);
    }

    #[tokio::test]
    async fn test_account_snapshot_verified() {
        let assembler = assembler(true);
        let snapshot = assembler.account_snapshot(BLOCK, TOKEN).await.unwrap();
        assert_eq!(
            snapshot.state,
            AccountState::Present { account: assembler.provider().state.account }
        );
    }

    #[tokio::test]
    async fn test_absent_account_snapshot() {
        let snapshot = assembler(true).account_snapshot(BLOCK, OUTSIDER).await.unwrap();
        assert!(!snapshot.proof.is_empty());
        assert_eq!(snapshot.state, AccountState::Absent);
        assert!(snapshot.state.account().balance.is_zero());
    }

    #[tokio::test]
    async fn test_pruned_state() {
        assert!(matches!(
            assembler(true).account_snapshot(BLOCK - 1, TOKEN).await,
            Err(SnapshotError::Provider(ProviderError::StatePruned { .. }))
        ));
    }

    #[tokio::test]
    async fn test_balance_snapshot() {
        let snapshot = assembler(true)
            .balance_snapshot(BLOCK, TOKEN, HOLDER, U256::ZERO)
            .await
            .unwrap();

        assert_eq!(snapshot.slot, balance_slot(HOLDER, U256::ZERO));
        assert_eq!(snapshot.value, U256::from(250));
        assert!(snapshot.verified);
    }

    #[tokio::test]
    async fn test_balance_snapshot_of_non_holder() {
        let snapshot = assembler(true)
            .balance_snapshot(BLOCK, TOKEN, OUTSIDER, U256::ZERO)
            .await
            .unwrap();
        assert_eq!(snapshot.value, U256::ZERO);
        assert_eq!(snapshot.proof.len(), 1);
    }

    #[tokio::test]
    async fn test_storage_snapshot_is_deterministic() {
        let assembler = assembler(false);
        let slot = balance_slot(HOLDER, U256::ZERO);
        let first = assembler.storage_snapshot(BLOCK, TOKEN, slot).await.unwrap();
        let second = assembler.storage_snapshot(BLOCK, TOKEN, slot).await.unwrap();
        assert_eq!(first, second);
        assert!(!first.verified);
    }

    #[tokio::test]
    async fn test_storage_self_check_rejects_forged_value() {
        let mut assembler = assembler(true);
        assembler.provider.state.value = U256::from(1_000_000);
        assert!(matches!(
            assembler.balance_snapshot(BLOCK, TOKEN, HOLDER, U256::ZERO).await,
            Err(SnapshotError::Verify(VerifyError::Storage { .. }))
        ));
    }

    #[tokio::test]
    async fn test_submit_block_snapshot() {
        let assembler = assembler(false);
        let expected = assembler.block_snapshot(BLOCK).await.unwrap().header;
        let tx = b256!("00000000000000000000000000000000000000000000000000000000000000aa");

        let mut registry = MockSnapshotRegistry::new();
        registry
            .expect_create_block_snapshot()
            .withf(move |header| *header == expected)
            .times(1)
            .returning(move |_| Ok(tx));

        let (_, hash) = assembler.submit_block_snapshot(&registry, BLOCK).await.unwrap();
        assert_eq!(hash, tx);
    }

    #[tokio::test]
    async fn test_submit_account_snapshot() {
        let assembler = assembler(false);
        let expected = vec![assembler.provider().state.account_node.clone()];

        let mut registry = MockSnapshotRegistry::new();
        registry
            .expect_create_account_snapshot()
            .withf(move |block, account, proof| {
                *block == BLOCK && *account == TOKEN && *proof == expected
            })
            .times(1)
            .returning(|_, _, _| Ok(TxHash::ZERO));

        assert!(assembler.submit_account_snapshot(&registry, BLOCK, TOKEN).await.is_ok());
    }

    #[tokio::test]
    async fn test_submit_storage_read() {
        let assembler = assembler(false);
        let slot = balance_slot(HOLDER, U256::ZERO);

        let mut registry = MockSnapshotRegistry::new();
        registry
            .expect_sload_from_snapshot()
            .withf(move |block, account, requested, proof| {
                *block == BLOCK && *account == TOKEN && *requested == slot && proof.len() == 1
            })
            .times(1)
            .returning(|_, _, _, _| Ok(B256::from(U256::from(250))));

        let (snapshot, word) =
            assembler.submit_storage_read(&registry, BLOCK, TOKEN, slot).await.unwrap();
        assert_eq!(U256::from_be_bytes(word.0), snapshot.value);
    }

    #[tokio::test]
    async fn test_submit_balance_read() {
        let assembler = assembler(true);
        let slot = balance_slot(HOLDER, U256::ZERO);
        let expected = vec![assembler.provider().state.storage_node.clone()];

        let mut registry = MockSnapshotRegistry::new();
        registry
            .expect_sload_from_snapshot()
            .withf(move |block, account, requested, proof| {
                *block == BLOCK && *account == TOKEN && *requested == slot && *proof == expected
            })
            .times(1)
            .returning(|_, _, _, _| Ok(B256::from(U256::from(250))));

        let (snapshot, word) = assembler
            .submit_balance_read(&registry, BLOCK, TOKEN, HOLDER, U256::ZERO)
            .await
            .unwrap();
        assert_eq!(snapshot.slot, slot);
        assert!(snapshot.verified);
        assert_eq!(word, B256::from(U256::from(250)));
    }
}
