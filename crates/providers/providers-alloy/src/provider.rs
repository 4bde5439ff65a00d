//! The [`ProofProvider`] trait and its alloy-backed implementation.

use crate::{AccountProof, ProviderConfig, ProviderError, retry::with_retry};
use alloy_primitives::{Address, B256};
use alloy_provider::{Provider, RootProvider};
use async_trait::async_trait;
use snapshop_protocol::{RawBlockHeader, WORD_WIDTH, fixed_string};
use std::fmt::Debug;
use url::Url;

/// A source of historical block headers and state proofs.
///
/// Implementations make a single node round trip per call and do no verification of their own
/// beyond checking that the answer corresponds to the query.
#[async_trait]
pub trait ProofProvider: Debug + Send + Sync {
    /// Returns the header of block `block` as reported by the node.
    async fn raw_header(&self, block: u64) -> Result<RawBlockHeader, ProviderError>;

    /// Returns the proof of `account`, and of each of its storage `slots`, at block `block`.
    async fn proof(
        &self,
        block: u64,
        account: Address,
        slots: &[B256],
    ) -> Result<AccountProof, ProviderError>;
}

/// Formats a block number as the minimal hex quantity node APIs expect.
pub fn block_quantity(block: u64) -> String {
    format!("{block:#x}")
}

/// A [`ProofProvider`] backed by an alloy [`Provider`].
#[derive(Debug, Clone)]
pub struct AlloyProofProvider<P = RootProvider> {
    /// The inner provider.
    inner: P,
    /// Timeout and retry settings.
    config: ProviderConfig,
}

impl AlloyProofProvider {
    /// Creates a new [`AlloyProofProvider`] over HTTP.
    pub fn new_http(url: Url, config: ProviderConfig) -> Self {
        Self::new(RootProvider::new_http(url), config)
    }
}

impl<P> AlloyProofProvider<P> {
    /// Creates a new [`AlloyProofProvider`] wrapping the given provider.
    pub const fn new(inner: P, config: ProviderConfig) -> Self {
        Self { inner, config }
    }

    /// Returns the inner provider.
    pub const fn inner(&self) -> &P {
        &self.inner
    }

    /// Returns the request configuration.
    pub const fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

#[async_trait]
impl<P> ProofProvider for AlloyProofProvider<P>
where
    P: Provider + Debug,
{
    async fn raw_header(&self, block: u64) -> Result<RawBlockHeader, ProviderError> {
        debug!(target: "providers::alloy", block, "Fetching block header");
        #[cfg(feature = "metrics")]
        crate::Metrics::record_request("eth_getBlockByNumber");

        let params = (block_quantity(block), false);
        let header: Option<RawBlockHeader> = with_retry(&self.config, "eth_getBlockByNumber", || {
            let params = params.clone();
            async move {
                self.inner
                    .raw_request("eth_getBlockByNumber".into(), params)
                    .await
                    .map_err(|err| ProviderError::from_node(block, err))
            }
        })
        .await
        .inspect_err(|err| {
            #[cfg(feature = "metrics")]
            crate::Metrics::record_error("eth_getBlockByNumber");
            warn!(target: "providers::alloy", block, %err, "Failed to fetch block header");
        })?;

        header.ok_or(ProviderError::BlockNotFound(block))
    }

    async fn proof(
        &self,
        block: u64,
        account: Address,
        slots: &[B256],
    ) -> Result<AccountProof, ProviderError> {
        debug!(target: "providers::alloy", block, %account, slots = slots.len(), "Fetching state proof");
        #[cfg(feature = "metrics")]
        crate::Metrics::record_request("eth_getProof");

        let keys = slots
            .iter()
            .map(|slot| fixed_string(*slot, WORD_WIDTH))
            .collect::<Result<Vec<_>, _>>()?;
        let params = (account, keys, block_quantity(block));

        let proof: AccountProof = with_retry(&self.config, "eth_getProof", || {
            let params = params.clone();
            async move {
                self.inner
                    .raw_request("eth_getProof".into(), params)
                    .await
                    .map_err(|err| ProviderError::from_node(block, err))
            }
        })
        .await
        .inspect_err(|err| {
            #[cfg(feature = "metrics")]
            crate::Metrics::record_error("eth_getProof");
            warn!(target: "providers::alloy", block, %account, %err, "Failed to fetch state proof");
        })?;

        proof.validate(account, slots)?;
        Ok(proof)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StorageProof;
    use alloy_json_rpc::ErrorPayload;
    use alloy_primitives::{Bytes, U256, address};
    use alloy_rpc_client::RpcClient;
    use alloy_transport::mock::*;
    use alloy_trie::EMPTY_ROOT_HASH;
    use rstest::rstest;

    const ACCOUNT: Address = address!("5fbdb2315678afecb367f032d93f642f64180aa3");

    fn mocked(asserter: &Asserter, max_retries: usize) -> AlloyProofProvider {
        let transport = MockTransport::new(asserter.clone());
        let client = RpcClient::new(transport, false);
        AlloyProofProvider::new(
            RootProvider::new(client),
            ProviderConfig { timeout_ms: 1_000, max_retries, retry_backoff_ms: 1 },
        )
    }

    fn node_error(code: i64, message: &'static str) -> ErrorPayload {
        ErrorPayload { code, message: message.into(), data: None }
    }

    fn account_proof(slots: &[B256]) -> AccountProof {
        AccountProof {
            address: ACCOUNT,
            balance: U256::ZERO,
            nonce: 1,
            code_hash: B256::with_last_byte(1),
            storage_hash: EMPTY_ROOT_HASH,
            account_proof: vec![Bytes::from_static(&[0xc0])],
            storage_proof: slots
                .iter()
                .map(|slot| StorageProof { key: *slot, value: U256::ZERO, proof: vec![] })
                .collect(),
        }
    }

    #[rstest]
    #[case(0, "0x0")]
    #[case(5000, "0x1388")]
    #[case(12_965_000, "0xc5d488")]
    fn test_block_quantity(#[case] block: u64, #[case] expected: &str) {
        assert_eq!(block_quantity(block), expected);
    }

    #[test]
    fn test_proof_request_params() {
        let slot = B256::with_last_byte(3);
        let keys = vec![fixed_string(slot, WORD_WIDTH).unwrap()];
        let params = (Address::ZERO, keys, block_quantity(16));
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            serde_json::json!([
                "0x0000000000000000000000000000000000000000",
                ["0x0000000000000000000000000000000000000000000000000000000000000003"],
                "0x10"
            ])
        );
    }

    #[tokio::test]
    async fn test_raw_header() {
        let asserter = Asserter::new();
        let header = RawBlockHeader {
            number: "0x7".to_string(),
            base_fee_per_gas: Some("0x7".to_string()),
            ..Default::default()
        };
        asserter.push_success(&header);

        assert_eq!(mocked(&asserter, 0).raw_header(7).await.unwrap(), header);
    }

    #[tokio::test]
    async fn test_null_block_is_not_found() {
        let asserter = Asserter::new();
        asserter.push_success(&serde_json::Value::Null);

        assert!(matches!(
            mocked(&asserter, 0).raw_header(7).await,
            Err(ProviderError::BlockNotFound(7))
        ));
    }

    #[tokio::test]
    async fn test_unknown_block_error() {
        let asserter = Asserter::new();
        asserter.push_failure(node_error(-32000, "header not found"));

        assert!(matches!(
            mocked(&asserter, 3).raw_header(7).await,
            Err(ProviderError::BlockNotFound(7))
        ));
    }

    #[tokio::test]
    async fn test_proof() {
        let asserter = Asserter::new();
        let slots = [B256::ZERO, B256::with_last_byte(2)];
        asserter.push_success(&account_proof(&slots));

        let proof = mocked(&asserter, 0).proof(7, ACCOUNT, &slots).await.unwrap();
        assert_eq!(proof, account_proof(&slots));
    }

    #[tokio::test]
    async fn test_missing_trie_node_is_pruned_state() {
        let asserter = Asserter::new();
        asserter.push_failure(node_error(
            -32000,
            "missing trie node 5f3c (path ) state 0x5f3c is not available",
        ));

        let err = mocked(&asserter, 3).proof(7, ACCOUNT, &[]).await.unwrap_err();
        assert!(matches!(err, ProviderError::StatePruned { block: 7, .. }));
    }

    #[tokio::test]
    async fn test_proof_response_is_validated() {
        let asserter = Asserter::new();
        let mut empty = account_proof(&[]);
        empty.account_proof.clear();
        asserter.push_success(&empty);
        asserter.push_success(&account_proof(&[]));

        let provider = mocked(&asserter, 0);
        assert!(matches!(
            provider.proof(7, ACCOUNT, &[]).await,
            Err(ProviderError::EmptyProof(account)) if account == ACCOUNT
        ));
        assert!(matches!(
            provider.proof(7, ACCOUNT, &[B256::ZERO]).await,
            Err(ProviderError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_retries_rate_limited_request() {
        let asserter = Asserter::new();
        asserter.push_failure(node_error(429, "too many requests"));
        asserter.push_success(&account_proof(&[]));

        assert!(mocked(&asserter, 1).proof(7, ACCOUNT, &[]).await.is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_node_is_transport_error() {
        let provider = AlloyProofProvider::new_http(
            "http://127.0.0.1:9".parse().unwrap(),
            ProviderConfig { timeout_ms: 2_000, max_retries: 0, retry_backoff_ms: 1 },
        );
        let err = provider.raw_header(1).await.unwrap_err();
        assert!(matches!(err, ProviderError::Transport(_) | ProviderError::Timeout(_)));
        assert!(err.is_transient());
    }
}
