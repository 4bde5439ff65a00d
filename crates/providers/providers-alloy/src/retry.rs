//! Bounded retry of node requests.

use crate::{ProviderConfig, ProviderError};
use backon::{ExponentialBuilder, Retryable};
use std::{future::Future, time::Duration};

/// Runs `request` under the configured timeout, retrying transient failures with exponential
/// backoff up to `max_retries` times.
pub(crate) async fn with_retry<T, F, Fut>(
    config: &ProviderConfig,
    method: &'static str,
    mut request: F,
) -> Result<T, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let timeout = config.timeout();
    let attempt = || {
        let pending = request();
        async move {
            tokio::time::timeout(timeout, pending).await.map_err(|_| ProviderError::Timeout(timeout))?
        }
    };

    let backoff = ExponentialBuilder::default()
        .with_min_delay(config.retry_backoff())
        .with_max_times(config.max_retries);

    attempt
        .retry(backoff)
        .when(ProviderError::is_transient)
        .notify(|err: &ProviderError, delay: Duration| {
            warn!(target: "providers::alloy", method, %err, ?delay, "Retrying node request");
        })
        .await
}
