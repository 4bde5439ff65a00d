//! Node request metrics.

/// Counters for the node requests issued by the alloy providers.
#[derive(Debug, Clone)]
pub struct Metrics;

impl Metrics {
    /// Identifier for the counter of node requests, labeled by method.
    pub const NODE_REQUESTS_TOTAL: &'static str = "snapshop_node_requests_total";

    /// Identifier for the counter of failed node requests, labeled by method.
    pub const NODE_REQUEST_ERRORS_TOTAL: &'static str = "snapshop_node_request_errors_total";

    /// Describes and zeroes the provider metrics.
    pub fn init() {
        metrics::describe_counter!(
            Self::NODE_REQUESTS_TOTAL,
            metrics::Unit::Count,
            "Total number of node requests issued by the proof provider",
        );
        metrics::describe_counter!(
            Self::NODE_REQUEST_ERRORS_TOTAL,
            metrics::Unit::Count,
            "Total number of node requests that failed after retries",
        );

        for method in ["eth_getBlockByNumber", "eth_getProof"] {
            metrics::counter!(Self::NODE_REQUESTS_TOTAL, "method" => method).increment(0);
            metrics::counter!(Self::NODE_REQUEST_ERRORS_TOTAL, "method" => method).increment(0);
        }
    }

    pub(crate) fn record_request(method: &'static str) {
        metrics::counter!(Self::NODE_REQUESTS_TOTAL, "method" => method).increment(1);
    }

    pub(crate) fn record_error(method: &'static str) {
        metrics::counter!(Self::NODE_REQUEST_ERRORS_TOTAL, "method" => method).increment(1);
    }
}
