//! Utilities for spinning up a prometheus metrics server.

use crate::PrometheusError;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::{IpAddr, SocketAddr, TcpListener};
use tracing::info;

/// Start a Prometheus metrics server on the given address and port.
///
/// Port `0` lets the OS pick a free port. Returns the address the server listens on.
pub fn init_prometheus_server(
    addr: IpAddr,
    metrics_port: u16,
) -> Result<SocketAddr, PrometheusError> {
    let actual_addr = if metrics_port == 0 {
        // PrometheusBuilder binds its own listener, so only borrow the assigned port.
        let listener = TcpListener::bind((addr, 0))?;
        listener.local_addr()?
    } else {
        SocketAddr::from((addr, metrics_port))
    };

    PrometheusBuilder::new().with_http_listener(actual_addr).install()?;

    info!(target: "prometheus", "Serving metrics at: http://{}", actual_addr);
    Ok(actual_addr)
}
