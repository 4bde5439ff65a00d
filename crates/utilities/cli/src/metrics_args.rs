//! Prometheus metrics arguments.

use crate::{CliResult, init_prometheus_server};
use clap::Parser;
use std::net::{IpAddr, Ipv4Addr};

/// Configuration of the Prometheus metrics endpoint.
///
/// The endpoint lives as long as the process does.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub struct MetricsArgs {
    /// Serve node request metrics over HTTP in the Prometheus exposition format.
    #[arg(long = "metrics.enabled", global = true, env = "SNAPSHOP_METRICS_ENABLED")]
    pub enabled: bool,
    /// The address the metrics server binds to.
    #[arg(
        long = "metrics.addr",
        global = true,
        default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        env = "SNAPSHOP_METRICS_ADDR"
    )]
    pub addr: IpAddr,
    /// The port the metrics server listens on. `0` picks a free port.
    #[arg(
        long = "metrics.port",
        global = true,
        default_value_t = 9090,
        env = "SNAPSHOP_METRICS_PORT"
    )]
    pub port: u16,
}

impl Default for MetricsArgs {
    fn default() -> Self {
        Self { enabled: false, addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED), port: 9090 }
    }
}

impl MetricsArgs {
    /// Starts the metrics server if enabled. Returns whether a recorder was installed.
    pub fn init_metrics(&self) -> CliResult<bool> {
        if !self.enabled {
            return Ok(false);
        }
        init_prometheus_server(self.addr, self.port)?;
        Ok(true)
    }
}
