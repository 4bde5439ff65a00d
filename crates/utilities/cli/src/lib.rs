#![doc = "Utilities shared by snapshop binaries: log and metrics configuration, backtraces and CLI styling."]
#![doc(issue_tracker_base_url = "https://github.com/snapshop-rs/snapshop/issues/")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod error;
pub use error::{CliError, CliResult, PrometheusError};

pub mod backtrace;

pub mod log;
pub use log::{LogArgs, LogFormat, init_tracing_subscriber};

pub mod metrics_args;
pub use metrics_args::MetricsArgs;

mod prometheus;
pub use prometheus::init_prometheus_server;

mod styles;
pub use styles::cli_styles;
