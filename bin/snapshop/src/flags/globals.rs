//! Global arguments for the CLI.

use crate::flags::ProviderArgs;
use clap::Parser;
use snapshop_cli::{LogArgs, MetricsArgs};

/// Global arguments for the CLI.
#[derive(Parser, Clone, Debug)]
pub struct GlobalArgs {
    /// Logging arguments.
    #[command(flatten)]
    pub log_args: LogArgs,
    /// Prometheus metrics arguments.
    #[command(flatten)]
    pub metrics: MetricsArgs,
    /// Node connection arguments.
    #[command(flatten)]
    pub provider: ProviderArgs,
    /// Verify every header and proof locally before using it.
    #[arg(long = "self-check", global = true, env = "SNAPSHOP_SELF_CHECK")]
    pub self_check: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_defaults() {
        let args = GlobalArgs::try_parse_from(["test"]).unwrap();
        assert_eq!(args.log_args.v, 0);
        assert!(!args.self_check);
        assert!(!args.metrics.enabled);
    }

    #[test]
    fn test_global_flags() {
        let args = GlobalArgs::try_parse_from([
            "test",
            "-vv",
            "--self-check",
            "--metrics.enabled",
            "--metrics.port",
            "9301",
        ])
        .unwrap();
        assert_eq!(args.log_args.v, 2);
        assert!(args.self_check);
        assert!(args.metrics.enabled);
        assert_eq!(args.metrics.port, 9301);
    }
}
