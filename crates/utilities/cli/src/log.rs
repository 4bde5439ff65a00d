//! Log configuration for snapshop binaries.
//!
//! Logs are written to stderr so that command output on stdout stays machine readable.

use crate::CliResult;
use clap::{ArgAction, Parser, ValueEnum};
use tracing::Level;
use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

/// The format of emitted log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Logging arguments.
#[derive(Parser, Default, Clone, Debug)]
pub struct LogArgs {
    /// Verbosity level (0-3). `RUST_LOG` overrides it.
    #[arg(long = "verbosity", short = 'v', action = ArgAction::Count, global = true)]
    pub v: u8,
    /// The format of emitted log lines.
    #[arg(long = "log.format", default_value = "text", global = true)]
    pub log_format: LogFormat,
}

impl LogArgs {
    /// Installs the global tracing subscriber configured by these arguments.
    pub fn init_tracing_subscriber(&self) -> CliResult<()> {
        init_subscriber(self.log_format, env_filter(self.v, None)?)
    }
}

/// Maps a `-v` count to the most verbose level emitted.
pub const fn verbosity_level(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Installs a text tracing subscriber at the level given by `verbosity`.
///
/// If `filter` is given it replaces the verbosity-derived default. In both cases `RUST_LOG`
/// directives take precedence.
pub fn init_tracing_subscriber(
    verbosity: u8,
    filter: Option<impl Into<EnvFilter>>,
) -> CliResult<()> {
    init_subscriber(LogFormat::Text, env_filter(verbosity, filter.map(Into::into))?)
}

fn env_filter(verbosity: u8, filter: Option<EnvFilter>) -> CliResult<EnvFilter> {
    if let Some(filter) = filter {
        return Ok(filter);
    }
    Ok(EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(verbosity_level(verbosity)).into())
        .from_env()?)
}

fn init_subscriber(format: LogFormat, filter: EnvFilter) -> CliResult<()> {
    let layer = match format {
        LogFormat::Text => fmt::layer().with_writer(std::io::stderr).boxed(),
        LogFormat::Json => fmt::layer().json().with_writer(std::io::stderr).boxed(),
    };
    tracing_subscriber::registry().with(filter).with(layer).try_init()?;
    Ok(())
}
