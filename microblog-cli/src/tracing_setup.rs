//! Tracing setup for the microblog CLI
//!
//! Logs go to stderr so stdout stays clean for paths and `--json` output.
//!
//! Usage:
//!   microblog --debug post ...           # Debug logging, shows targets
//!   RUST_LOG=microblog_core=debug ...    # Fine-grained log control
//!
//! Environment variables:
//!   RUST_LOG                             # Log filter (default: warn)

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Debug level unless RUST_LOG is set
    pub debug: bool,
}

/// Filter used when RUST_LOG is absent
fn default_directive(config: &TracingConfig) -> &'static str {
    if config.debug {
        "debug"
    } else {
        "warn"
    }
}

fn env_filter(config: &TracingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(config)))
}

/// Compact console output on stderr
pub fn init_tracing(config: &TracingConfig) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_writer(std::io::stderr)
        .with_target(config.debug)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}
