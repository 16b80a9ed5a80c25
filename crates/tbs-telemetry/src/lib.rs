//! # TBS Telemetry
//!
//! Process-wide `tracing` subscriber setup for binaries and test harnesses
//! that embed the block store. Library crates only emit events; installing
//! the subscriber is left to whoever owns `main`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tbs_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() {
//!     init_logging(&TelemetryConfig::from_env()).expect("logging");
//!     // allocation events now reach stdout
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `TBS_SERVICE_NAME` | `tiered-block-store` | Service name in the startup event |
//! | `TBS_LOG_LEVEL` | `info` | Filter directives (falls back to `RUST_LOG`) |
//! | `TBS_CONSOLE_OUTPUT` | `true` | Emit to stdout |
//! | `TBS_JSON_LOGS` | `false` | JSON lines output |

mod config;

pub use config::{TelemetryConfig, DEFAULT_LOG_LEVEL};

use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter {directives:?}: {reason}")]
    InvalidFilter { directives: String, reason: String },

    #[error("A global tracing subscriber is already installed")]
    AlreadyInitialized,
}

/// Install the global subscriber described by `config`.
///
/// Fails with `AlreadyInitialized` on every call after the first one that
/// succeeded, including one made by another crate.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = build_filter(&config.log_level)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if !config.console_output {
        registry.try_init()
    } else if config.json_logs {
        registry
            .with(fmt::layer().json().with_target(true))
            .try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };
    installed.map_err(|_| TelemetryError::AlreadyInitialized)?;

    tracing::info!(
        service = %config.service_name,
        filter = %config.log_level,
        json = config.json_logs,
        "logging initialized"
    );
    Ok(())
}

fn build_filter(directives: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(directives).map_err(|e| TelemetryError::InvalidFilter {
        directives: directives.to_string(),
        reason: e.to_string(),
    })
}
