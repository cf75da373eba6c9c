//! # Structured Logging
//!
//! Sets up the `tracing` subscriber for binaries and integration tests that
//! embed this crate, with a JSON or pretty format and filtering via
//! `RUST_LOG`.
//!
//! The library itself only emits events: `debug!` when an essence is
//! assembled or signed, `warn!` when one is rejected, and `trace!` from the
//! signer. Nothing is logged until a subscriber is installed. Key material
//! and signatures never appear in events.
//!
//! All output goes to stderr so stdout stays free for encoded documents.

use thiserror::Error;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable output for local development.
    #[default]
    Pretty,
    /// One JSON object per line, for log aggregation.
    Json,
}

impl LogFormat {
    /// Accepts "json" or "pretty", case-insensitively. Anything else is
    /// `Pretty`.
    pub fn from_str_lossy(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("a global tracing subscriber is already installed: {0}")]
    AlreadyInitialized(#[from] TryInitError),
}

/// Installs the global tracing subscriber.
///
/// `default_level` applies when `RUST_LOG` is unset, for example `"info"`
/// or `"tangle_protocol=debug"`. A second call fails with
/// [`LoggingError::AlreadyInitialized`] instead of panicking.
pub fn init_logging(default_level: &str, format: LogFormat) -> Result<(), LoggingError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .try_init()?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr).with_target(true))
                .try_init()?;
        }
    }

    tracing::info!(?format, "logging initialized");
    Ok(())
}
