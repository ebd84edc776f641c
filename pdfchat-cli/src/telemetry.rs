//! Log subscriber setup. Logs always go to stderr so stdout stays reserved
//! for answers.

use clap::ValueEnum;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::error::{CliError, Result};

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "warn,pdfchat_rag=info,pdfchat_model=info,pdfchat_cli=info";

/// Output format of log records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable, one line per event.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// `RUST_LOG` when present and valid, [`DEFAULT_FILTER`] otherwise.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_telemetry(format: LogFormat) -> Result<()> {
    let subscriber = tracing_subscriber::registry().with(env_filter());

    let installed = match format {
        LogFormat::Pretty => {
            subscriber.with(fmt::layer().with_writer(std::io::stderr).with_target(false)).try_init()
        }
        LogFormat::Json => subscriber.with(fmt::layer().json().with_writer(std::io::stderr)).try_init(),
    };

    installed.map_err(|e| CliError::Config(format!("failed to install log subscriber: {e}")))
}
