//! Logging for Practice Desk with automatic patient PII redaction
//!
//! Patient names travel with reports and claims, and the store logs what it
//! fetches and writes. This crate owns the `tracing-subscriber` setup and a
//! redactor that strips emails, phone numbers, SSNs and dates (birth dates)
//! out of free-form log text before it is emitted.
//!
//! # Detected Data Types
//!
//! - **Email Addresses**: alice@example.com → a***@e***
//! - **Phone Numbers**: (555) 123-4567 → (***) ***-****
//! - **SSN**: 123-45-6789 → ***-**-****
//! - **Dates**: 1984-03-12 → ****-**-**
//!
//! With `hash_for_correlation` enabled each match is replaced by a short
//! SHA-256 prefix instead, so the same value can be followed across lines.
//!
//! # Example
//!
//! ```rust
//! use logger_redacted::{PiiRedactor, RedactionConfig};
//!
//! let redactor = PiiRedactor::new(RedactionConfig {
//!     hash_for_correlation: false,
//!     ..Default::default()
//! });
//! assert_eq!(
//!     redactor.redact("born 1984-03-12"),
//!     "born ****-**-**"
//! );
//! ```

pub mod config;
pub mod macros;
pub mod redactor;

pub use config::*;
pub use redactor::*;

use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tracing_subscriber::{
    fmt::{self, time::ChronoUtc},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("Logger already initialised: {0}")]
    AlreadyInitialised(String),
}

static REDACTION_ENABLED: AtomicBool = AtomicBool::new(true);

/// Installs the global subscriber described by `config`.
///
/// `RUST_LOG` takes precedence over `config.log_level` when set.
pub fn init_logging(config: &LoggerConfig) -> Result<(), LoggerError> {
    set_redaction_enabled(config.redaction_enabled);

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(config.filter_directive()).map_err(|e| {
            LoggerError::InvalidFilter {
                filter: config.filter_directive(),
                reason: e.to_string(),
            }
        })?,
    };

    let result = if config.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(false)
                    .json(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_level(true),
            )
            .try_init()
    };

    result.map_err(|e| LoggerError::AlreadyInitialised(e.to_string()))
}

/// Turns the `redacted_*!` macros into plain logging when `false`.
pub fn set_redaction_enabled(enabled: bool) {
    REDACTION_ENABLED.store(enabled, Ordering::Relaxed);
}

/// Redacts `text` with the process-wide default redactor.
pub fn redact(text: &str) -> String {
    if REDACTION_ENABLED.load(Ordering::Relaxed) {
        redactor::default_redactor().redact(text)
    } else {
        text.to_string()
    }
}
