use thiserror::Error;

use crate::codes;

/// Shown when a failure carries no server-provided explanation.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Error taxonomy shared across Practice Desk crates
#[derive(Error, Debug)]
pub enum PracticeError {
    /// The API could not be reached
    #[error("Network error: {0}")]
    Network(String),

    /// The API answered with a non-success status
    #[error("API error ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Api { status: u16, message: Option<String> },

    /// Required input missing or malformed
    #[error("Validation error: {0}")]
    Validation(String),

    /// A lookup returned nothing
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Payload encoding or decoding failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal system errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PracticeError {
    /// Stable code for this error, see [`crate::codes`].
    pub fn code(&self) -> &'static str {
        match self {
            PracticeError::Network(_) => codes::network::UNREACHABLE,
            PracticeError::Api { status, .. } if *status >= 500 => codes::network::SERVER_ERROR,
            PracticeError::Api { .. } => codes::network::REQUEST_REJECTED,
            PracticeError::Validation(_) => codes::validation::MISSING_REQUIRED_FIELD,
            PracticeError::NotFound(_) => codes::lookup::NOT_FOUND,
            PracticeError::Config(_) => codes::config::INVALID,
            PracticeError::Serialization(_) => codes::validation::INVALID_FORMAT,
            PracticeError::Internal(_) => codes::internal::UNEXPECTED,
        }
    }

    /// Short category name used in structured log fields.
    pub fn error_type(&self) -> &'static str {
        match self {
            PracticeError::Network(_) => "network",
            PracticeError::Api { .. } => "api",
            PracticeError::Validation(_) => "validation",
            PracticeError::NotFound(_) => "not_found",
            PracticeError::Config(_) => "config",
            PracticeError::Serialization(_) => "serialization",
            PracticeError::Internal(_) => "internal",
        }
    }

    /// Text for the user-visible acknowledgment dialog.
    ///
    /// Server-provided messages and validation messages are shown verbatim;
    /// everything else collapses to [`GENERIC_FAILURE_MESSAGE`].
    pub fn acknowledgment_message(&self) -> String {
        match self {
            PracticeError::Api { message: Some(message), .. } if !message.trim().is_empty() => {
                message.clone()
            }
            PracticeError::Validation(message) => message.clone(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

impl From<serde_json::Error> for PracticeError {
    fn from(err: serde_json::Error) -> Self {
        PracticeError::Serialization(err.to_string())
    }
}

/// Result type alias for Practice Desk operations
pub type Result<T> = std::result::Result<T, PracticeError>;
