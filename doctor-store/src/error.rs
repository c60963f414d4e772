use error_common::PracticeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Api { status: u16, message: Option<String> },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl StoreError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        StoreError::Api {
            status,
            message: Some(message.into()),
        }
    }

    /// Shared-taxonomy view of this error, for reporting.
    pub fn to_practice_error(&self) -> PracticeError {
        match self {
            StoreError::Network(e) => PracticeError::Network(e.to_string()),
            StoreError::Api { status, message } => PracticeError::Api {
                status: *status,
                message: message.clone(),
            },
            StoreError::Serialization(e) => PracticeError::Serialization(e.to_string()),
            StoreError::Config(reason) => PracticeError::Config(reason.clone()),
        }
    }

    /// Server-provided message, or the generic fallback.
    pub fn acknowledgment_message(&self) -> String {
        self.to_practice_error().acknowledgment_message()
    }
}

impl From<StoreError> for PracticeError {
    fn from(err: StoreError) -> Self {
        err.to_practice_error()
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use error_common::GENERIC_FAILURE_MESSAGE;

    #[test]
    fn test_acknowledgment_prefers_server_message() {
        assert_eq!(
            StoreError::api(422, "Report type is invalid").acknowledgment_message(),
            "Report type is invalid"
        );
        assert_eq!(
            StoreError::Config("api base URL is empty".into()).acknowledgment_message(),
            GENERIC_FAILURE_MESSAGE
        );
    }

    #[test]
    fn test_converts_into_shared_taxonomy() {
        let err: PracticeError = StoreError::Api { status: 503, message: None }.into();
        assert_eq!(err.error_type(), "api");
        assert_eq!(err.code(), error_common::codes::network::SERVER_ERROR);
    }
}
