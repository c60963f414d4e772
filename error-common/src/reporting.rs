// Error reporting: log the failure, hand back the text for the acknowledgment dialog

use crate::context::ErrorContext;
use crate::types::PracticeError;

#[derive(Debug, Clone, Default)]
pub struct ErrorReporter {
    context: ErrorContext,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_context(context: ErrorContext) -> Self {
        Self { context }
    }

    /// Logs `error` and returns the message the user should see.
    pub fn report(&self, action: &str, error: &PracticeError) -> String {
        // Server messages can echo patient emails or phone numbers back.
        let detail = logger_redacted::redact(&error.to_string());
        tracing::warn!(
            action = action,
            error_code = error.code(),
            error_type = error.error_type(),
            context = %self.context.describe(),
            "{action} failed: {detail}"
        );
        error.acknowledgment_message()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GENERIC_FAILURE_MESSAGE;

    #[test]
    fn test_report_returns_acknowledgment_text() {
        let reporter = ErrorReporter::with_context(
            ErrorContext::new().with_entity("patient", "p1"),
        );
        let err = PracticeError::Network("timed out".into());
        assert_eq!(reporter.report("fetch patients", &err), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn test_report_keeps_server_message_unredacted_for_user() {
        let err = PracticeError::Api {
            status: 409,
            message: Some("alice@example.com is already registered".into()),
        };
        assert_eq!(
            ErrorReporter::new().report("add patient", &err),
            "alice@example.com is already registered"
        );
    }
}
