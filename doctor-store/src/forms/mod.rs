//! Detail/edit dialogs.
//!
//! A dialog holds typed form data, validates the few required fields on
//! confirm, issues exactly one write through the store and turns the outcome
//! into an [`Acknowledgment`] for the user. Validation failures come back as
//! [`FormError`] and keep the dialog open.

pub mod patient;
pub mod report;

pub use patient::PatientForm;
pub use report::{ReportField, ReportForm};

use error_common::{ErrorContext, ErrorReporter, PracticeError};
use serde::Serialize;
use thiserror::Error;

use crate::error::StoreResult;
use crate::store::DoctorStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AcknowledgmentKind {
    Success,
    Error,
    Warning,
}

/// What the user is told after a dialog action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Acknowledgment {
    pub kind: AcknowledgmentKind,
    pub title: String,
    pub message: String,
}

impl Acknowledgment {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: AcknowledgmentKind::Success,
            title: "Success".to_string(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: AcknowledgmentKind::Error,
            title: "Error".to_string(),
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: AcknowledgmentKind::Warning,
            title: "Warning".to_string(),
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == AcknowledgmentKind::Success
    }
}

/// Confirmation blocked by missing input
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormError {
    #[error("{} is required", .0.label())]
    MissingField(ReportField),

    #[error("Please select an insurance provider")]
    MissingInsuranceProvider,
}

impl FormError {
    pub fn acknowledgment(&self) -> Acknowledgment {
        Acknowledgment::warning(self.to_string())
    }
}

impl From<FormError> for PracticeError {
    fn from(err: FormError) -> Self {
        PracticeError::Validation(err.to_string())
    }
}

/// Whether a dialog creates a record or edits the one with the given id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogMode {
    Create,
    Edit(String),
}

/// Trimmed text input; blank inputs become `None`.
fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Turns the outcome of a store write into the user-facing acknowledgment.
fn acknowledge<T>(
    result: StoreResult<T>,
    action: &str,
    context: ErrorContext,
    success: &str,
) -> Acknowledgment {
    match result {
        Ok(_) => Acknowledgment::success(success),
        Err(err) => {
            let reporter = ErrorReporter::with_context(context.with_operation(action));
            Acknowledgment::error(reporter.report(action, &err.to_practice_error()))
        }
    }
}

/// Row action: delete a report and refetch.
pub async fn delete_report(store: &DoctorStore, id: &str) -> Acknowledgment {
    acknowledge(
        store.delete_report(id).await,
        "delete_report",
        ErrorContext::new().with_entity("report", id),
        "Report deleted successfully",
    )
}

/// Row action: delete a patient and refetch.
pub async fn delete_patient(store: &DoctorStore, id: &str) -> Acknowledgment {
    acknowledge(
        store.delete_patient(id).await,
        "delete_patient",
        ErrorContext::new().with_entity("patient", id),
        "Patient deleted successfully",
    )
}
