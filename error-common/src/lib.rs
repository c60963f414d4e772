//! Common error handling utilities for Practice Desk
//!
//! This crate provides the error taxonomy shared by every Practice Desk crate,
//! stable error codes, and the glue that turns a failed operation into the
//! acknowledgment text a doctor sees.
//!
//! # Error Categories
//!
//! - **Network**: the API could not be reached (DNS, TLS, timeouts)
//! - **Api**: the API answered with a non-success status
//! - **Validation**: required input missing, blocks dialog confirmation
//! - **NotFound**: a lookup came back empty
//! - **Config**: client configuration could not be resolved
//! - **Serialization**: a payload could not be encoded or decoded
//! - **Internal**: everything else
//!
//! No category is fatal: the caller reports the failure and stays interactive.
//!
//! # Example
//!
//! ```rust
//! use error_common::{PracticeError, ErrorReporter, GENERIC_FAILURE_MESSAGE};
//!
//! let err = PracticeError::Api { status: 500, message: None };
//! assert_eq!(err.acknowledgment_message(), GENERIC_FAILURE_MESSAGE);
//!
//! let err = PracticeError::Api { status: 409, message: Some("Email already registered".into()) };
//! let text = ErrorReporter::new().report("add patient", &err);
//! assert_eq!(text, "Email already registered");
//! ```

pub mod codes;
pub mod context;
pub mod reporting;
pub mod types;

pub use codes::*;
pub use context::*;
pub use reporting::*;
pub use types::*;
