//! Doctor data store for Practice Desk
//!
//! Holds the patient and medical report collections a doctor works with,
//! talks to the practice API through the [`PracticeApi`] trait, and provides
//! the list views and dialogs built on top of them. Claims are not a record
//! of their own: a report is a claim while its status is one of
//! [`ReportStatus::CLAIM_STATUSES`].
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use doctor_store::{ClaimsView, DoctorStore, InMemoryPracticeApi, MedicalReport, Patient};
//!
//! # tokio_test::block_on(async {
//! let api = InMemoryPracticeApi::new()
//!     .with_patients(vec![Patient::new("p1", "Alice").with_email("a@x.com")])
//!     .with_reports(vec![MedicalReport::new("r1", "p1", "Lab")]);
//! let store = DoctorStore::new(Arc::new(api));
//! store.load_all().await.unwrap();
//!
//! let mut claims = ClaimsView::open(&store);
//! assert_eq!(claims.search("alice").len(), 1);
//! assert!(claims.search("xray").is_empty());
//! # });
//! ```

pub mod api;
pub mod detail;
pub mod error;
pub mod format;
pub mod forms;
pub mod models;
pub mod store;
pub mod views;

pub use api::{HttpPracticeApi, InMemoryPracticeApi, PracticeApi};
pub use detail::{PatientDetail, ReportDetail};
pub use error::{StoreError, StoreResult};
pub use forms::{Acknowledgment, AcknowledgmentKind, DialogMode, FormError, PatientForm, ReportForm};
pub use models::*;
pub use store::{DoctorStore, StoreState};
pub use views::{
    ClaimsFilter, ClaimsView, FilteredView, PatientsFilter, PatientsView, ReportsFilter,
    ReportsView, ViewFilter,
};
