//! The practice API seam.
//!
//! [`PracticeApi`] is everything the store needs from the server. It owns
//! transport, authentication and serialization; the store only sees records.

pub mod http;
pub mod memory;

pub use http::HttpPracticeApi;
pub use memory::InMemoryPracticeApi;

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::models::{
    InsuranceRegistration, MedicalReport, NewPatient, NewReport, Patient, PatientUpdate,
    ReportUpdate,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PracticeApi: Send + Sync {
    async fn get_all_patients(&self) -> StoreResult<Vec<Patient>>;

    async fn add_patient(&self, patient: NewPatient) -> StoreResult<Patient>;

    async fn update_patient(&self, id: &str, update: PatientUpdate) -> StoreResult<Patient>;

    async fn delete_patient(&self, id: &str) -> StoreResult<()>;

    async fn get_all_reports(&self) -> StoreResult<Vec<MedicalReport>>;

    async fn create_report(&self, report: NewReport) -> StoreResult<MedicalReport>;

    async fn update_report(&self, id: &str, update: ReportUpdate) -> StoreResult<MedicalReport>;

    async fn delete_report(&self, id: &str) -> StoreResult<()>;

    /// `Ok(None)` when the server has no such report.
    async fn get_report(&self, id: &str) -> StoreResult<Option<MedicalReport>>;

    async fn get_reports_by_patient(&self, patient_id: &str) -> StoreResult<Vec<MedicalReport>>;

    /// Registers the patient with an insurance provider; the server sets
    /// `insuranceId` on the patient afterwards.
    async fn add_insurance(&self, registration: InsuranceRegistration) -> StoreResult<()>;
}
