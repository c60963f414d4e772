use chrono::{NaiveDate, Utc};
use error_common::ErrorContext;

use super::{acknowledge, optional, Acknowledgment, DialogMode, FormError};
use crate::models::{age_on, CareStatus, NewPatient, Patient, PatientUpdate, WorkflowStatus};
use crate::store::DoctorStore;

/// Data bound to the patient add/edit dialog
#[derive(Debug, Clone, PartialEq)]
pub struct PatientForm {
    pub name: String,
    pub gender: String,
    pub date_of_birth: Option<NaiveDate>,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub status: CareStatus,
    pub workflow_status: WorkflowStatus,
    pub visible_to_insurance: bool,
    pub visible_to_employee: bool,
    /// Only read when adding a patient
    pub insurance_provider: String,
}

impl Default for PatientForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            gender: String::new(),
            date_of_birth: None,
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            status: CareStatus::ActiveTreatment,
            workflow_status: WorkflowStatus::Created,
            visible_to_insurance: false,
            visible_to_employee: false,
            insurance_provider: String::new(),
        }
    }
}

impl PatientForm {
    pub fn from_patient(patient: &Patient) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        Self {
            name: patient.name.clone(),
            gender: text(&patient.gender),
            date_of_birth: patient.date_of_birth,
            email: text(&patient.email),
            phone: text(&patient.phone),
            address: text(&patient.address),
            status: patient.status.unwrap_or(CareStatus::ActiveTreatment),
            workflow_status: patient
                .patient_workflow_status
                .unwrap_or(WorkflowStatus::Created),
            visible_to_insurance: patient.visible_to_insurance,
            visible_to_employee: patient.visible_to_employee,
            insurance_provider: String::new(),
        }
    }

    /// Create payload. `age` is derived from the birth date as of `today`.
    pub fn to_new_patient(&self, today: NaiveDate) -> NewPatient {
        NewPatient {
            name: self.name.trim().to_string(),
            gender: optional(&self.gender),
            date_of_birth: self.date_of_birth,
            age: self.date_of_birth.and_then(|dob| age_on(dob, today)),
            email: optional(&self.email),
            phone: optional(&self.phone),
            address: optional(&self.address),
            status: self.status,
            patient_workflow_status: self.workflow_status,
            visible_to_insurance: self.visible_to_insurance,
            visible_to_employee: self.visible_to_employee,
        }
    }

    /// Edit payload. Every field the dialog shows is sent, so a cleared
    /// input clears the stored value.
    pub fn to_update(&self, today: NaiveDate) -> PatientUpdate {
        PatientUpdate {
            name: Some(self.name.trim().to_string()),
            gender: Some(optional(&self.gender)),
            date_of_birth: Some(self.date_of_birth),
            age: Some(self.date_of_birth.and_then(|dob| age_on(dob, today))),
            email: Some(optional(&self.email)),
            phone: Some(optional(&self.phone)),
            address: Some(optional(&self.address)),
            status: Some(self.status),
            patient_workflow_status: Some(self.workflow_status),
            visible_to_insurance: Some(self.visible_to_insurance),
            visible_to_employee: Some(self.visible_to_employee),
        }
    }

    /// Confirms the dialog.
    ///
    /// Adding requires an insurance provider and registers the new patient
    /// with it; editing never touches insurance.
    pub async fn submit(
        &self,
        store: &DoctorStore,
        mode: &DialogMode,
    ) -> Result<Acknowledgment, FormError> {
        let today = Utc::now().date_naive();
        let ack = match mode {
            DialogMode::Create => {
                let provider = self.insurance_provider.trim();
                if provider.is_empty() {
                    return Err(FormError::MissingInsuranceProvider);
                }
                acknowledge(
                    store
                        .register_patient(self.to_new_patient(today), provider)
                        .await,
                    "register_patient",
                    ErrorContext::new().add_context("provider", provider),
                    "Patient added successfully",
                )
            }
            DialogMode::Edit(id) => acknowledge(
                store.update_patient(id, self.to_update(today)).await,
                "update_patient",
                ErrorContext::new().with_entity("patient", id),
                "Patient updated successfully",
            ),
        };
        Ok(ack)
    }
}
