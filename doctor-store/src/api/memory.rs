use async_trait::async_trait;
use parking_lot::RwLock;

use super::PracticeApi;
use crate::error::{StoreError, StoreResult};
use crate::models::{
    InsuranceRegistration, MedicalReport, NewPatient, NewReport, Patient, PatientRef,
    PatientUpdate, ReportUpdate,
};

/// In-memory practice API for testing and development
///
/// Keeps insertion order, hands out sequential ids (`p1`, `r2`, ...) and
/// records the name of every call it receives.
#[derive(Default)]
pub struct InMemoryPracticeApi {
    state: RwLock<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    patients: Vec<Patient>,
    reports: Vec<MedicalReport>,
    registrations: Vec<InsuranceRegistration>,
    next_id: u64,
    calls: Vec<&'static str>,
    fail_next: Option<(u16, Option<String>)>,
}

impl MemoryState {
    /// Next unused id with the given prefix; seeded records are skipped.
    fn next_id(&mut self, prefix: &str) -> String {
        loop {
            self.next_id += 1;
            let id = format!("{prefix}{}", self.next_id);
            let taken = self.patients.iter().any(|p| p.id == id)
                || self.reports.iter().any(|r| r.id == id);
            if !taken {
                return id;
            }
        }
    }

    /// Records the call and consumes a pending injected failure.
    fn enter(&mut self, call: &'static str) -> StoreResult<()> {
        self.calls.push(call);
        match self.fail_next.take() {
            Some((status, message)) => Err(StoreError::Api { status, message }),
            None => Ok(()),
        }
    }
}

fn not_found(kind: &str, id: &str) -> StoreError {
    StoreError::api(404, format!("{kind} {id} not found"))
}

impl InMemoryPracticeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_patients(self, patients: Vec<Patient>) -> Self {
        self.state.write().patients = patients;
        self
    }

    pub fn with_reports(self, reports: Vec<MedicalReport>) -> Self {
        self.state.write().reports = reports;
        self
    }

    /// Makes the next call fail with `status` and an optional server message.
    pub fn fail_next(&self, status: u16, message: Option<&str>) {
        self.state.write().fail_next = Some((status, message.map(str::to_string)));
    }

    /// Names of the calls received so far, oldest first.
    pub fn calls(&self) -> Vec<&'static str> {
        self.state.read().calls.clone()
    }

    pub fn registrations(&self) -> Vec<InsuranceRegistration> {
        self.state.read().registrations.clone()
    }

    /// Changes a report behind the store's back, as another user would.
    pub fn set_report_status(&self, id: &str, status: &str) {
        if let Some(report) = self.state.write().reports.iter_mut().find(|r| r.id == id) {
            report.status = status.into();
        }
    }
}

#[async_trait]
impl PracticeApi for InMemoryPracticeApi {
    async fn get_all_patients(&self) -> StoreResult<Vec<Patient>> {
        let mut state = self.state.write();
        state.enter("get_all_patients")?;
        Ok(state.patients.clone())
    }

    async fn add_patient(&self, patient: NewPatient) -> StoreResult<Patient> {
        let mut state = self.state.write();
        state.enter("add_patient")?;
        let id = state.next_id("p");
        let created = Patient {
            id,
            name: patient.name,
            gender: patient.gender,
            date_of_birth: patient.date_of_birth,
            age: patient.age,
            email: patient.email,
            phone: patient.phone,
            address: patient.address,
            status: Some(patient.status),
            patient_workflow_status: Some(patient.patient_workflow_status),
            visible_to_insurance: patient.visible_to_insurance,
            visible_to_employee: patient.visible_to_employee,
            insurance_id: None,
        };
        state.patients.push(created.clone());
        Ok(created)
    }

    async fn update_patient(&self, id: &str, update: PatientUpdate) -> StoreResult<Patient> {
        let mut state = self.state.write();
        state.enter("update_patient")?;
        let patient = state
            .patients
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found("patient", id))?;
        update.apply_to(patient);
        Ok(patient.clone())
    }

    async fn delete_patient(&self, id: &str) -> StoreResult<()> {
        let mut state = self.state.write();
        state.enter("delete_patient")?;
        let before = state.patients.len();
        state.patients.retain(|p| p.id != id);
        if state.patients.len() == before {
            return Err(not_found("patient", id));
        }
        Ok(())
    }

    async fn get_all_reports(&self) -> StoreResult<Vec<MedicalReport>> {
        let mut state = self.state.write();
        state.enter("get_all_reports")?;
        Ok(state.reports.clone())
    }

    async fn create_report(&self, report: NewReport) -> StoreResult<MedicalReport> {
        let mut state = self.state.write();
        state.enter("create_report")?;
        let id = state.next_id("r");
        let created = MedicalReport {
            id,
            patient_id: PatientRef::ById(report.patient_id),
            report_type: Some(report.report_type),
            primary_diagnosis: Some(report.primary_diagnosis),
            secondary_diagnosis: report.secondary_diagnosis,
            treatment: report.treatment,
            medications: report.medications,
            lab_results: report.lab_results,
            recommendations: report.recommendations,
            follow_up_date: report.follow_up_date,
            service_date_from: report.service_date_from,
            service_date_to: report.service_date_to,
            procedure_codes: report.procedure_codes,
            referring_provider_name: report.referring_provider_name,
            referring_provider_npi: report.referring_provider_npi,
            status: report.status,
            created_at: Some(chrono::Utc::now()),
        };
        state.reports.push(created.clone());
        Ok(created)
    }

    async fn update_report(&self, id: &str, update: ReportUpdate) -> StoreResult<MedicalReport> {
        let mut state = self.state.write();
        state.enter("update_report")?;
        let report = state
            .reports
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| not_found("report", id))?;
        update.apply_to(report);
        Ok(report.clone())
    }

    async fn delete_report(&self, id: &str) -> StoreResult<()> {
        let mut state = self.state.write();
        state.enter("delete_report")?;
        let before = state.reports.len();
        state.reports.retain(|r| r.id != id);
        if state.reports.len() == before {
            return Err(not_found("report", id));
        }
        Ok(())
    }

    async fn get_report(&self, id: &str) -> StoreResult<Option<MedicalReport>> {
        let mut state = self.state.write();
        state.enter("get_report")?;
        Ok(state.reports.iter().find(|r| r.id == id).cloned())
    }

    async fn get_reports_by_patient(&self, patient_id: &str) -> StoreResult<Vec<MedicalReport>> {
        let mut state = self.state.write();
        state.enter("get_reports_by_patient")?;
        Ok(state
            .reports
            .iter()
            .filter(|r| r.patient_id.id() == patient_id)
            .cloned()
            .collect())
    }

    async fn add_insurance(&self, registration: InsuranceRegistration) -> StoreResult<()> {
        let mut state = self.state.write();
        state.enter("add_insurance")?;
        let insurance_id = state.next_id("ins");
        for patient_id in &registration.patient_id {
            if let Some(patient) = state.patients.iter_mut().find(|p| &p.id == patient_id) {
                patient.insurance_id = Some(insurance_id.clone());
            }
        }
        state.registrations.push(registration);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CareStatus, WorkflowStatus};

    fn new_patient(name: &str) -> NewPatient {
        NewPatient {
            name: name.to_string(),
            gender: None,
            date_of_birth: None,
            age: None,
            email: None,
            phone: None,
            address: None,
            status: CareStatus::ActiveTreatment,
            patient_workflow_status: WorkflowStatus::Created,
            visible_to_insurance: true,
            visible_to_employee: false,
        }
    }

    #[tokio::test]
    async fn test_ids_skip_seeded_records() {
        let api = InMemoryPracticeApi::new().with_patients(vec![Patient::new("p1", "Alice")]);
        let created = api.add_patient(new_patient("Bob")).await.unwrap();
        assert_eq!(created.id, "p2");
        assert_eq!(api.get_all_patients().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_partial_update_leaves_other_fields() {
        let api = InMemoryPracticeApi::new()
            .with_patients(vec![Patient::new("p1", "Alice").with_email("a@x.com")]);
        let updated = api
            .update_patient("p1", PatientUpdate::workflow_status(WorkflowStatus::Approved))
            .await
            .unwrap();
        assert_eq!(updated.email.as_deref(), Some("a@x.com"));
        assert_eq!(updated.patient_workflow_status, Some(WorkflowStatus::Approved));
    }

    #[tokio::test]
    async fn test_missing_records_are_404() {
        let api = InMemoryPracticeApi::new();
        assert!(api.get_report("r1").await.unwrap().is_none());
        let err = api.delete_report("r1").await.unwrap_err();
        assert!(matches!(err, StoreError::Api { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_insurance_sets_patient_insurance_id() {
        let api = InMemoryPracticeApi::new().with_patients(vec![Patient::new("p1", "Alice")]);
        api.add_insurance(InsuranceRegistration::new("p1", "Aetna"))
            .await
            .unwrap();
        let patients = api.get_all_patients().await.unwrap();
        assert!(patients[0].insurance_id.is_some());
        assert_eq!(api.registrations().len(), 1);
    }

    #[tokio::test]
    async fn test_fail_next_applies_once() {
        let api = InMemoryPracticeApi::new();
        api.fail_next(503, None);
        assert!(api.get_all_reports().await.is_err());
        assert!(api.get_all_reports().await.is_ok());
        assert_eq!(api.calls(), vec!["get_all_reports", "get_all_reports"]);
    }
}
