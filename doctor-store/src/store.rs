//! The Doctor data store.
//!
//! One [`DoctorStore`] holds the patient and report collections for the
//! session. Every write goes to the API first and is followed by a full
//! refetch of the affected collection; nothing is updated optimistically.
//! State is published over a [`tokio::sync::watch`] channel so views can
//! re-derive whenever a collection is replaced.

use std::sync::Arc;

use logger_redacted::redacted_warn;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::api::PracticeApi;
use crate::error::StoreResult;
use crate::models::{
    resolve_patient, InsuranceRegistration, MedicalReport, NewPatient, NewReport, Patient,
    PatientRef, PatientUpdate, ReportUpdate, WorkflowStatus,
};

/// Snapshot of the store
///
/// Collections are only ever replaced, never mutated in place, so comparing
/// the `Arc`s tells a view whether a refetch happened.
#[derive(Debug, Clone, Default)]
pub struct StoreState {
    pub patients: Arc<Vec<Patient>>,
    pub reports: Arc<Vec<MedicalReport>>,
    in_flight: usize,
}

impl StoreState {
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn patient(&self, id: &str) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id == id)
    }

    pub fn resolve_patient<'a>(&'a self, reference: &'a PatientRef) -> Option<&'a Patient> {
        resolve_patient(reference, &self.patients)
    }
}

/// Keeps the loading flag raised while alive.
struct LoadingGuard {
    state: Arc<watch::Sender<StoreState>>,
}

impl LoadingGuard {
    fn acquire(state: &Arc<watch::Sender<StoreState>>) -> Self {
        state.send_modify(|s| s.in_flight += 1);
        Self {
            state: Arc::clone(state),
        }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.state
            .send_modify(|s| s.in_flight = s.in_flight.saturating_sub(1));
    }
}

#[derive(Clone)]
pub struct DoctorStore {
    api: Arc<dyn PracticeApi>,
    state: Arc<watch::Sender<StoreState>>,
}

impl DoctorStore {
    /// Creates an empty store on top of `api`.
    pub fn new(api: Arc<dyn PracticeApi>) -> Self {
        let (state, _) = watch::channel(StoreState::default());
        Self {
            api,
            state: Arc::new(state),
        }
    }

    pub fn api(&self) -> &Arc<dyn PracticeApi> {
        &self.api
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.state.subscribe()
    }

    /// Current state. Cheap: the collections are shared, not copied.
    pub fn snapshot(&self) -> StoreState {
        self.state.borrow().clone()
    }

    pub fn patients(&self) -> Arc<Vec<Patient>> {
        Arc::clone(&self.state.borrow().patients)
    }

    pub fn reports(&self) -> Arc<Vec<MedicalReport>> {
        Arc::clone(&self.state.borrow().reports)
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    /// Linear lookup by id in the current patient collection.
    pub fn patient(&self, id: &str) -> Option<Patient> {
        self.state.borrow().patient(id).cloned()
    }

    pub fn resolve_patient(&self, reference: &PatientRef) -> Option<Patient> {
        self.state.borrow().resolve_patient(reference).cloned()
    }

    /// Replaces the patient collection with the server's.
    pub async fn fetch_patients(&self) -> StoreResult<Arc<Vec<Patient>>> {
        let _loading = LoadingGuard::acquire(&self.state);
        let patients = Arc::new(self.api.get_all_patients().await.map_err(|e| {
            redacted_warn!("Failed to fetch patients: {e}");
            e
        })?);
        debug!(count = patients.len(), "Fetched patients");
        self.state
            .send_modify(|s| s.patients = Arc::clone(&patients));
        Ok(patients)
    }

    /// Replaces the report collection with the server's.
    pub async fn fetch_reports(&self) -> StoreResult<Arc<Vec<MedicalReport>>> {
        let _loading = LoadingGuard::acquire(&self.state);
        let reports = Arc::new(self.api.get_all_reports().await.map_err(|e| {
            redacted_warn!("Failed to fetch reports: {e}");
            e
        })?);
        debug!(count = reports.len(), "Fetched reports");
        self.state.send_modify(|s| s.reports = Arc::clone(&reports));
        Ok(reports)
    }

    /// Initial load: patients, then reports. Sequential so report rows can
    /// resolve their patient on first render.
    pub async fn load_all(&self) -> StoreResult<()> {
        self.fetch_patients().await?;
        self.fetch_reports().await?;
        Ok(())
    }

    pub async fn add_patient(&self, patient: NewPatient) -> StoreResult<Patient> {
        let created = self.api.add_patient(patient).await?;
        info!(patient_id = %created.id, "Added patient");
        self.fetch_patients().await?;
        Ok(created)
    }

    /// Creates the patient, then registers them with `insurance_provider`.
    ///
    /// Exactly one registration call is made, keyed on the id the server
    /// assigned. The refetch runs after it so `insuranceId` is visible, and
    /// runs even when registration fails since the patient already exists.
    pub async fn register_patient(
        &self,
        patient: NewPatient,
        insurance_provider: &str,
    ) -> StoreResult<Patient> {
        let created = self.api.add_patient(patient).await?;
        info!(patient_id = %created.id, "Added patient");

        let registration = self
            .api
            .add_insurance(InsuranceRegistration::new(&created.id, insurance_provider))
            .await;
        match &registration {
            Ok(()) => info!(
                patient_id = %created.id,
                provider = insurance_provider,
                "Registered patient insurance"
            ),
            Err(e) => {
                redacted_warn!("Insurance registration failed for patient {}: {e}", created.id)
            }
        }

        self.fetch_patients().await?;
        registration?;
        Ok(created)
    }

    pub async fn update_patient(&self, id: &str, update: PatientUpdate) -> StoreResult<Patient> {
        let updated = self.api.update_patient(id, update).await?;
        info!(patient_id = id, "Updated patient");
        self.fetch_patients().await?;
        Ok(updated)
    }

    /// Inline workflow change from the patient table.
    pub async fn set_patient_workflow_status(
        &self,
        id: &str,
        status: WorkflowStatus,
    ) -> StoreResult<Patient> {
        self.update_patient(id, PatientUpdate::workflow_status(status))
            .await
    }

    pub async fn delete_patient(&self, id: &str) -> StoreResult<()> {
        self.api.delete_patient(id).await?;
        info!(patient_id = id, "Deleted patient");
        self.fetch_patients().await?;
        Ok(())
    }

    pub async fn create_report(&self, report: NewReport) -> StoreResult<MedicalReport> {
        let created = self.api.create_report(report).await?;
        info!(report_id = %created.id, patient_id = created.patient_id.id(), "Created report");
        self.fetch_reports().await?;
        Ok(created)
    }

    pub async fn update_report(&self, id: &str, update: ReportUpdate) -> StoreResult<MedicalReport> {
        let updated = self.api.update_report(id, update).await?;
        info!(report_id = id, "Updated report");
        self.fetch_reports().await?;
        Ok(updated)
    }

    pub async fn delete_report(&self, id: &str) -> StoreResult<()> {
        self.api.delete_report(id).await?;
        info!(report_id = id, "Deleted report");
        self.fetch_reports().await?;
        Ok(())
    }

    /// Single report from the server. Leaves the store untouched.
    pub async fn get_report(&self, id: &str) -> StoreResult<Option<MedicalReport>> {
        self.api.get_report(id).await
    }

    /// Reports for one patient. Leaves the store untouched.
    pub async fn fetch_reports_by_patient(&self, patient_id: &str) -> StoreResult<Vec<MedicalReport>> {
        let reports = self.api.get_reports_by_patient(patient_id).await?;
        debug!(patient_id, count = reports.len(), "Fetched patient reports");
        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockPracticeApi;
    use crate::error::StoreError;
    use crate::models::CareStatus;
    use mockall::predicate::eq;
    use mockall::Sequence;

    fn store(api: MockPracticeApi) -> DoctorStore {
        DoctorStore::new(Arc::new(api))
    }

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
            visible_to_insurance: false,
            visible_to_employee: false,
        }
    }

    #[tokio::test]
    async fn test_store_starts_empty() {
        let store = store(MockPracticeApi::new());
        let state = store.snapshot();
        assert!(state.patients.is_empty());
        assert!(state.reports.is_empty());
        assert!(!state.is_loading());
    }

    #[tokio::test]
    async fn test_load_all_fetches_patients_before_reports() {
        let mut api = MockPracticeApi::new();
        let mut seq = Sequence::new();
        api.expect_get_all_patients()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(vec![Patient::new("p1", "Alice")]));
        api.expect_get_all_reports()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(vec![MedicalReport::new("r1", "p1", "Lab")]));

        let store = store(api);
        store.load_all().await.unwrap();

        let state = store.snapshot();
        assert_eq!(state.patients.len(), 1);
        assert_eq!(state.reports.len(), 1);
        assert_eq!(
            state.resolve_patient(&state.reports[0].patient_id).map(|p| p.name.as_str()),
            Some("Alice")
        );
    }

    #[tokio::test]
    async fn test_fetch_replaces_collection_reference() {
        let mut api = MockPracticeApi::new();
        api.expect_get_all_patients()
            .times(2)
            .returning(|| Ok(vec![Patient::new("p1", "Alice")]));

        let store = store(api);
        let first = store.fetch_patients().await.unwrap();
        let second = store.fetch_patients().await.unwrap();

        assert_eq!(first, second);
        assert!(!Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&second, &store.patients()));
    }

    #[tokio::test]
    async fn test_failed_fetch_clears_loading_and_keeps_data() {
        let mut api = MockPracticeApi::new();
        let mut seq = Sequence::new();
        api.expect_get_all_reports()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(vec![MedicalReport::new("r1", "p1", "Lab")]));
        api.expect_get_all_reports()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Err(StoreError::api(500, "database offline")));

        let store = store(api);
        store.fetch_reports().await.unwrap();
        let err = store.fetch_reports().await.unwrap_err();

        assert!(matches!(err, StoreError::Api { status: 500, .. }));
        assert!(!store.is_loading());
        assert_eq!(store.reports().len(), 1);
    }

    #[tokio::test]
    async fn test_write_is_followed_by_refetch() {
        let mut api = MockPracticeApi::new();
        let mut seq = Sequence::new();
        api.expect_delete_report()
            .withf(|id| id == "r1")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        api.expect_get_all_reports()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(Vec::new()));

        let store = store(api);
        store.delete_report("r1").await.unwrap();
        assert!(store.reports().is_empty());
    }

    #[tokio::test]
    async fn test_failed_write_skips_refetch() {
        let mut api = MockPracticeApi::new();
        api.expect_update_patient()
            .returning(|_, _| Err(StoreError::api(409, "Email already registered")));
        api.expect_get_all_patients().never();

        let store = store(api);
        let err = store
            .update_patient("p1", PatientUpdate::default())
            .await
            .unwrap_err();
        assert_eq!(err.acknowledgment_message(), "Email already registered");
    }

    #[tokio::test]
    async fn test_register_patient_makes_one_insurance_call() {
        let mut api = MockPracticeApi::new();
        let mut seq = Sequence::new();
        api.expect_add_patient()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|p| Ok(Patient::new("p9", p.name)));
        api.expect_add_insurance()
            .with(eq(InsuranceRegistration::new("p9", "Aetna")))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        api.expect_get_all_patients()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| {
                let mut patient = Patient::new("p9", "Dana");
                patient.insurance_id = Some("ins-1".into());
                Ok(vec![patient])
            });

        let store = store(api);
        let created = store
            .register_patient(new_patient("Dana"), "Aetna")
            .await
            .unwrap();

        assert_eq!(created.id, "p9");
        assert_eq!(
            store.patient("p9").and_then(|p| p.insurance_id),
            Some("ins-1".to_string())
        );
    }

    #[tokio::test]
    async fn test_failed_registration_still_refetches() {
        let mut api = MockPracticeApi::new();
        api.expect_add_patient()
            .returning(|p| Ok(Patient::new("p9", p.name)));
        api.expect_add_insurance()
            .times(1)
            .returning(|_| Err(StoreError::api(502, "Provider unavailable")));
        api.expect_get_all_patients()
            .times(1)
            .returning(|| Ok(vec![Patient::new("p9", "Dana")]));

        let store = store(api);
        let err = store
            .register_patient(new_patient("Dana"), "Aetna")
            .await
            .unwrap_err();

        assert_eq!(err.acknowledgment_message(), "Provider unavailable");
        assert!(store.patient("p9").is_some());
    }

    /// Collects formatted log output for assertions.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<parking_lot::Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[tokio::test]
    async fn test_registration_logs_carry_no_patient_details() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let mut api = MockPracticeApi::new();
        api.expect_add_patient()
            .returning(|p| Ok(Patient::new("p7", p.name).with_email("alice.smith@example.com")));
        api.expect_add_insurance().returning(|_| {
            Err(StoreError::api(
                409,
                "alice.smith@example.com is already insured",
            ))
        });
        api.expect_get_all_patients()
            .returning(|| Ok(vec![Patient::new("p7", "Alice Smith")]));

        let store = store(api);
        store
            .register_patient(new_patient("Alice Smith"), "Aetna")
            .await
            .unwrap_err();

        let text = logs.text();
        assert!(text.contains("Added patient"));
        assert!(text.contains("p7"));
        assert!(!text.contains("Alice Smith"));
        assert!(!text.contains("alice.smith@example.com"));
    }

    #[tokio::test]
    async fn test_workflow_change_sends_partial_update() {
        let mut api = MockPracticeApi::new();
        api.expect_update_patient()
            .withf(|id, update| {
                id == "p1" && *update == PatientUpdate::workflow_status(WorkflowStatus::Approved)
            })
            .times(1)
            .returning(|id, _| Ok(Patient::new(id, "Alice")));
        api.expect_get_all_patients()
            .times(1)
            .returning(|| Ok(vec![Patient::new("p1", "Alice")]));

        let store = store(api);
        store
            .set_patient_workflow_status("p1", WorkflowStatus::Approved)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_reads_do_not_touch_state() {
        let mut api = MockPracticeApi::new();
        api.expect_get_report()
            .withf(|id| id == "r1")
            .returning(|id| Ok(Some(MedicalReport::new(id, "p1", "Lab"))));
        api.expect_get_reports_by_patient()
            .withf(|id| id == "p1")
            .returning(|_| Ok(vec![MedicalReport::new("r1", "p1", "Lab")]));

        let store = store(api);
        let mut rx = store.subscribe();
        rx.borrow_and_update();

        assert!(store.get_report("r1").await.unwrap().is_some());
        assert_eq!(store.fetch_reports_by_patient("p1").await.unwrap().len(), 1);
        assert!(!rx.has_changed().unwrap());
        assert!(store.reports().is_empty());
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_noop() {
        let mut api = MockPracticeApi::new();
        api.expect_get_all_patients()
            .returning(|| Ok(vec![Patient::new("p1", "Alice")]));

        let store = store(api);
        let rx = store.subscribe();
        drop(rx);
        store.fetch_patients().await.unwrap();
        assert_eq!(store.patients().len(), 1);
    }
}
