//! Practice workflow tests
//!
//! These tests drive the store, views and dialogs together against the
//! in-memory API:
//! 1. Claims view search over resolved patient fields
//! 2. Claim status filtering
//! 3. Refetch idempotence
//! 4. Deleting a report removes it from Reports and Claims
//! 5. Report dialog create/edit
//! 6. Patient dialog insurance handling

use doctor_store::*;
use std::sync::Arc;

async fn alice_with_lab_report() -> (Arc<InMemoryPracticeApi>, DoctorStore) {
    let api = Arc::new(
        InMemoryPracticeApi::new()
            .with_patients(vec![Patient::new("p1", "Alice").with_email("a@x.com")])
            .with_reports(vec![MedicalReport::new("r1", "p1", "Lab")
                .with_status("Submitted")
                .with_diagnosis("Anemia")]),
    );
    let store = DoctorStore::new(api.clone());
    store.load_all().await.unwrap();
    (api, store)
}

fn ids(reports: &[MedicalReport]) -> Vec<&str> {
    reports.iter().map(|r| r.id.as_str()).collect()
}

// ============================================================================
// TEST 1: Claims search
// ============================================================================

#[tokio::test]
async fn test_claims_search_scenario() {
    let (_, store) = alice_with_lab_report().await;
    let mut claims = ClaimsView::open(&store);

    assert_eq!(ids(claims.search("")), vec!["r1"]);
    assert_eq!(ids(claims.search("alice")), vec!["r1"]);
    assert_eq!(ids(claims.search("ALICE ")), vec!["r1"]);
    assert!(claims.search("xray").is_empty());
}

#[tokio::test]
async fn test_claims_search_with_embedded_patient() {
    let mut embedded = MedicalReport::new("r2", "p2", "Radiology");
    embedded.patient_id = PatientRef::Embedded(Box::new(
        Patient::new("p2", "Bob").with_email("bob@clinic.org"),
    ));
    let api = InMemoryPracticeApi::new().with_reports(vec![embedded]);
    let store = DoctorStore::new(Arc::new(api));
    store.load_all().await.unwrap();

    let mut claims = ClaimsView::open(&store);
    assert_eq!(ids(claims.search("clinic.org")), vec!["r2"]);
}

// ============================================================================
// TEST 2: Claim status filter
// ============================================================================

#[tokio::test]
async fn test_claim_status_filter_is_membership_then_equality() {
    let api = InMemoryPracticeApi::new().with_reports(vec![
        MedicalReport::new("r1", "p1", "Lab").with_status("Submitted"),
        MedicalReport::new("r2", "p1", "Lab").with_status("Claim Pending"),
        MedicalReport::new("r3", "p1", "Lab").with_status("Claim Rejected"),
        MedicalReport::new("r4", "p1", "Lab").with_status("Completed"),
        MedicalReport::new("r5", "p1", "Lab").with_status("Archived"),
    ]);
    let store = DoctorStore::new(Arc::new(api));
    store.load_all().await.unwrap();

    let mut claims = ClaimsView::open(&store);
    assert_eq!(ids(claims.items()), vec!["r1", "r2", "r3"]);

    let all = store.reports();
    for status in ReportStatus::CLAIM_STATUSES {
        let expected: Vec<&str> = all
            .iter()
            .filter(|r| r.status == status)
            .map(|r| r.id.as_str())
            .collect();
        let shown = claims.with_filter(ClaimsFilter {
            status: Some(status.clone()),
        });
        assert_eq!(ids(shown), expected, "status {status}");
    }

    // A non-claim status narrows the claim set to nothing
    let shown = claims.with_filter(ClaimsFilter {
        status: Some(ReportStatus::Completed),
    });
    assert!(shown.is_empty());
}

// ============================================================================
// TEST 3: Refetch idempotence
// ============================================================================

#[tokio::test]
async fn test_fetch_twice_without_writes_is_idempotent() {
    let (_, store) = alice_with_lab_report().await;
    let first = store.fetch_patients().await.unwrap();
    let second = store.fetch_patients().await.unwrap();
    assert_eq!(first, second);

    let first = store.fetch_reports().await.unwrap();
    let second = store.fetch_reports().await.unwrap();
    assert_eq!(first, second);
}

// ============================================================================
// TEST 4: Deletion
// ============================================================================

#[tokio::test]
async fn test_delete_report_removes_from_reports_and_claims() {
    let (api, store) = alice_with_lab_report().await;
    let mut reports = ReportsView::open(&store);
    let mut claims = ClaimsView::open(&store);
    assert_eq!(claims.items().len(), 1);

    let ack = forms::delete_report(&store, "r1").await;
    assert!(ack.is_success());

    assert!(reports.sync());
    assert!(claims.sync());
    assert!(reports.items().is_empty());
    assert!(claims.items().is_empty());
    assert_eq!(api.calls().last(), Some(&"get_all_reports"));
}

#[tokio::test]
async fn test_failed_delete_reports_server_message() {
    let (api, store) = alice_with_lab_report().await;
    api.fail_next(403, Some("Report is locked"));

    let ack = forms::delete_report(&store, "r1").await;
    assert_eq!(ack.kind, AcknowledgmentKind::Error);
    assert_eq!(ack.message, "Report is locked");
    assert_eq!(store.reports().len(), 1);
}

// ============================================================================
// TEST 5: Report dialog
// ============================================================================

#[tokio::test]
async fn test_create_report_dialog() {
    let (api, store) = alice_with_lab_report().await;
    let form = ReportForm {
        patient_id: "p1".into(),
        report_type: "Radiology".into(),
        primary_diagnosis: "Fractured wrist".into(),
        ..Default::default()
    };

    let ack = form.submit(&store, &DialogMode::Create).await.unwrap();
    assert!(ack.is_success());

    let created = store.reports().iter().find(|r| r.id != "r1").cloned().unwrap();
    assert_eq!(created.status, ReportStatus::Submitted);
    assert_eq!(created.primary_diagnosis.as_deref(), Some("Fractured wrist"));
    assert_eq!(
        api.calls()
            .iter()
            .filter(|call| **call == "create_report")
            .count(),
        1
    );
}

#[tokio::test]
async fn test_invalid_report_dialog_issues_no_call() {
    let (api, store) = alice_with_lab_report().await;
    let before = api.calls().len();
    let form = ReportForm {
        patient_id: "p1".into(),
        primary_diagnosis: "Anemia".into(),
        ..Default::default()
    };

    let err = form.submit(&store, &DialogMode::Create).await.unwrap_err();
    assert_eq!(err, FormError::MissingField(forms::ReportField::ReportType));
    assert_eq!(api.calls().len(), before);
}

#[tokio::test]
async fn test_unchanged_edit_keeps_record_and_status() {
    let (_, store) = alice_with_lab_report().await;
    let original = store.reports().first().cloned().unwrap();

    let ack = ReportForm::from_report(&original)
        .submit(&store, &DialogMode::Edit("r1".into()))
        .await
        .unwrap();
    assert!(ack.is_success());

    let after = store.reports().first().cloned().unwrap();
    assert_eq!(ReportUpdate::from(&after), ReportUpdate::from(&original));
    assert_eq!(after.status, original.status);
}

// ============================================================================
// TEST 6: Patient dialog
// ============================================================================

#[tokio::test]
async fn test_add_patient_without_provider_warns_and_issues_no_call() {
    let (api, store) = alice_with_lab_report().await;
    let before = api.calls().len();
    let form = PatientForm {
        name: "Dana".into(),
        ..Default::default()
    };

    let err = form.submit(&store, &DialogMode::Create).await.unwrap_err();
    assert_eq!(err, FormError::MissingInsuranceProvider);
    assert_eq!(err.acknowledgment().kind, AcknowledgmentKind::Warning);
    assert_eq!(api.calls().len(), before);
}

#[tokio::test]
async fn test_add_patient_registers_insurance_once() {
    let (api, store) = alice_with_lab_report().await;
    let form = PatientForm {
        name: "Dana".into(),
        insurance_provider: "Aetna".into(),
        ..Default::default()
    };

    let ack = form.submit(&store, &DialogMode::Create).await.unwrap();
    assert!(ack.is_success());

    let registrations = api.registrations();
    assert_eq!(registrations.len(), 1);
    assert_eq!(registrations[0].insurance_provider, "Aetna");

    let dana = store
        .patients()
        .iter()
        .find(|p| p.name == "Dana")
        .cloned()
        .unwrap();
    assert_eq!(registrations[0].patient_id, vec![dana.id.clone()]);
    assert!(dana.insurance_id.is_some());
}

#[tokio::test]
async fn test_edit_patient_never_registers_insurance() {
    let (api, store) = alice_with_lab_report().await;
    let mut form = PatientForm::from_patient(&store.patient("p1").unwrap());
    form.phone = "555-0100".into();
    form.insurance_provider = "Aetna".into();

    let ack = form
        .submit(&store, &DialogMode::Edit("p1".into()))
        .await
        .unwrap();
    assert!(ack.is_success());
    assert!(api.registrations().is_empty());
    assert!(!api.calls().contains(&"add_insurance"));
    assert_eq!(
        store.patient("p1").and_then(|p| p.phone),
        Some("555-0100".to_string())
    );
}

#[tokio::test]
async fn test_edit_patient_clears_blanked_email() {
    let (api, store) = alice_with_lab_report().await;
    let mut form = PatientForm::from_patient(&store.patient("p1").unwrap());
    form.email.clear();

    let ack = form
        .submit(&store, &DialogMode::Edit("p1".into()))
        .await
        .unwrap();
    assert!(ack.is_success());
    assert_eq!(api.calls().last(), Some(&"get_all_patients"));

    let alice = store.patient("p1").unwrap();
    assert_eq!(alice.email, None);
    assert_eq!(alice.name, "Alice");
}

#[tokio::test]
async fn test_inline_workflow_change() {
    let (_, store) = alice_with_lab_report().await;
    store
        .set_patient_workflow_status("p1", WorkflowStatus::ClaimSubmitted)
        .await
        .unwrap();
    assert_eq!(
        store.patient("p1").and_then(|p| p.patient_workflow_status),
        Some(WorkflowStatus::ClaimSubmitted)
    );
}
