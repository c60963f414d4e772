//! Read-only detail panels for a single report or patient.

use chrono::{NaiveDate, Utc};

use crate::error::StoreResult;
use crate::format::{format_age, format_currency, format_date, EMPTY};
use crate::models::{MedicalReport, Patient};
use crate::store::DoctorStore;

/// A report with its patient resolved
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDetail {
    pub report: MedicalReport,
    pub patient: Option<Patient>,
}

impl ReportDetail {
    /// Loads the report from the server.
    ///
    /// `Ok(None)` when the report does not exist; the caller simply does not
    /// open the panel.
    pub async fn open(store: &DoctorStore, id: &str) -> StoreResult<Option<Self>> {
        let Some(report) = store.get_report(id).await? else {
            tracing::debug!(report_id = id, "Report not found, not opening detail");
            return Ok(None);
        };
        let patient = store.resolve_patient(&report.patient_id);
        Ok(Some(Self { report, patient }))
    }

    pub fn patient_name(&self) -> &str {
        self.patient
            .as_ref()
            .map(|p| p.name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(EMPTY)
    }

    pub fn service_period(&self) -> String {
        match (self.report.service_date_from, self.report.service_date_to) {
            (None, None) => EMPTY.to_string(),
            (from, to) if from == to => format_date(from),
            (from, to) => format!("{} - {}", format_date(from), format_date(to)),
        }
    }

    pub fn follow_up(&self) -> String {
        format_date(self.report.follow_up_date)
    }

    pub fn created(&self) -> String {
        format_date(self.report.created_at.map(|at| at.date_naive()))
    }

    pub fn total_charges(&self) -> String {
        format_currency(self.report.total_charges())
    }

    /// `(cpt code, units, line total)` per procedure line.
    pub fn charge_lines(&self) -> Vec<(String, u32, String)> {
        self.report
            .procedure_codes
            .iter()
            .map(|code| {
                (
                    code.cpt_code.clone(),
                    code.units,
                    format_currency(code.line_total()),
                )
            })
            .collect()
    }
}

/// A patient with the reports filed for them
#[derive(Debug, Clone, PartialEq)]
pub struct PatientDetail {
    pub patient: Patient,
    pub reports: Vec<MedicalReport>,
}

impl PatientDetail {
    /// `Ok(None)` when the patient is not in the loaded collection.
    pub async fn open(store: &DoctorStore, id: &str) -> StoreResult<Option<Self>> {
        let Some(patient) = store.patient(id) else {
            return Ok(None);
        };
        let reports = store.fetch_reports_by_patient(id).await?;
        Ok(Some(Self { patient, reports }))
    }

    pub fn date_of_birth(&self) -> String {
        format_date(self.patient.date_of_birth)
    }

    pub fn age_on(&self, today: NaiveDate) -> String {
        format_age(self.patient.age_on(today))
    }

    pub fn age(&self) -> String {
        self.age_on(Utc::now().date_naive())
    }

    pub fn claim_count(&self) -> usize {
        self.reports.iter().filter(|r| r.is_claim()).count()
    }
}
