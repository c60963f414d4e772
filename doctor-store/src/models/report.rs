use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::dates;
use super::patient::Patient;

/// Report status. A subset of values doubles as claim status.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReportStatus {
    Draft,
    #[default]
    Submitted,
    Reviewed,
    Completed,
    ClaimPending,
    ClaimApproved,
    ClaimRejected,
    /// Any value the server sends that we do not know about
    Other(String),
}

impl ReportStatus {
    /// Statuses under which a report appears in the claims view.
    pub const CLAIM_STATUSES: [ReportStatus; 4] = [
        ReportStatus::Submitted,
        ReportStatus::ClaimPending,
        ReportStatus::ClaimApproved,
        ReportStatus::ClaimRejected,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            ReportStatus::Draft => "Draft",
            ReportStatus::Submitted => "Submitted",
            ReportStatus::Reviewed => "Reviewed",
            ReportStatus::Completed => "Completed",
            ReportStatus::ClaimPending => "Claim Pending",
            ReportStatus::ClaimApproved => "Claim Approved",
            ReportStatus::ClaimRejected => "Claim Rejected",
            ReportStatus::Other(value) => value,
        }
    }

    pub fn is_claim(&self) -> bool {
        Self::CLAIM_STATUSES.contains(self)
    }
}

impl From<String> for ReportStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Draft" => ReportStatus::Draft,
            "Submitted" => ReportStatus::Submitted,
            "Reviewed" => ReportStatus::Reviewed,
            "Completed" => ReportStatus::Completed,
            "Claim Pending" => ReportStatus::ClaimPending,
            "Claim Approved" => ReportStatus::ClaimApproved,
            "Claim Rejected" => ReportStatus::ClaimRejected,
            _ => ReportStatus::Other(value),
        }
    }
}

impl From<&str> for ReportStatus {
    fn from(value: &str) -> Self {
        ReportStatus::from(value.to_string())
    }
}

impl From<ReportStatus> for String {
    fn from(status: ReportStatus) -> Self {
        match status {
            ReportStatus::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The patient a report belongs to, as the API sends it: either a bare id
/// or the whole patient record embedded in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatientRef {
    ById(String),
    Embedded(Box<Patient>),
}

impl PatientRef {
    pub fn id(&self) -> &str {
        match self {
            PatientRef::ById(id) => id,
            PatientRef::Embedded(patient) => &patient.id,
        }
    }

    pub fn embedded(&self) -> Option<&Patient> {
        match self {
            PatientRef::Embedded(patient) => Some(patient),
            PatientRef::ById(_) => None,
        }
    }
}

impl From<&str> for PatientRef {
    fn from(id: &str) -> Self {
        PatientRef::ById(id.to_string())
    }
}

/// Resolves a report's patient reference against the loaded patients.
///
/// Embedded records resolve to themselves; bare ids are looked up linearly
/// by id equality.
pub fn resolve_patient<'a>(reference: &'a PatientRef, patients: &'a [Patient]) -> Option<&'a Patient> {
    match reference {
        PatientRef::Embedded(patient) => Some(patient),
        PatientRef::ById(id) => patients.iter().find(|p| &p.id == id),
    }
}

fn one() -> u32 {
    1
}

/// Billing line item on a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcedureCode {
    pub cpt_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnosis_pointer: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub charges: Decimal,
    #[serde(default = "one")]
    pub units: u32,
}

impl ProcedureCode {
    pub fn line_total(&self) -> Decimal {
        self.charges * Decimal::from(self.units)
    }
}

/// Medical report; also the record behind a claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalReport {
    #[serde(alias = "_id")]
    pub id: String,
    pub patient_id: PatientRef,
    #[serde(default, rename = "reportType", alias = "type")]
    pub report_type: Option<String>,
    #[serde(default)]
    pub primary_diagnosis: Option<String>,
    #[serde(default)]
    pub secondary_diagnosis: Option<String>,
    #[serde(default)]
    pub treatment: Option<String>,
    #[serde(default)]
    pub medications: Option<String>,
    #[serde(default)]
    pub lab_results: Option<String>,
    #[serde(default)]
    pub recommendations: Option<String>,
    #[serde(default, with = "dates::optional")]
    pub follow_up_date: Option<NaiveDate>,
    #[serde(default, with = "dates::optional")]
    pub service_date_from: Option<NaiveDate>,
    #[serde(default, with = "dates::optional")]
    pub service_date_to: Option<NaiveDate>,
    #[serde(default)]
    pub procedure_codes: Vec<ProcedureCode>,
    #[serde(default)]
    pub referring_provider_name: Option<String>,
    #[serde(default)]
    pub referring_provider_npi: Option<String>,
    #[serde(default)]
    pub status: ReportStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl MedicalReport {
    /// Minimal record, mostly useful for fixtures.
    pub fn new(id: impl Into<String>, patient: impl Into<PatientRef>, report_type: &str) -> Self {
        Self {
            id: id.into(),
            patient_id: patient.into(),
            report_type: Some(report_type.to_string()),
            primary_diagnosis: None,
            secondary_diagnosis: None,
            treatment: None,
            medications: None,
            lab_results: None,
            recommendations: None,
            follow_up_date: None,
            service_date_from: None,
            service_date_to: None,
            procedure_codes: Vec::new(),
            referring_provider_name: None,
            referring_provider_npi: None,
            status: ReportStatus::Submitted,
            created_at: None,
        }
    }

    pub fn with_status(mut self, status: impl Into<ReportStatus>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_diagnosis(mut self, diagnosis: impl Into<String>) -> Self {
        self.primary_diagnosis = Some(diagnosis.into());
        self
    }

    pub fn total_charges(&self) -> Decimal {
        self.procedure_codes.iter().map(ProcedureCode::line_total).sum()
    }

    pub fn is_claim(&self) -> bool {
        self.status.is_claim()
    }
}

/// Payload for creating a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReport {
    pub patient_id: String,
    pub report_type: String,
    pub primary_diagnosis: String,
    pub secondary_diagnosis: Option<String>,
    pub treatment: Option<String>,
    pub medications: Option<String>,
    pub lab_results: Option<String>,
    pub recommendations: Option<String>,
    #[serde(default, with = "dates::optional")]
    pub follow_up_date: Option<NaiveDate>,
    #[serde(default, with = "dates::optional")]
    pub service_date_from: Option<NaiveDate>,
    #[serde(default, with = "dates::optional")]
    pub service_date_to: Option<NaiveDate>,
    pub procedure_codes: Vec<ProcedureCode>,
    pub referring_provider_name: Option<String>,
    pub referring_provider_npi: Option<String>,
    pub status: ReportStatus,
}

/// Payload sent by the edit dialog. Carries every editable field; `status`
/// is deliberately absent so an edit never moves a claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportUpdate {
    pub patient_id: String,
    pub report_type: Option<String>,
    pub primary_diagnosis: Option<String>,
    pub secondary_diagnosis: Option<String>,
    pub treatment: Option<String>,
    pub medications: Option<String>,
    pub lab_results: Option<String>,
    pub recommendations: Option<String>,
    #[serde(default, with = "dates::optional")]
    pub follow_up_date: Option<NaiveDate>,
    #[serde(default, with = "dates::optional")]
    pub service_date_from: Option<NaiveDate>,
    #[serde(default, with = "dates::optional")]
    pub service_date_to: Option<NaiveDate>,
    pub procedure_codes: Vec<ProcedureCode>,
    pub referring_provider_name: Option<String>,
    pub referring_provider_npi: Option<String>,
}

impl From<&MedicalReport> for ReportUpdate {
    fn from(report: &MedicalReport) -> Self {
        Self {
            patient_id: report.patient_id.id().to_string(),
            report_type: report.report_type.clone(),
            primary_diagnosis: report.primary_diagnosis.clone(),
            secondary_diagnosis: report.secondary_diagnosis.clone(),
            treatment: report.treatment.clone(),
            medications: report.medications.clone(),
            lab_results: report.lab_results.clone(),
            recommendations: report.recommendations.clone(),
            follow_up_date: report.follow_up_date,
            service_date_from: report.service_date_from,
            service_date_to: report.service_date_to,
            procedure_codes: report.procedure_codes.clone(),
            referring_provider_name: report.referring_provider_name.clone(),
            referring_provider_npi: report.referring_provider_npi.clone(),
        }
    }
}

impl ReportUpdate {
    /// Overwrites every editable field of `report`; status is kept.
    pub fn apply_to(&self, report: &mut MedicalReport) {
        if report.patient_id.id() != self.patient_id {
            report.patient_id = PatientRef::ById(self.patient_id.clone());
        }
        report.report_type = self.report_type.clone();
        report.primary_diagnosis = self.primary_diagnosis.clone();
        report.secondary_diagnosis = self.secondary_diagnosis.clone();
        report.treatment = self.treatment.clone();
        report.medications = self.medications.clone();
        report.lab_results = self.lab_results.clone();
        report.recommendations = self.recommendations.clone();
        report.follow_up_date = self.follow_up_date;
        report.service_date_from = self.service_date_from;
        report.service_date_to = self.service_date_to;
        report.procedure_codes = self.procedure_codes.clone();
        report.referring_provider_name = self.referring_provider_name.clone();
        report.referring_provider_npi = self.referring_provider_npi.clone();
    }
}
