use chrono::NaiveDate;
use error_common::ErrorContext;

use super::{acknowledge, optional, Acknowledgment, DialogMode, FormError};
use crate::models::{MedicalReport, NewReport, ProcedureCode, ReportStatus, ReportUpdate};
use crate::store::DoctorStore;

/// Required report fields, in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportField {
    Patient,
    ReportType,
    PrimaryDiagnosis,
}

impl ReportField {
    pub const REQUIRED: [ReportField; 3] = [
        ReportField::Patient,
        ReportField::ReportType,
        ReportField::PrimaryDiagnosis,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ReportField::Patient => "Patient",
            ReportField::ReportType => "Report type",
            ReportField::PrimaryDiagnosis => "Primary diagnosis",
        }
    }
}

/// Data bound to the report create/edit dialog
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportForm {
    pub patient_id: String,
    pub report_type: String,
    pub primary_diagnosis: String,
    pub secondary_diagnosis: String,
    pub treatment: String,
    pub medications: String,
    pub lab_results: String,
    pub recommendations: String,
    pub follow_up_date: Option<NaiveDate>,
    pub service_date_from: Option<NaiveDate>,
    pub service_date_to: Option<NaiveDate>,
    pub procedure_codes: Vec<ProcedureCode>,
    pub referring_provider_name: String,
    pub referring_provider_npi: String,
}

impl ReportForm {
    /// Pre-populates the edit dialog.
    pub fn from_report(report: &MedicalReport) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        Self {
            patient_id: report.patient_id.id().to_string(),
            report_type: text(&report.report_type),
            primary_diagnosis: text(&report.primary_diagnosis),
            secondary_diagnosis: text(&report.secondary_diagnosis),
            treatment: text(&report.treatment),
            medications: text(&report.medications),
            lab_results: text(&report.lab_results),
            recommendations: text(&report.recommendations),
            follow_up_date: report.follow_up_date,
            service_date_from: report.service_date_from,
            service_date_to: report.service_date_to,
            procedure_codes: report.procedure_codes.clone(),
            referring_provider_name: text(&report.referring_provider_name),
            referring_provider_npi: text(&report.referring_provider_npi),
        }
    }

    fn value(&self, field: ReportField) -> &str {
        match field {
            ReportField::Patient => &self.patient_id,
            ReportField::ReportType => &self.report_type,
            ReportField::PrimaryDiagnosis => &self.primary_diagnosis,
        }
    }

    /// Names the first missing required field.
    pub fn validate(&self) -> Result<(), FormError> {
        match ReportField::REQUIRED
            .into_iter()
            .find(|field| self.value(*field).trim().is_empty())
        {
            Some(field) => Err(FormError::MissingField(field)),
            None => Ok(()),
        }
    }

    /// Create payload; new reports always start out `Submitted`.
    pub fn to_new_report(&self) -> Result<NewReport, FormError> {
        self.validate()?;
        Ok(NewReport {
            patient_id: self.patient_id.trim().to_string(),
            report_type: self.report_type.trim().to_string(),
            primary_diagnosis: self.primary_diagnosis.trim().to_string(),
            secondary_diagnosis: optional(&self.secondary_diagnosis),
            treatment: optional(&self.treatment),
            medications: optional(&self.medications),
            lab_results: optional(&self.lab_results),
            recommendations: optional(&self.recommendations),
            follow_up_date: self.follow_up_date,
            service_date_from: self.service_date_from,
            service_date_to: self.service_date_to,
            procedure_codes: self.procedure_codes.clone(),
            referring_provider_name: optional(&self.referring_provider_name),
            referring_provider_npi: optional(&self.referring_provider_npi),
            status: ReportStatus::Submitted,
        })
    }

    pub fn to_update(&self) -> Result<ReportUpdate, FormError> {
        self.validate()?;
        Ok(ReportUpdate {
            patient_id: self.patient_id.trim().to_string(),
            report_type: optional(&self.report_type),
            primary_diagnosis: optional(&self.primary_diagnosis),
            secondary_diagnosis: optional(&self.secondary_diagnosis),
            treatment: optional(&self.treatment),
            medications: optional(&self.medications),
            lab_results: optional(&self.lab_results),
            recommendations: optional(&self.recommendations),
            follow_up_date: self.follow_up_date,
            service_date_from: self.service_date_from,
            service_date_to: self.service_date_to,
            procedure_codes: self.procedure_codes.clone(),
            referring_provider_name: optional(&self.referring_provider_name),
            referring_provider_npi: optional(&self.referring_provider_npi),
        })
    }

    /// Confirms the dialog: one create or update, then the store refetches.
    pub async fn submit(
        &self,
        store: &DoctorStore,
        mode: &DialogMode,
    ) -> Result<Acknowledgment, FormError> {
        let ack = match mode {
            DialogMode::Create => {
                let report = self.to_new_report()?;
                acknowledge(
                    store.create_report(report).await,
                    "create_report",
                    ErrorContext::new().add_context("patient", &self.patient_id),
                    "Report created successfully",
                )
            }
            DialogMode::Edit(id) => {
                let update = self.to_update()?;
                acknowledge(
                    store.update_report(id, update).await,
                    "update_report",
                    ErrorContext::new().with_entity("report", id),
                    "Report updated successfully",
                )
            }
        };
        Ok(ack)
    }
}
