use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use super::dates;

/// Care status shown in the patient table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CareStatus {
    #[serde(rename = "Active Treatment")]
    ActiveTreatment,
    #[serde(rename = "Follow-up Required")]
    FollowUpRequired,
    #[serde(rename = "Discharged")]
    Discharged,
}

impl CareStatus {
    pub const ALL: [CareStatus; 3] = [
        CareStatus::ActiveTreatment,
        CareStatus::FollowUpRequired,
        CareStatus::Discharged,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CareStatus::ActiveTreatment => "Active Treatment",
            CareStatus::FollowUpRequired => "Follow-up Required",
            CareStatus::Discharged => "Discharged",
        }
    }
}

impl fmt::Display for CareStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CareStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CareStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown care status '{s}'"))
    }
}

/// Administrative progress of a patient, independent of report status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkflowStatus {
    Created,
    ReportSubmitted,
    #[serde(alias = "ReadyForEmployee")]
    ReadyForClaim,
    ClaimSubmitted,
    UnderInsuranceReview,
    Approved,
    Rejected,
}

impl WorkflowStatus {
    pub const ALL: [WorkflowStatus; 7] = [
        WorkflowStatus::Created,
        WorkflowStatus::ReportSubmitted,
        WorkflowStatus::ReadyForClaim,
        WorkflowStatus::ClaimSubmitted,
        WorkflowStatus::UnderInsuranceReview,
        WorkflowStatus::Approved,
        WorkflowStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStatus::Created => "Created",
            WorkflowStatus::ReportSubmitted => "ReportSubmitted",
            WorkflowStatus::ReadyForClaim => "ReadyForClaim",
            WorkflowStatus::ClaimSubmitted => "ClaimSubmitted",
            WorkflowStatus::UnderInsuranceReview => "UnderInsuranceReview",
            WorkflowStatus::Approved => "Approved",
            WorkflowStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("ReadyForEmployee") {
            return Ok(WorkflowStatus::ReadyForClaim);
        }
        WorkflowStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown workflow status '{s}'"))
    }
}

/// Unknown or blank status strings decode as `None` so one odd record does
/// not fail the whole collection.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.parse().ok()))
}

/// Patient record as held by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, with = "dates::optional")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub status: Option<CareStatus>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub patient_workflow_status: Option<WorkflowStatus>,
    #[serde(default)]
    pub visible_to_insurance: bool,
    #[serde(default)]
    pub visible_to_employee: bool,
    /// Assigned by the server once insurance registration completes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance_id: Option<String>,
}

impl Patient {
    /// Minimal record, mostly useful for fixtures.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            gender: None,
            date_of_birth: None,
            age: None,
            email: None,
            phone: None,
            address: None,
            status: None,
            patient_workflow_status: None,
            visible_to_insurance: false,
            visible_to_employee: false,
            insurance_id: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Age as of `today`: the server's value if present, otherwise derived
    /// from the birth date.
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        self.age
            .or_else(|| self.date_of_birth.and_then(|dob| age_on(dob, today)))
    }
}

/// Whole years between `birth` and `today`; `None` for birth dates in the future.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> Option<u32> {
    if birth > today {
        return None;
    }
    let mut years = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}

/// Payload for creating a patient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPatient {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, with = "dates::optional")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub status: CareStatus,
    pub patient_workflow_status: WorkflowStatus,
    pub visible_to_insurance: bool,
    pub visible_to_employee: bool,
}

/// A present-but-null patch field decodes as `Some(None)` rather than `None`.
fn clearable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Partial patient update; absent fields are left untouched by the server.
///
/// The optional demographics are double options: `Some(None)` is sent as
/// `null` and clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub gender: Option<Option<String>>,
    #[serde(
        default,
        with = "dates::clearable",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_of_birth: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub age: Option<Option<u32>>,
    #[serde(default, deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub address: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CareStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_workflow_status: Option<WorkflowStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible_to_insurance: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible_to_employee: Option<bool>,
}

impl PatientUpdate {
    pub fn workflow_status(status: WorkflowStatus) -> Self {
        Self {
            patient_workflow_status: Some(status),
            ..Default::default()
        }
    }

    /// Applies the present fields onto `patient`.
    pub fn apply_to(&self, patient: &mut Patient) {
        if let Some(name) = &self.name {
            patient.name = name.clone();
        }
        if let Some(gender) = &self.gender {
            patient.gender = gender.clone();
        }
        if let Some(dob) = self.date_of_birth {
            patient.date_of_birth = dob;
        }
        if let Some(age) = self.age {
            patient.age = age;
        }
        if let Some(email) = &self.email {
            patient.email = email.clone();
        }
        if let Some(phone) = &self.phone {
            patient.phone = phone.clone();
        }
        if let Some(address) = &self.address {
            patient.address = address.clone();
        }
        if let Some(status) = self.status {
            patient.status = Some(status);
        }
        if let Some(status) = self.patient_workflow_status {
            patient.patient_workflow_status = Some(status);
        }
        if let Some(visible) = self.visible_to_insurance {
            patient.visible_to_insurance = visible;
        }
        if let Some(visible) = self.visible_to_employee {
            patient.visible_to_employee = visible;
        }
    }
}

/// Body of the insurance registration side-call made after a patient is created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceRegistration {
    pub patient_id: Vec<String>,
    pub insurance_provider: String,
}

impl InsuranceRegistration {
    pub fn new(patient_id: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            patient_id: vec![patient_id.into()],
            insurance_provider: provider.into(),
        }
    }
}
