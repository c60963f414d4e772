// Terminal rendering for store records

use colored::{ColoredString, Colorize};
use doctor_store::format::{format_currency, format_date, EMPTY};
use doctor_store::{
    resolve_patient, Acknowledgment, AcknowledgmentKind, MedicalReport, Patient,
    PatientDetail, ReportDetail, ReportStatus,
};

fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or(EMPTY)
}

fn status_label(status: &ReportStatus) -> ColoredString {
    let label = status.as_str();
    match status {
        ReportStatus::ClaimApproved | ReportStatus::Completed => label.green(),
        ReportStatus::ClaimRejected => label.red(),
        ReportStatus::ClaimPending | ReportStatus::Submitted => label.yellow(),
        _ => label.normal(),
    }
}

pub fn patients(patients: &[Patient]) {
    if patients.is_empty() {
        println!("No patients found.");
        return;
    }
    println!(
        "{:<10} {:<24} {:<28} {:<16} {:<20} {}",
        "ID".bold(),
        "NAME".bold(),
        "EMAIL".bold(),
        "PHONE".bold(),
        "STATUS".bold(),
        "WORKFLOW".bold()
    );
    for patient in patients {
        println!(
            "{:<10} {:<24} {:<28} {:<16} {:<20} {}",
            patient.id,
            patient.name,
            or_dash(patient.email.as_deref()),
            or_dash(patient.phone.as_deref()),
            patient.status.map_or(EMPTY, |s| s.as_str()),
            patient
                .patient_workflow_status
                .map_or(EMPTY, |s| s.as_str()),
        );
    }
    println!("{} patient(s)", patients.len());
}

pub fn reports(reports: &[MedicalReport], patients: &[Patient]) {
    if reports.is_empty() {
        println!("No reports found.");
        return;
    }
    println!(
        "{:<10} {:<20} {:<16} {:<28} {:<12} {}",
        "ID".bold(),
        "PATIENT".bold(),
        "TYPE".bold(),
        "DIAGNOSIS".bold(),
        "CHARGES".bold(),
        "STATUS".bold()
    );
    for report in reports {
        let patient = resolve_patient(&report.patient_id, patients)
            .map(|p| p.name.as_str())
            .unwrap_or(EMPTY);
        println!(
            "{:<10} {:<20} {:<16} {:<28} {:<12} {}",
            report.id,
            patient,
            or_dash(report.report_type.as_deref()),
            or_dash(report.primary_diagnosis.as_deref()),
            format_currency(report.total_charges()),
            status_label(&report.status),
        );
    }
    println!("{} report(s)", reports.len());
}

pub fn report_detail(detail: &ReportDetail) {
    let report = &detail.report;
    println!("{} {}", "Report".bold(), report.id);
    println!("  Patient:            {}", detail.patient_name());
    println!("  Type:               {}", or_dash(report.report_type.as_deref()));
    println!("  Status:             {}", status_label(&report.status));
    println!("  Primary diagnosis:  {}", or_dash(report.primary_diagnosis.as_deref()));
    println!("  Secondary:          {}", or_dash(report.secondary_diagnosis.as_deref()));
    println!("  Treatment:          {}", or_dash(report.treatment.as_deref()));
    println!("  Medications:        {}", or_dash(report.medications.as_deref()));
    println!("  Lab results:        {}", or_dash(report.lab_results.as_deref()));
    println!("  Recommendations:    {}", or_dash(report.recommendations.as_deref()));
    println!("  Service period:     {}", detail.service_period());
    println!("  Follow-up:          {}", detail.follow_up());
    println!(
        "  Referring provider: {} (NPI {})",
        or_dash(report.referring_provider_name.as_deref()),
        or_dash(report.referring_provider_npi.as_deref())
    );
    println!("  Created:            {}", detail.created());

    let lines = detail.charge_lines();
    if !lines.is_empty() {
        println!("  Procedures:");
        for (code, units, total) in lines {
            println!("    {code:<8} x{units:<3} {total:>12}");
        }
    }
    println!("  Total charges:      {}", detail.total_charges().bold());
}

pub fn patient_detail(detail: &PatientDetail) {
    let patient = &detail.patient;
    println!("{} {}", "Patient".bold(), patient.id);
    println!("  Name:           {}", patient.name);
    println!("  Gender:         {}", or_dash(patient.gender.as_deref()));
    println!("  Date of birth:  {}", detail.date_of_birth());
    println!("  Age:            {}", detail.age());
    println!("  Email:          {}", or_dash(patient.email.as_deref()));
    println!("  Phone:          {}", or_dash(patient.phone.as_deref()));
    println!("  Address:        {}", or_dash(patient.address.as_deref()));
    println!(
        "  Care status:    {}",
        patient.status.map_or(EMPTY, |s| s.as_str())
    );
    println!(
        "  Workflow:       {}",
        patient.patient_workflow_status.map_or(EMPTY, |s| s.as_str())
    );
    println!("  Insurance id:   {}", or_dash(patient.insurance_id.as_deref()));
    println!(
        "  Reports:        {} ({} claim(s))",
        detail.reports.len(),
        detail.claim_count()
    );
    for report in &detail.reports {
        println!(
            "    {:<10} {:<16} {:<14} {}",
            report.id,
            or_dash(report.report_type.as_deref()),
            format_date(report.created_at.map(|at| at.date_naive())),
            status_label(&report.status)
        );
    }
}

pub fn acknowledgment(ack: &Acknowledgment) {
    let title = match ack.kind {
        AcknowledgmentKind::Success => ack.title.green().bold(),
        AcknowledgmentKind::Warning => ack.title.yellow().bold(),
        AcknowledgmentKind::Error => ack.title.red().bold(),
    };
    println!("{title}: {}", ack.message);
}
