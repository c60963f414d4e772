//! Practice Desk command line
//!
//! Talks to the practice API through the doctor store, the same way the
//! front-end pages do: load, filter, open details, run row actions.
//!
//! Usage:
//!   practice claims --query alice --status "Claim Pending"
//!   practice report r1
//!   practice set-workflow p1 ClaimSubmitted

mod render;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::Colorize;
use config_engine::ConfigLoader;
use doctor_store::{
    forms, CareStatus, ClaimsFilter, ClaimsView, DoctorStore, HttpPracticeApi, PatientDetail,
    PatientsFilter, PatientsView, ReportDetail, ReportStatus, ReportsFilter, ReportsView,
    WorkflowStatus,
};
use error_common::{ErrorContext, ErrorReporter, PracticeError};

#[derive(Parser, Debug)]
#[command(name = "practice")]
#[command(about = "Browse patients, medical reports and claims")]
struct Cli {
    /// Configuration file (TOML or YAML)
    #[arg(long, global = true, env = "PRACTICE_CONFIG")]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List patients
    Patients {
        /// Text to match against name, email and phone
        #[arg(short, long)]
        query: Option<String>,
        /// Care status, e.g. "Active Treatment"
        #[arg(short, long)]
        status: Option<CareStatus>,
    },
    /// List medical reports
    Reports {
        /// Text to match against type, diagnosis and patient
        #[arg(short, long)]
        query: Option<String>,
        /// Report status, e.g. "Draft"
        #[arg(short, long)]
        status: Option<String>,
    },
    /// List claims
    Claims {
        #[arg(short, long)]
        query: Option<String>,
        /// Claim status, e.g. "Claim Pending"
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Show one report
    Report { id: String },
    /// Show one patient and their reports
    Patient { id: String },
    /// Delete a report
    DeleteReport { id: String },
    /// Change a patient's workflow status
    SetWorkflow { id: String, status: WorkflowStatus },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        let message = ErrorReporter::with_context(ErrorContext::new().with_operation("practice"))
            .report("command", &err);
        eprintln!("{} {}", "error:".red().bold(), message);
        if !matches!(err, PracticeError::Api { .. }) {
            eprintln!("{}", err.to_string().dimmed());
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> error_common::Result<()> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_file(path);
    }
    let mut config = loader
        .load()
        .map_err(|e| PracticeError::Config(e.to_string()))?;

    if cli.verbose {
        config.logging.log_level = "debug".to_string();
    }
    logger_redacted::init_logging(&config.logging)
        .map_err(|e| PracticeError::Config(e.to_string()))?;

    tracing::debug!(base_url = %config.api.base_url, "Using practice API");
    let api = HttpPracticeApi::new(&config.api)?;
    let store = DoctorStore::new(Arc::new(api));

    match cli.command {
        Command::Patients { query, status } => {
            store.fetch_patients().await?;
            let mut view = PatientsView::new(&store, PatientsFilter { status });
            if let Some(query) = query {
                view.search(&query);
            }
            render::patients(view.items());
        }
        Command::Reports { query, status } => {
            store.load_all().await?;
            let filter = ReportsFilter {
                status: status.as_deref().map(ReportStatus::from),
            };
            let mut view = ReportsView::new(&store, filter);
            if let Some(query) = query {
                view.search(&query);
            }
            render::reports(view.items(), view.patients());
        }
        Command::Claims { query, status } => {
            store.load_all().await?;
            let status = status.as_deref().map(ReportStatus::from);
            if let Some(status) = status.as_ref().filter(|s| !s.is_claim()) {
                return Err(PracticeError::Validation(format!(
                    "'{status}' is not a claim status"
                )));
            }
            let mut view = ClaimsView::new(&store, ClaimsFilter { status });
            if let Some(query) = query {
                view.search(&query);
            }
            render::reports(view.items(), view.patients());
        }
        Command::Report { id } => {
            store.fetch_patients().await?;
            let detail = ReportDetail::open(&store, &id)
                .await?
                .ok_or_else(|| PracticeError::NotFound(format!("report {id}")))?;
            render::report_detail(&detail);
        }
        Command::Patient { id } => {
            store.fetch_patients().await?;
            let detail = PatientDetail::open(&store, &id)
                .await?
                .ok_or_else(|| PracticeError::NotFound(format!("patient {id}")))?;
            render::patient_detail(&detail);
        }
        Command::DeleteReport { id } => {
            let ack = forms::delete_report(&store, &id).await;
            render::acknowledgment(&ack);
            if !ack.is_success() {
                std::process::exit(1);
            }
        }
        Command::SetWorkflow { id, status } => {
            let patient = store.set_patient_workflow_status(&id, status).await?;
            println!(
                "{} {} is now {}",
                "✓".green(),
                patient.name,
                status.to_string().bold()
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_claims_filters() {
        let cli = Cli::parse_from([
            "practice",
            "claims",
            "--query",
            "alice",
            "--status",
            "Claim Pending",
        ]);
        match cli.command {
            Command::Claims { query, status } => {
                assert_eq!(query.as_deref(), Some("alice"));
                assert_eq!(status.as_deref(), Some("Claim Pending"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parses_typed_statuses() {
        let cli = Cli::parse_from(["practice", "-v", "set-workflow", "p1", "ReadyForEmployee"]);
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Command::SetWorkflow { status: WorkflowStatus::ReadyForClaim, .. }
        ));

        let cli = Cli::parse_from(["practice", "patients", "--status", "discharged"]);
        assert!(matches!(
            cli.command,
            Command::Patients { status: Some(CareStatus::Discharged), .. }
        ));
    }

    #[test]
    fn test_rejects_unknown_workflow_status() {
        assert!(Cli::try_parse_from(["practice", "set-workflow", "p1", "Archived"]).is_err());
    }
}
