//! Filtered list views over the store.
//!
//! A view keeps a projection of one store collection. The projection is
//! re-derived with the view's default predicate whenever the store publishes
//! a new collection, and with the text predicate when the user searches.
//! Category predicates always run before the text predicate.

use std::sync::Arc;

use tokio::sync::watch;

use crate::error::StoreResult;
use crate::models::{resolve_patient, CareStatus, MedicalReport, Patient, ReportStatus};
use crate::store::{DoctorStore, StoreState};

/// Which store collection a view projects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Patients,
    Reports,
}

pub trait ViewFilter {
    type Item: Clone;

    const COLLECTION: Collection;

    fn collection(state: &StoreState) -> &Arc<Vec<Self::Item>>;

    /// Category predicate; applied first.
    fn in_category(&self, item: &Self::Item) -> bool;

    /// Text predicate. `needle` is already trimmed and lowercased.
    fn matches_text(&self, item: &Self::Item, needle: &str, patients: &[Patient]) -> bool;
}

/// Case-insensitive substring test; absent fields never match.
pub fn contains_ci(field: Option<&str>, needle: &str) -> bool {
    field.is_some_and(|value| value.to_lowercase().contains(needle))
}

/// A list view bound to the store
pub struct FilteredView<F: ViewFilter> {
    store: DoctorStore,
    rx: watch::Receiver<StoreState>,
    state: StoreState,
    filter: F,
    query: String,
    items: Vec<F::Item>,
}

impl<F: ViewFilter> FilteredView<F> {
    pub fn new(store: &DoctorStore, filter: F) -> Self {
        let mut rx = store.subscribe();
        let state = rx.borrow_and_update().clone();
        let mut view = Self {
            store: store.clone(),
            rx,
            state,
            filter,
            query: String::new(),
            items: Vec::new(),
        };
        view.apply();
        view
    }

    pub fn open(store: &DoctorStore) -> Self
    where
        F: Default,
    {
        Self::new(store, F::default())
    }

    /// Creates the view and refreshes its collection, as a page does on mount.
    pub async fn mount(store: &DoctorStore, filter: F) -> StoreResult<Self> {
        let mut view = Self::new(store, filter);
        view.refresh().await?;
        Ok(view)
    }

    pub fn items(&self) -> &[F::Item] {
        &self.items
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn filter(&self) -> &F {
        &self.filter
    }

    pub fn is_loading(&self) -> bool {
        self.rx.borrow().is_loading()
    }

    /// Patients as of the last sync, for resolving report rows.
    pub fn patients(&self) -> &[Patient] {
        &self.state.patients
    }

    /// Picks up a newly published collection, if any.
    ///
    /// Returns `true` when the collection was replaced; the projection is
    /// then reset to the default predicate and the query cleared.
    pub fn sync(&mut self) -> bool {
        let latest = self.rx.borrow_and_update().clone();
        let replaced = !Arc::ptr_eq(F::collection(&latest), F::collection(&self.state));
        self.state = latest;
        if replaced {
            self.query.clear();
            self.apply();
        }
        replaced
    }

    /// Waits for the store's next publication, then syncs.
    ///
    /// Returns `false` if the publication did not replace this view's
    /// collection (a loading flag change, or the other collection).
    pub async fn changed(&mut self) -> bool {
        if self.rx.changed().await.is_err() {
            return false;
        }
        self.sync()
    }

    pub fn search(&mut self, query: &str) -> &[F::Item] {
        self.sync();
        self.query = query.to_string();
        self.apply();
        &self.items
    }

    /// Swaps the category filter and re-applies the current query.
    pub fn with_filter(&mut self, filter: F) -> &[F::Item] {
        self.filter = filter;
        self.sync();
        self.apply();
        &self.items
    }

    /// Refetches this view's collection through the store.
    pub async fn refresh(&mut self) -> StoreResult<&[F::Item]> {
        match F::COLLECTION {
            Collection::Patients => {
                self.store.fetch_patients().await?;
            }
            Collection::Reports => {
                self.store.fetch_reports().await?;
            }
        }
        self.sync();
        Ok(&self.items)
    }

    fn apply(&mut self) {
        let needle = self.query.trim().to_lowercase();
        let patients = &self.state.patients;
        self.items = F::collection(&self.state)
            .iter()
            .filter(|item| self.filter.in_category(item))
            .filter(|item| needle.is_empty() || self.filter.matches_text(item, &needle, patients))
            .cloned()
            .collect();
    }
}

fn report_matches(report: &MedicalReport, needle: &str, patients: &[Patient]) -> bool {
    if contains_ci(report.report_type.as_deref(), needle)
        || contains_ci(report.primary_diagnosis.as_deref(), needle)
    {
        return true;
    }
    resolve_patient(&report.patient_id, patients).is_some_and(|patient| {
        contains_ci(Some(&patient.name), needle) || contains_ci(patient.email.as_deref(), needle)
    })
}

/// All reports, optionally narrowed to one status
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportsFilter {
    pub status: Option<ReportStatus>,
}

impl ViewFilter for ReportsFilter {
    type Item = MedicalReport;

    const COLLECTION: Collection = Collection::Reports;

    fn collection(state: &StoreState) -> &Arc<Vec<MedicalReport>> {
        &state.reports
    }

    fn in_category(&self, report: &MedicalReport) -> bool {
        self.status.as_ref().map_or(true, |status| &report.status == status)
    }

    fn matches_text(&self, report: &MedicalReport, needle: &str, patients: &[Patient]) -> bool {
        report_matches(report, needle, patients)
    }
}

/// Reports whose status makes them claims, optionally narrowed to one
/// claim status
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClaimsFilter {
    pub status: Option<ReportStatus>,
}

impl ViewFilter for ClaimsFilter {
    type Item = MedicalReport;

    const COLLECTION: Collection = Collection::Reports;

    fn collection(state: &StoreState) -> &Arc<Vec<MedicalReport>> {
        &state.reports
    }

    fn in_category(&self, report: &MedicalReport) -> bool {
        report.is_claim()
            && self.status.as_ref().map_or(true, |status| &report.status == status)
    }

    fn matches_text(&self, report: &MedicalReport, needle: &str, patients: &[Patient]) -> bool {
        report_matches(report, needle, patients)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatientsFilter {
    pub status: Option<CareStatus>,
}

impl ViewFilter for PatientsFilter {
    type Item = Patient;

    const COLLECTION: Collection = Collection::Patients;

    fn collection(state: &StoreState) -> &Arc<Vec<Patient>> {
        &state.patients
    }

    fn in_category(&self, patient: &Patient) -> bool {
        self.status.map_or(true, |status| patient.status == Some(status))
    }

    fn matches_text(&self, patient: &Patient, needle: &str, _patients: &[Patient]) -> bool {
        contains_ci(Some(&patient.name), needle)
            || contains_ci(patient.email.as_deref(), needle)
            || contains_ci(patient.phone.as_deref(), needle)
    }
}

pub type ReportsView = FilteredView<ReportsFilter>;
pub type ClaimsView = FilteredView<ClaimsFilter>;
pub type PatientsView = FilteredView<PatientsFilter>;
