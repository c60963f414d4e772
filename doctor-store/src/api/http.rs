use async_trait::async_trait;
use config_engine::ApiConfig;
use logger_redacted::redacted_warn;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::PracticeApi;
use crate::error::{StoreError, StoreResult};
use crate::models::{
    InsuranceRegistration, MedicalReport, NewPatient, NewReport, Patient, PatientUpdate,
    ReportUpdate,
};

/// REST client for the practice API
pub struct HttpPracticeApi {
    client: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
}

/// Responses come back either bare or wrapped in `{"data": ...}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(value) => value,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl HttpPracticeApi {
    pub fn new(config: &ApiConfig) -> StoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(StoreError::Config("api base URL is empty".into()));
        }

        Ok(Self {
            client,
            base_url,
            auth_token: config.auth_token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get full URL for an endpoint
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self.client.request(method, self.url(path));
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Sends `request`, turning non-success statuses into [`StoreError::Api`].
    async fn execute(&self, request: RequestBuilder) -> StoreResult<reqwest::Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|body| body.message.or(body.error))
            .filter(|message| !message.trim().is_empty());

        redacted_warn!(
            "practice API request failed ({}): {}",
            status.as_u16(),
            message.as_deref().unwrap_or("no message")
        );
        Err(StoreError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> StoreResult<T> {
        let response = self.execute(request).await?;
        let bytes = response.bytes().await?;
        let envelope: Envelope<T> = serde_json::from_slice(&bytes)?;
        Ok(envelope.into_inner())
    }
}

#[async_trait]
impl PracticeApi for HttpPracticeApi {
    async fn get_all_patients(&self) -> StoreResult<Vec<Patient>> {
        self.fetch(self.request(Method::GET, "patients")).await
    }

    async fn add_patient(&self, patient: NewPatient) -> StoreResult<Patient> {
        self.fetch(self.request(Method::POST, "patients").json(&patient))
            .await
    }

    async fn update_patient(&self, id: &str, update: PatientUpdate) -> StoreResult<Patient> {
        self.fetch(
            self.request(Method::PUT, &format!("patients/{id}"))
                .json(&update),
        )
        .await
    }

    async fn delete_patient(&self, id: &str) -> StoreResult<()> {
        self.execute(self.request(Method::DELETE, &format!("patients/{id}")))
            .await?;
        Ok(())
    }

    async fn get_all_reports(&self) -> StoreResult<Vec<MedicalReport>> {
        self.fetch(self.request(Method::GET, "reports")).await
    }

    async fn create_report(&self, report: NewReport) -> StoreResult<MedicalReport> {
        self.fetch(self.request(Method::POST, "reports").json(&report))
            .await
    }

    async fn update_report(&self, id: &str, update: ReportUpdate) -> StoreResult<MedicalReport> {
        self.fetch(
            self.request(Method::PUT, &format!("reports/{id}"))
                .json(&update),
        )
        .await
    }

    async fn delete_report(&self, id: &str) -> StoreResult<()> {
        self.execute(self.request(Method::DELETE, &format!("reports/{id}")))
            .await?;
        Ok(())
    }

    async fn get_report(&self, id: &str) -> StoreResult<Option<MedicalReport>> {
        // Not `Option<MedicalReport>`: a bare record has no `data` key, which
        // would decode as `Wrapped { data: None }`.
        match self
            .fetch::<serde_json::Value>(self.request(Method::GET, &format!("reports/{id}")))
            .await
        {
            Ok(serde_json::Value::Null) => Ok(None),
            Ok(value) => Ok(Some(serde_json::from_value(value)?)),
            Err(StoreError::Api { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn get_reports_by_patient(&self, patient_id: &str) -> StoreResult<Vec<MedicalReport>> {
        self.fetch(self.request(Method::GET, &format!("reports/patient/{patient_id}")))
            .await
    }

    async fn add_insurance(&self, registration: InsuranceRegistration) -> StoreResult<()> {
        self.execute(self.request(Method::POST, "insurance").json(&registration))
            .await?;
        Ok(())
    }
}
