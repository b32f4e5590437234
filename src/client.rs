//! Typed HTTP client for the clinic API.
//!
//! Client-side session data (auth token, signed-in user, selected
//! practice) lives in an explicit `ClientSession` handed to
//! `ApiClient::new`, never in ambient global storage.

use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::api::{ApiResponse, MessageBody};
use crate::models::{
    Appointment, AppointmentDetail, AppointmentPatch, MedicalHistory, NewAppointment,
    NewMedicalHistory, NewPatient, NewPatientFile, Patient, PatientFile, PatientFilePatch,
};

/// Header carrying the selected practice, when one is set.
pub const PRACTICE_HEADER: &str = "X-Practice-Id";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            ClientError::InvalidBaseUrl(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND.as_u16())
    }
}

/// Signed-in user as the client knows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub role: String,
}

/// Everything a client needs to talk to one server on behalf of one user.
#[derive(Debug, Clone)]
pub struct ClientSession {
    base_url: Url,
    token: Option<String>,
    user: Option<SessionUser>,
    practice_id: Option<String>,
}

impl ClientSession {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ClientError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self {
            base_url,
            token: None,
            user: None,
            practice_id: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_user(mut self, user: SessionUser) -> Self {
        self.user = Some(user);
        self
    }

    pub fn with_practice(mut self, practice_id: impl Into<String>) -> Self {
        self.practice_id = Some(practice_id.into());
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    pub fn practice_id(&self) -> Option<&str> {
        self.practice_id.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Drop credentials and user, keeping the server address.
    pub fn sign_out(&mut self) {
        self.token = None;
        self.user = None;
        self.practice_id = None;
    }

    /// URL for `segments` under the base path. Each segment is
    /// percent-encoded, so ids containing `/` stay one segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[derive(Deserialize)]
struct RemoteError {
    error: RemoteErrorDetail,
}

#[derive(Deserialize)]
struct RemoteErrorDetail {
    code: String,
    message: String,
}

pub struct ApiClient {
    http: reqwest::Client,
    session: ClientSession,
}

impl ApiClient {
    pub fn new(session: ClientSession) -> Self {
        Self {
            http: reqwest::Client::new(),
            session,
        }
    }

    pub fn session(&self) -> &ClientSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut ClientSession {
        &mut self.session
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let mut builder = self.http.request(method, self.session.endpoint(segments));
        if let Some(token) = self.session.token() {
            builder = builder.bearer_auth(token);
        }
        if let Some(practice) = self.session.practice_id() {
            builder = builder.header(PRACTICE_HEADER, practice);
        }
        builder
    }

    async fn send<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ClientError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            let envelope: ApiResponse<T> = response.json().await?;
            return Ok(envelope.data);
        }

        let bytes = response.bytes().await?;
        let (code, message) = match serde_json::from_slice::<RemoteError>(&bytes) {
            Ok(remote) => (remote.error.code, remote.error.message),
            Err(_) => (
                "UNKNOWN".to_string(),
                String::from_utf8_lossy(&bytes).into_owned(),
            ),
        };
        Err(ClientError::Api {
            status: status.as_u16(),
            code,
            message,
        })
    }

    // ── Patients ────────────────────────────────────────────

    pub async fn create_patient(&self, patient: &NewPatient) -> Result<Patient, ClientError> {
        Self::send(self.request(Method::POST, &["patients"]).json(patient)).await
    }

    pub async fn list_patients(&self, search: Option<&str>) -> Result<Vec<Patient>, ClientError> {
        let mut builder = self.request(Method::GET, &["patients"]);
        if let Some(term) = search {
            builder = builder.query(&[("search", term)]);
        }
        Self::send(builder).await
    }

    pub async fn get_patient(&self, id_number: &str) -> Result<Patient, ClientError> {
        Self::send(self.request(Method::GET, &["patients", id_number])).await
    }

    pub async fn delete_patient(&self, id_number: &str) -> Result<MessageBody, ClientError> {
        Self::send(self.request(Method::DELETE, &["patients", id_number])).await
    }

    // ── Appointments ────────────────────────────────────────

    pub async fn create_appointment(
        &self,
        appointment: &NewAppointment,
    ) -> Result<Appointment, ClientError> {
        Self::send(self.request(Method::POST, &["appointments"]).json(appointment)).await
    }

    pub async fn list_appointments(&self) -> Result<Vec<AppointmentDetail>, ClientError> {
        Self::send(self.request(Method::GET, &["appointments"])).await
    }

    pub async fn get_appointment(&self, id: &str) -> Result<AppointmentDetail, ClientError> {
        Self::send(self.request(Method::GET, &["appointments", id])).await
    }

    pub async fn update_appointment(
        &self,
        id: &str,
        patch: &AppointmentPatch,
    ) -> Result<AppointmentDetail, ClientError> {
        Self::send(self.request(Method::PUT, &["appointments", id]).json(patch)).await
    }

    pub async fn delete_appointment(&self, id: &str) -> Result<MessageBody, ClientError> {
        Self::send(self.request(Method::DELETE, &["appointments", id])).await
    }

    // ── Patient files ───────────────────────────────────────

    pub async fn create_patient_file(
        &self,
        file: &NewPatientFile,
    ) -> Result<PatientFile, ClientError> {
        Self::send(self.request(Method::POST, &["patient-files"]).json(file)).await
    }

    pub async fn list_patient_files(&self) -> Result<Vec<PatientFile>, ClientError> {
        Self::send(self.request(Method::GET, &["patient-files"])).await
    }

    pub async fn get_patient_file(&self, patient_id: &str) -> Result<PatientFile, ClientError> {
        Self::send(self.request(Method::GET, &["patient-files", patient_id])).await
    }

    pub async fn update_patient_file(
        &self,
        patient_id: &str,
        patch: &PatientFilePatch,
    ) -> Result<PatientFile, ClientError> {
        Self::send(self.request(Method::PUT, &["patient-files", patient_id]).json(patch)).await
    }

    pub async fn delete_patient_file(&self, patient_id: &str) -> Result<MessageBody, ClientError> {
        Self::send(self.request(Method::DELETE, &["patient-files", patient_id])).await
    }

    // ── Medical history ─────────────────────────────────────

    pub async fn add_medical_history(
        &self,
        id_number: &str,
        entry: &NewMedicalHistory,
    ) -> Result<MedicalHistory, ClientError> {
        Self::send(
            self.request(Method::POST, &["patients", id_number, "medical-history"])
                .json(entry),
        )
        .await
    }

    pub async fn list_medical_history(
        &self,
        id_number: &str,
    ) -> Result<Vec<MedicalHistory>, ClientError> {
        Self::send(self.request(Method::GET, &["patients", id_number, "medical-history"])).await
    }
}
