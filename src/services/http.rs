//! Reqwest-backed collaborator implementations.
//!
//! All four collaborators live on the same backend origin, so one
//! `HttpBackend` implements every service trait. Responses are decoded
//! into the typed models and validated before they leave this module.

use std::sync::Arc;

use serde::Deserialize;

use crate::config;
use crate::models::{AnalysisResult, HistoryEntry, ProfileData};
use crate::session::{SessionIdentity, SessionStatus};

use super::{
    AnalysisService, AuthService, Collaborators, HistoryService, ImagePayload, ProfileService,
    ServiceError,
};

const ANALYSIS: &str = "analysis service";
const HISTORY: &str = "history service";
const PROFILE: &str = "profile service";
const AUTH: &str = "auth service";

/// HTTP client for the MediBot backend collaborators.
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl HttpBackend {
    /// Create a backend client for the given origin.
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        }
    }

    /// Backend at `MEDIBOT_API_URL` (or the localhost default).
    pub fn from_env() -> Self {
        Self::new(&config::api_base_url(), config::DEFAULT_REQUEST_TIMEOUT_SECS)
    }

    /// Hand out one shared instance as all four collaborator seams.
    pub fn collaborators(self) -> Collaborators {
        let backend = Arc::new(self);
        Collaborators {
            analysis: backend.clone(),
            history: backend.clone(),
            profile: backend.clone(),
            auth: backend,
        }
    }

    fn transport_error(&self, service: &'static str, e: reqwest::Error) -> ServiceError {
        let reason = if e.is_connect() {
            format!("connection failed to {}", self.base_url)
        } else if e.is_timeout() {
            format!("request timed out after {}s", self.timeout_secs)
        } else {
            e.to_string()
        };
        ServiceError::Transport { service, reason }
    }

    /// Turn a non-success response into `Rejected`, lifting the
    /// collaborator's optional `details` field out of the body.
    async fn rejection(service: &'static str, response: reqwest::Response) -> ServiceError {
        let status = response.status().as_u16();
        let details = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.details);
        ServiceError::Rejected {
            service,
            status,
            details,
        }
    }
}

/// Error body shape shared by the backend routes.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    details: Option<String>,
}

/// Response body from GET /api/history. An omitted or empty `history`
/// field is treated as no data, not an error.
#[derive(Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    history: Vec<HistoryEntry>,
}

/// Response body from GET /api/auth/session. The presence of `user`
/// decides authenticated vs not; `loading` is purely client-side.
#[derive(Deserialize)]
struct SessionResponse {
    #[serde(default)]
    user: Option<SessionIdentity>,
}

#[async_trait::async_trait]
impl AnalysisService for HttpBackend {
    async fn analyze(&self, image: ImagePayload) -> Result<AnalysisResult, ServiceError> {
        let url = format!("{}/api/process-prescription", self.base_url);
        let part = reqwest::multipart::Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(&image.content_type)
            .map_err(|e| ServiceError::MalformedPayload {
                service: ANALYSIS,
                reason: format!("invalid content type: {e}"),
            })?;
        let form = reqwest::multipart::Form::new().part("image", part);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.transport_error(ANALYSIS, e))?;

        if !response.status().is_success() {
            return Err(Self::rejection(ANALYSIS, response).await);
        }

        let result: AnalysisResult =
            response
                .json()
                .await
                .map_err(|e| ServiceError::MalformedPayload {
                    service: ANALYSIS,
                    reason: e.to_string(),
                })?;

        result.validate().map_err(|e| ServiceError::MalformedPayload {
            service: ANALYSIS,
            reason: e.to_string(),
        })?;

        Ok(result)
    }
}

#[async_trait::async_trait]
impl HistoryService for HttpBackend {
    async fn list_history(&self) -> Result<Vec<HistoryEntry>, ServiceError> {
        let url = format!("{}/api/history", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(HISTORY, e))?;

        if !response.status().is_success() {
            return Err(Self::rejection(HISTORY, response).await);
        }

        let parsed: HistoryResponse =
            response
                .json()
                .await
                .map_err(|e| ServiceError::MalformedPayload {
                    service: HISTORY,
                    reason: e.to_string(),
                })?;

        for entry in &parsed.history {
            entry.validate().map_err(|e| ServiceError::MalformedPayload {
                service: HISTORY,
                reason: format!("entry {}: {e}", entry.id),
            })?;
        }

        Ok(parsed.history)
    }
}

#[async_trait::async_trait]
impl ProfileService for HttpBackend {
    async fn update_profile(&self, data: &ProfileData) -> Result<(), ServiceError> {
        let url = format!("{}/api/user/profile", self.base_url);

        let response = self
            .client
            .put(&url)
            .json(data)
            .send()
            .await
            .map_err(|e| self.transport_error(PROFILE, e))?;

        if !response.status().is_success() {
            return Err(Self::rejection(PROFILE, response).await);
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl AuthService for HttpBackend {
    async fn session_status(&self) -> Result<SessionStatus, ServiceError> {
        let url = format!("{}/api/auth/session", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(AUTH, e))?;

        if !response.status().is_success() {
            return Err(Self::rejection(AUTH, response).await);
        }

        let parsed: SessionResponse =
            response
                .json()
                .await
                .map_err(|e| ServiceError::MalformedPayload {
                    service: AUTH,
                    reason: e.to_string(),
                })?;

        Ok(match parsed.user {
            Some(identity) => SessionStatus::Authenticated(identity),
            None => SessionStatus::Unauthenticated,
        })
    }
}
