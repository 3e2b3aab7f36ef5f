//! Trait seams for the external collaborators.
//!
//! Four traits define what the session core consumes (request/response
//! shape, not transport detail):
//! - AnalysisService: prescription image in, medicine list out
//! - HistoryService: archived analyses for this session's user
//! - ProfileService: one-shot profile update
//! - AuthService: session status for redirect decisions
//!
//! `http` carries the reqwest-backed implementations; `mock` carries
//! configurable in-memory fakes for the test suites.

pub mod http;
pub mod mock;

use std::sync::Arc;

use async_trait::async_trait;

use crate::models::{AnalysisResult, HistoryEntry, ProfileData};
use crate::session::SessionStatus;

/// Binary image payload handed to the analysis collaborator.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// A failed collaborator call, classified for recovery.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// The collaborator was unreachable or timed out. Recoverable:
    /// the affected component resets to its pre-attempt state.
    #[error("could not reach {service}: {reason}")]
    Transport {
        service: &'static str,
        reason: String,
    },

    /// The collaborator rejected the request. `details`, when supplied,
    /// is a human-readable explanation fit to show verbatim.
    #[error("{service} rejected the request (status {status})")]
    Rejected {
        service: &'static str,
        status: u16,
        details: Option<String>,
    },

    /// The response did not satisfy the wire contract. Rejected at the
    /// boundary; loosely-typed data never propagates inward.
    #[error("malformed {service} payload: {reason}")]
    MalformedPayload {
        service: &'static str,
        reason: String,
    },
}

impl ServiceError {
    /// Message shown to the user: the collaborator's `details` field is
    /// preferred; everything else gets the caller's fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Rejected {
                details: Some(details),
                ..
            } if !details.trim().is_empty() => details.clone(),
            _ => fallback.to_string(),
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Run one prescription image through the analysis backend.
    async fn analyze(&self, image: ImagePayload) -> Result<AnalysisResult, ServiceError>;
}

#[async_trait]
pub trait HistoryService: Send + Sync {
    /// List this user's archived analyses. Session identity is implicit
    /// in the transport (cookies/headers), never passed here.
    async fn list_history(&self) -> Result<Vec<HistoryEntry>, ServiceError>;
}

#[async_trait]
pub trait ProfileService: Send + Sync {
    /// Push the current profile fields to the backend.
    async fn update_profile(&self, data: &ProfileData) -> Result<(), ServiceError>;
}

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve the current session status.
    async fn session_status(&self) -> Result<SessionStatus, ServiceError>;
}

/// Bundle of collaborator handles injected into the controller.
#[derive(Clone)]
pub struct Collaborators {
    pub analysis: Arc<dyn AnalysisService>,
    pub history: Arc<dyn HistoryService>,
    pub profile: Arc<dyn ProfileService>,
    pub auth: Arc<dyn AuthService>,
}

#[cfg(test)]
mod tests {
    use super::*;

    // Verify traits are object-safe (can be used as `dyn Trait`)
    #[test]
    fn traits_are_object_safe() {
        fn _assert_analysis(_: &dyn AnalysisService) {}
        fn _assert_history(_: &dyn HistoryService) {}
        fn _assert_profile(_: &dyn ProfileService) {}
        fn _assert_auth(_: &dyn AuthService) {}
    }

    #[test]
    fn user_message_prefers_collaborator_details() {
        let err = ServiceError::Rejected {
            service: "analysis",
            status: 422,
            details: Some("blurry image".into()),
        };
        assert_eq!(err.user_message("fallback"), "blurry image");
    }

    #[test]
    fn user_message_falls_back_without_details() {
        let rejected = ServiceError::Rejected {
            service: "analysis",
            status: 500,
            details: None,
        };
        assert_eq!(rejected.user_message("fallback"), "fallback");

        let blank = ServiceError::Rejected {
            service: "analysis",
            status: 422,
            details: Some("   ".into()),
        };
        assert_eq!(blank.user_message("fallback"), "fallback");

        let transport = ServiceError::Transport {
            service: "analysis",
            reason: "connection refused".into(),
        };
        assert_eq!(transport.user_message("fallback"), "fallback");
    }

    #[test]
    fn only_transport_is_transient() {
        let transport = ServiceError::Transport {
            service: "history",
            reason: "timeout".into(),
        };
        assert!(transport.is_transient());

        let malformed = ServiceError::MalformedPayload {
            service: "history",
            reason: "missing field".into(),
        };
        assert!(!malformed.is_transient());
    }
}
