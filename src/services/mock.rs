//! Configurable in-memory collaborators for the test suites.
//!
//! Each mock records how often it was called and lets the test swap the
//! canned response between calls. `MockAnalysisService` can additionally
//! be gated so a test controls exactly when an in-flight analysis
//! completes.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use crate::models::{AnalysisResult, HistoryEntry, ProfileData};
use crate::session::SessionStatus;

use super::{
    AnalysisService, AuthService, HistoryService, ImagePayload, ProfileService, ServiceError,
};

/// Analysis collaborator returning a canned result.
pub struct MockAnalysisService {
    response: Mutex<Result<AnalysisResult, ServiceError>>,
    calls: AtomicUsize,
    gate: Mutex<Option<Arc<Notify>>>,
}

impl MockAnalysisService {
    pub fn returning(result: AnalysisResult) -> Self {
        Self {
            response: Mutex::new(Ok(result)),
            calls: AtomicUsize::new(0),
            gate: Mutex::new(None),
        }
    }

    pub fn failing(error: ServiceError) -> Self {
        Self {
            response: Mutex::new(Err(error)),
            calls: AtomicUsize::new(0),
            gate: Mutex::new(None),
        }
    }

    pub fn set_response(&self, response: Result<AnalysisResult, ServiceError>) {
        *self.response.lock().expect("mock lock poisoned") = response;
    }

    /// Hold every following `analyze` call until the returned handle is
    /// notified. The call is counted before it parks.
    pub fn gate(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.gate.lock().expect("mock lock poisoned") = Some(notify.clone());
        notify
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl AnalysisService for MockAnalysisService {
    async fn analyze(&self, _image: ImagePayload) -> Result<AnalysisResult, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gate.lock().expect("mock lock poisoned").clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.response.lock().expect("mock lock poisoned").clone()
    }
}

/// History collaborator returning a canned entry list.
pub struct MockHistoryService {
    response: Mutex<Result<Vec<HistoryEntry>, ServiceError>>,
    calls: AtomicUsize,
}

impl MockHistoryService {
    pub fn returning(entries: Vec<HistoryEntry>) -> Self {
        Self {
            response: Mutex::new(Ok(entries)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: ServiceError) -> Self {
        Self {
            response: Mutex::new(Err(error)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_response(&self, response: Result<Vec<HistoryEntry>, ServiceError>) {
        *self.response.lock().expect("mock lock poisoned") = response;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl HistoryService for MockHistoryService {
    async fn list_history(&self) -> Result<Vec<HistoryEntry>, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.lock().expect("mock lock poisoned").clone()
    }
}

/// Profile collaborator recording the last submitted payload.
pub struct MockProfileService {
    response: Mutex<Result<(), ServiceError>>,
    last_update: Mutex<Option<ProfileData>>,
    calls: AtomicUsize,
}

impl MockProfileService {
    pub fn succeeding() -> Self {
        Self {
            response: Mutex::new(Ok(())),
            last_update: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: ServiceError) -> Self {
        Self {
            response: Mutex::new(Err(error)),
            last_update: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn last_update(&self) -> Option<ProfileData> {
        self.last_update.lock().expect("mock lock poisoned").clone()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ProfileService for MockProfileService {
    async fn update_profile(&self, data: &ProfileData) -> Result<(), ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_update.lock().expect("mock lock poisoned") = Some(data.clone());
        self.response.lock().expect("mock lock poisoned").clone()
    }
}

/// Auth collaborator returning a canned session status.
pub struct MockAuthService {
    response: Mutex<Result<SessionStatus, ServiceError>>,
}

impl MockAuthService {
    pub fn returning(status: SessionStatus) -> Self {
        Self {
            response: Mutex::new(Ok(status)),
        }
    }

    pub fn failing(error: ServiceError) -> Self {
        Self {
            response: Mutex::new(Err(error)),
        }
    }

    pub fn set_status(&self, status: SessionStatus) {
        *self.response.lock().expect("mock lock poisoned") = Ok(status);
    }
}

#[async_trait::async_trait]
impl AuthService for MockAuthService {
    async fn session_status(&self) -> Result<SessionStatus, ServiceError> {
        self.response.lock().expect("mock lock poisoned").clone()
    }
}
