//! Top-level view controller.
//!
//! Owns the view-state machine and wires user actions to the stores:
//! prescription selection and submission, history replay, profile
//! mount/save, context clearing. Consumes an injected session context;
//! while the session is unresolved or unauthenticated it signals a
//! login redirect and suspends collaborator activity.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use uuid::Uuid;

use crate::context::ActiveContextStore;
use crate::history::HistoryCache;
use crate::models::AnalysisResult;
use crate::profile::ProfileEditor;
use crate::services::http::HttpBackend;
use crate::services::{AuthService, Collaborators, ProfileService, ServiceError};
use crate::session::{SessionContext, SessionStatus};
use crate::settings::SettingsPanel;
use crate::upload::{SubmitOutcome, UploadPipeline};

/// Which top-level screen is shown. Exactly one at any time; flat,
/// no back-stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewState {
    Scan,
    History,
    Profile,
    Settings,
}

pub struct ViewController {
    context: Arc<ActiveContextStore>,
    upload: UploadPipeline,
    history: HistoryCache,
    settings: SettingsPanel,
    session: SessionContext,
    profile_service: Arc<dyn ProfileService>,
    auth: Arc<dyn AuthService>,
    view: Mutex<ViewState>,
    /// Recreated from session identity on every profile-view entry;
    /// unsaved edits are draft-only and do not survive a view switch.
    profile_editor: Mutex<Option<Arc<ProfileEditor>>>,
    login_redirect: AtomicBool,
}

impl ViewController {
    pub fn new(collaborators: Collaborators) -> Self {
        let context = Arc::new(ActiveContextStore::new());
        Self {
            upload: UploadPipeline::new(collaborators.analysis, context.clone()),
            history: HistoryCache::new(collaborators.history, context.clone()),
            settings: SettingsPanel::new(),
            session: SessionContext::new(),
            profile_service: collaborators.profile,
            auth: collaborators.auth,
            context,
            view: Mutex::new(ViewState::Scan),
            profile_editor: Mutex::new(None),
            login_redirect: AtomicBool::new(false),
        }
    }

    /// Controller over the HTTP backend at `MEDIBOT_API_URL`.
    pub fn from_env() -> Self {
        Self::new(HttpBackend::from_env().collaborators())
    }

    // ── Component access (for view binding) ─────────────────

    pub fn context(&self) -> &ActiveContextStore {
        &self.context
    }

    pub fn upload(&self) -> &UploadPipeline {
        &self.upload
    }

    pub fn history(&self) -> &HistoryCache {
        &self.history
    }

    pub fn settings(&self) -> &SettingsPanel {
        &self.settings
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    // ── View state machine ──────────────────────────────────

    pub fn view(&self) -> ViewState {
        self.view
            .lock()
            .map(|view| *view)
            .unwrap_or(ViewState::Scan)
    }

    /// Enter a view directly. Every transition is allowed, applied
    /// synchronously, never queued. Entering the profile view
    /// (re)creates the editor from the session identity, dropping any
    /// unsaved draft from a previous visit.
    pub fn select_view(&self, view: ViewState) {
        if let Ok(mut current) = self.view.lock() {
            *current = view;
        }
        if view == ViewState::Profile {
            self.mount_profile_editor();
        }
        tracing::debug!(view = ?view, "view selected");
    }

    fn mount_profile_editor(&self) {
        let editor = self
            .session
            .status()
            .identity()
            .map(|identity| Arc::new(ProfileEditor::new(self.profile_service.clone(), identity.clone())));
        if let Ok(mut slot) = self.profile_editor.lock() {
            *slot = editor;
        }
    }

    // ── Session handling ────────────────────────────────────

    /// Feed an auth status update in.
    ///
    /// Unauthenticated raises the login-redirect signal and suspends
    /// collaborator activity; the authenticated transition clears it
    /// and triggers the once-per-session history load.
    pub async fn apply_session(&self, status: SessionStatus) {
        self.session.set_status(status.clone());
        match status {
            SessionStatus::Loading => {}
            SessionStatus::Unauthenticated => {
                tracing::info!("session unauthenticated, redirecting to login");
                self.login_redirect.store(true, Ordering::SeqCst);
            }
            SessionStatus::Authenticated(identity) => {
                tracing::info!(email = %identity.email, "session established");
                self.login_redirect.store(false, Ordering::SeqCst);
                self.history.ensure_loaded().await;
            }
        }
    }

    /// Ask the auth collaborator for the current status and apply it.
    /// A transport failure keeps the previous status.
    pub async fn refresh_session(&self) -> SessionStatus {
        match self.auth.session_status().await {
            Ok(status) => self.apply_session(status).await,
            Err(error) => {
                tracing::warn!(error = %error, "session status check failed");
            }
        }
        self.session.status()
    }

    /// Whether the shell must hand control to the login collaborator.
    pub fn needs_login_redirect(&self) -> bool {
        self.login_redirect.load(Ordering::SeqCst)
    }

    // ── User actions ────────────────────────────────────────

    /// Stage a prescription photo for analysis. Suspended until the
    /// session is authenticated.
    pub fn select_prescription(&self, file_name: &str, bytes: Vec<u8>) {
        if !self.session.is_authenticated() {
            tracing::debug!("prescription selection ignored: session not established");
            return;
        }
        self.upload.select_file(file_name, bytes);
    }

    /// Submit the staged prescription. Suspended until the session is
    /// authenticated; the pipeline never changes the visible view.
    pub async fn submit_prescription(&self) -> SubmitOutcome {
        if !self.session.is_authenticated() {
            tracing::debug!("prescription submit ignored: session not established");
            return SubmitOutcome::Ignored;
        }
        self.upload.submit().await
    }

    /// Replay an archived analysis and force the scan view, whatever
    /// view was showing. Returns false for an unknown id.
    pub fn select_history_entry(&self, id: &Uuid) -> bool {
        if self.history.select(id).is_none() {
            return false;
        }
        self.select_view(ViewState::Scan);
        true
    }

    /// Explicit user clear of the active context. History, profile and
    /// settings state are untouched.
    pub fn clear_active_context(&self) {
        self.context.clear();
    }

    /// Entry point for a structured result surfaced by the
    /// conversational assistant hosted in the scan view. Same replace
    /// semantics as an upload success.
    pub fn assistant_results_found(&self, result: AnalysisResult) {
        if !self.session.is_authenticated() {
            tracing::debug!("assistant result ignored: session not established");
            return;
        }
        self.context.set(Some(result));
    }

    /// Editor for the currently mounted profile view, if any.
    pub fn profile_editor(&self) -> Option<Arc<ProfileEditor>> {
        self.profile_editor
            .lock()
            .map(|slot| slot.clone())
            .unwrap_or(None)
    }

    /// Submit the profile draft. `None` when the profile view has not
    /// been mounted.
    pub async fn save_profile(&self) -> Option<Result<(), ServiceError>> {
        let editor = self.profile_editor()?;
        Some(editor.save().await)
    }
}
