//! Explicit session state, injected into the view controller.
//!
//! The auth collaborator owns authentication; this module only mirrors
//! its answer as a typed status cell so the controller never reaches for
//! ambient global state.

use std::sync::RwLock;

use serde::{Deserialize, Serialize};

/// Identity fields of the signed-in user, as the auth service reports them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    pub name: String,
    pub email: String,
}

/// Authentication state of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    /// The auth service has not resolved yet.
    Loading,
    /// No session; the controller must redirect to login.
    Unauthenticated,
    /// Established session with the signed-in user's identity.
    Authenticated(SessionIdentity),
}

impl SessionStatus {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn identity(&self) -> Option<&SessionIdentity> {
        match self {
            Self::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }
}

/// Shared session status cell.
///
/// Starts in `Loading`; the shell feeds auth updates in through
/// `set_status`. Reads fall back to `Loading` on a poisoned lock so a
/// panicked writer can never fake an established session.
pub struct SessionContext {
    status: RwLock<SessionStatus>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            status: RwLock::new(SessionStatus::Loading),
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
            .read()
            .map(|guard| guard.clone())
            .unwrap_or(SessionStatus::Loading)
    }

    pub fn is_authenticated(&self) -> bool {
        self.status().is_authenticated()
    }

    pub fn set_status(&self, status: SessionStatus) {
        if let Ok(mut guard) = self.status.write() {
            *guard = status;
        }
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> SessionIdentity {
        SessionIdentity {
            name: "Asha Rahman".into(),
            email: "asha@example.com".into(),
        }
    }

    #[test]
    fn new_context_is_loading() {
        let ctx = SessionContext::new();
        assert_eq!(ctx.status(), SessionStatus::Loading);
        assert!(!ctx.is_authenticated());
    }

    #[test]
    fn set_status_replaces_previous() {
        let ctx = SessionContext::new();
        ctx.set_status(SessionStatus::Unauthenticated);
        assert_eq!(ctx.status(), SessionStatus::Unauthenticated);

        ctx.set_status(SessionStatus::Authenticated(identity()));
        assert!(ctx.is_authenticated());
    }

    #[test]
    fn identity_only_present_when_authenticated() {
        assert!(SessionStatus::Loading.identity().is_none());
        assert!(SessionStatus::Unauthenticated.identity().is_none());

        let status = SessionStatus::Authenticated(identity());
        assert_eq!(status.identity().unwrap().email, "asha@example.com");
    }
}
