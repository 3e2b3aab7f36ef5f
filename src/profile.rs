//! Profile editor backing the profile view.
//!
//! Holds a local draft of the patient profile, created fresh from the
//! session identity each time the view is entered. Edits are draft-only
//! until `save` pushes them to the profile collaborator; switching views
//! discards unsaved edits.

use std::sync::{Arc, Mutex};

use crate::models::ProfileData;
use crate::services::{ProfileService, ServiceError};
use crate::session::SessionIdentity;

pub struct ProfileEditor {
    service: Arc<dyn ProfileService>,
    identity: SessionIdentity,
    draft: Mutex<ProfileData>,
}

impl ProfileEditor {
    /// Fresh editor for the signed-in user, with an empty form.
    pub fn new(service: Arc<dyn ProfileService>, identity: SessionIdentity) -> Self {
        Self {
            service,
            identity,
            draft: Mutex::new(ProfileData::default()),
        }
    }

    /// Whose profile this is (shown in the view header).
    pub fn identity(&self) -> &SessionIdentity {
        &self.identity
    }

    pub fn draft(&self) -> ProfileData {
        self.draft
            .lock()
            .map(|draft| draft.clone())
            .unwrap_or_default()
    }

    /// Field edits, no validation: empty strings are permitted and the
    /// age stays free text exactly as typed.
    pub fn set_age(&self, age: &str) {
        if let Ok(mut draft) = self.draft.lock() {
            draft.age = age.to_string();
        }
    }

    pub fn set_medical_history(&self, text: &str) {
        if let Ok(mut draft) = self.draft.lock() {
            draft.medical_history = text.to_string();
        }
    }

    /// Submit the current draft as one update request.
    ///
    /// Success or failure is reported to the caller and nothing else:
    /// no other component's state changes either way, and a failed save
    /// leaves the draft intact for another attempt.
    pub async fn save(&self) -> Result<(), ServiceError> {
        let data = self.draft();
        match self.service.update_profile(&data).await {
            Ok(()) => {
                tracing::info!("profile synced");
                Ok(())
            }
            Err(error) => {
                tracing::warn!(error = %error, "profile sync failed");
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::mock::MockProfileService;

    fn identity() -> SessionIdentity {
        SessionIdentity {
            name: "Asha Rahman".into(),
            email: "asha@example.com".into(),
        }
    }

    #[test]
    fn new_editor_has_empty_draft() {
        let editor = ProfileEditor::new(Arc::new(MockProfileService::succeeding()), identity());
        assert_eq!(editor.draft(), ProfileData::default());
        assert_eq!(editor.identity().name, "Asha Rahman");
    }

    #[test]
    fn field_edits_apply_individually() {
        let editor = ProfileEditor::new(Arc::new(MockProfileService::succeeding()), identity());

        editor.set_age("42");
        assert_eq!(editor.draft().age, "42");
        assert!(editor.draft().medical_history.is_empty());

        editor.set_medical_history("Penicillin allergy");
        assert_eq!(editor.draft().medical_history, "Penicillin allergy");

        // Empty strings are allowed, not rejected.
        editor.set_age("");
        assert!(editor.draft().age.is_empty());
    }

    #[tokio::test]
    async fn save_submits_current_draft() {
        let service = Arc::new(MockProfileService::succeeding());
        let editor = ProfileEditor::new(service.clone(), identity());

        editor.set_age("42");
        editor.set_medical_history("Type 2 Diabetes");
        editor.save().await.unwrap();

        let sent = service.last_update().unwrap();
        assert_eq!(sent.age, "42");
        assert_eq!(sent.medical_history, "Type 2 Diabetes");
    }

    #[tokio::test]
    async fn failed_save_reports_error_and_keeps_draft() {
        let service = Arc::new(MockProfileService::failing(ServiceError::Transport {
            service: "profile service",
            reason: "timeout".into(),
        }));
        let editor = ProfileEditor::new(service, identity());

        editor.set_age("42");
        let result = editor.save().await;
        assert!(result.unwrap_err().is_transient());

        // Draft survives for another attempt.
        assert_eq!(editor.draft().age, "42");
    }
}
