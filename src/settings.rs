//! Settings view state.
//!
//! Two local preference toggles, kept in memory only and never
//! persisted. A pure side channel: flipping them has no effect on the
//! active context or any other component.

use std::sync::Mutex;

use serde::Serialize;

/// Current toggle values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsState {
    /// Auto-delete history after 30 days.
    pub privacy_mode: bool,
    /// AI voice feedback.
    pub voice_assistant: bool,
}

impl Default for SettingsState {
    fn default() -> Self {
        Self {
            privacy_mode: true,
            voice_assistant: false,
        }
    }
}

pub struct SettingsPanel {
    state: Mutex<SettingsState>,
}

impl SettingsPanel {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SettingsState::default()),
        }
    }

    pub fn state(&self) -> SettingsState {
        self.state
            .lock()
            .map(|state| state.clone())
            .unwrap_or_default()
    }

    /// Flip privacy mode, returning the new value.
    pub fn toggle_privacy_mode(&self) -> bool {
        match self.state.lock() {
            Ok(mut state) => {
                state.privacy_mode = !state.privacy_mode;
                state.privacy_mode
            }
            Err(_) => SettingsState::default().privacy_mode,
        }
    }

    /// Flip the voice assistant, returning the new value.
    pub fn toggle_voice_assistant(&self) -> bool {
        match self.state.lock() {
            Ok(mut state) => {
                state.voice_assistant = !state.voice_assistant;
                state.voice_assistant
            }
            Err(_) => SettingsState::default().voice_assistant,
        }
    }
}

impl Default for SettingsPanel {
    fn default() -> Self {
        Self::new()
    }
}
