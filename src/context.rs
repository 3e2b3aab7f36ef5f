//! The shared active-context cell.
//!
//! At most one analysis result is active at any time. Every writer
//! fully replaces the value (never merges), which is what makes the
//! absence of finer locking safe: an upload success, a history replay
//! and an assistant result all converge here through `set`.

use std::sync::{Mutex, RwLock};

use crate::models::AnalysisResult;

/// Callback invoked with the new value after every `set`.
pub type ContextObserver = Box<dyn Fn(Option<&AnalysisResult>) + Send + Sync>;

/// In-memory cell holding the current analysis result, if any.
///
/// No persistence: a restart loses it. Dependent views subscribe and
/// are notified synchronously inside `set`, after the value has been
/// replaced and the data lock released.
pub struct ActiveContextStore {
    current: RwLock<Option<AnalysisResult>>,
    observers: Mutex<Vec<ContextObserver>>,
}

impl ActiveContextStore {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(None),
            observers: Mutex::new(Vec::new()),
        }
    }

    /// Replace the active context. `None` clears it.
    ///
    /// No validation happens here; callers hand in boundary-validated
    /// results only.
    pub fn set(&self, result: Option<AnalysisResult>) {
        if let Ok(mut current) = self.current.write() {
            *current = result.clone();
        }
        tracing::debug!(
            medicines = result.as_ref().map(|r| r.medicines.len()),
            "active context replaced"
        );

        // Notify outside the data lock so observers may call get().
        if let Ok(observers) = self.observers.lock() {
            for observer in observers.iter() {
                observer(result.as_ref());
            }
        }
    }

    /// Current value, cloned out.
    pub fn get(&self) -> Option<AnalysisResult> {
        self.current
            .read()
            .map(|guard| guard.clone())
            .unwrap_or(None)
    }

    /// Explicit user clear action.
    pub fn clear(&self) {
        self.set(None);
    }

    pub fn has_active(&self) -> bool {
        self.current
            .read()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    /// Register a view callback, fired on every `set`.
    pub fn subscribe(&self, observer: impl Fn(Option<&AnalysisResult>) + Send + Sync + 'static) {
        if let Ok(mut observers) = self.observers.lock() {
            observers.push(Box::new(observer));
        }
    }
}

impl Default for ActiveContextStore {
    fn default() -> Self {
        Self::new()
    }
}
