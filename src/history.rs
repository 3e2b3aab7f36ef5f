//! Session-lifetime cache of archived analyses.
//!
//! Populated from the history collaborator once per authenticated
//! session and replayed from memory afterwards; view switches never
//! re-fetch. A failed load keeps whatever the cache already held.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use uuid::Uuid;

use crate::context::ActiveContextStore;
use crate::models::HistoryEntry;
use crate::services::HistoryService;

pub struct HistoryCache {
    service: Arc<dyn HistoryService>,
    context: Arc<ActiveContextStore>,
    entries: RwLock<Vec<HistoryEntry>>,
    /// Set by the first `ensure_loaded`, successful or not. There is no
    /// automatic retry; `refresh` is the explicit affordance.
    load_attempted: AtomicBool,
}

impl HistoryCache {
    pub fn new(service: Arc<dyn HistoryService>, context: Arc<ActiveContextStore>) -> Self {
        Self {
            service,
            context,
            entries: RwLock::new(Vec::new()),
            load_attempted: AtomicBool::new(false),
        }
    }

    /// Load the archive exactly once per session.
    ///
    /// Called on the unauthenticated → authenticated transition; every
    /// later call (view switches included) is a no-op, whether or not
    /// the first attempt succeeded.
    pub async fn ensure_loaded(&self) {
        if self.load_attempted.swap(true, Ordering::SeqCst) {
            return;
        }
        self.fetch_and_replace().await;
    }

    /// Explicit manual re-fetch. Deliberate user action only; does not
    /// loosen the load-once guarantee of `ensure_loaded`.
    pub async fn refresh(&self) {
        self.load_attempted.store(true, Ordering::SeqCst);
        self.fetch_and_replace().await;
    }

    async fn fetch_and_replace(&self) {
        match self.service.list_history().await {
            Ok(mut entries) => {
                // Most recent first, regardless of server ordering.
                entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                let count = entries.len();
                if let Ok(mut cached) = self.entries.write() {
                    *cached = entries;
                }
                tracing::info!(count, "history loaded");
            }
            Err(error) => {
                // Previous cache state stands (empty on a first failure).
                tracing::warn!(error = %error, "history load failed");
            }
        }
    }

    /// Cached entries, most recent first.
    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.entries
            .read()
            .map(|cached| cached.clone())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries
            .read()
            .map(|cached| cached.is_empty())
            .unwrap_or(true)
    }

    pub fn get(&self, id: &Uuid) -> Option<HistoryEntry> {
        self.entries
            .read()
            .ok()
            .and_then(|cached| cached.iter().find(|e| e.id == *id).cloned())
    }

    /// Replay an archived entry into the active context.
    ///
    /// The only path by which history data re-enters the active
    /// context; the controller follows up with the forced transition to
    /// the scan view. Returns the replayed entry, or `None` for an
    /// unknown id.
    pub fn select(&self, id: &Uuid) -> Option<HistoryEntry> {
        let entry = self.get(id)?;
        self.context.set(Some(entry.to_analysis_result()));
        tracing::debug!(id = %id, "history entry replayed into active context");
        Some(entry)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::models::MedicineRecord;
    use crate::services::mock::MockHistoryService;
    use crate::services::ServiceError;

    fn entry(name: &str, minutes_ago: i64) -> HistoryEntry {
        HistoryEntry {
            id: Uuid::new_v4(),
            created_at: Utc::now() - Duration::minutes(minutes_ago),
            medicines: vec![MedicineRecord::named(name)],
        }
    }

    fn cache_with(
        mock: Arc<MockHistoryService>,
    ) -> (HistoryCache, Arc<ActiveContextStore>) {
        let context = Arc::new(ActiveContextStore::new());
        (HistoryCache::new(mock, context.clone()), context)
    }

    #[tokio::test]
    async fn load_happens_exactly_once() {
        let mock = Arc::new(MockHistoryService::returning(vec![entry("A", 5)]));
        let (cache, _) = cache_with(mock.clone());

        cache.ensure_loaded().await;
        cache.ensure_loaded().await;
        cache.ensure_loaded().await;

        assert_eq!(mock.calls(), 1);
        assert_eq!(cache.entries().len(), 1);
    }

    #[tokio::test]
    async fn entries_are_ordered_most_recent_first() {
        let oldest = entry("Oldest", 120);
        let newest = entry("Newest", 1);
        let middle = entry("Middle", 30);
        let mock = Arc::new(MockHistoryService::returning(vec![
            oldest.clone(),
            newest.clone(),
            middle.clone(),
        ]));
        let (cache, _) = cache_with(mock);

        cache.ensure_loaded().await;

        let names: Vec<String> = cache
            .entries()
            .iter()
            .map(|e| e.medicines[0].name.clone())
            .collect();
        assert_eq!(names, vec!["Newest", "Middle", "Oldest"]);
    }

    #[tokio::test]
    async fn failed_load_keeps_previous_state_and_does_not_retry() {
        let mock = Arc::new(MockHistoryService::failing(ServiceError::Transport {
            service: "history service",
            reason: "down".into(),
        }));
        let (cache, _) = cache_with(mock.clone());

        cache.ensure_loaded().await;
        assert!(cache.is_empty());

        // The backend recovers, but ensure_loaded stays spent.
        mock.set_response(Ok(vec![entry("A", 1)]));
        cache.ensure_loaded().await;
        assert!(cache.is_empty());
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn refresh_refetches_without_loosening_load_once() {
        let mock = Arc::new(MockHistoryService::returning(vec![entry("A", 10)]));
        let (cache, _) = cache_with(mock.clone());

        cache.ensure_loaded().await;
        assert_eq!(cache.entries().len(), 1);

        mock.set_response(Ok(vec![entry("A", 10), entry("B", 1)]));
        cache.refresh().await;
        assert_eq!(cache.entries().len(), 2);

        // A following ensure_loaded is still a no-op.
        cache.ensure_loaded().await;
        assert_eq!(mock.calls(), 2);
    }

    #[tokio::test]
    async fn refresh_failure_keeps_cached_entries() {
        let mock = Arc::new(MockHistoryService::returning(vec![entry("A", 10)]));
        let (cache, _) = cache_with(mock.clone());
        cache.ensure_loaded().await;

        mock.set_response(Err(ServiceError::Transport {
            service: "history service",
            reason: "down".into(),
        }));
        cache.refresh().await;

        assert_eq!(cache.entries().len(), 1);
    }

    #[tokio::test]
    async fn select_replays_entry_into_active_context() {
        let ibuprofen = entry("Ibuprofen", 10);
        let mock = Arc::new(MockHistoryService::returning(vec![ibuprofen.clone()]));
        let (cache, context) = cache_with(mock);
        cache.ensure_loaded().await;

        let replayed = cache.select(&ibuprofen.id).unwrap();
        assert_eq!(replayed.id, ibuprofen.id);

        let active = context.get().unwrap();
        assert_eq!(active.medicine_names(), vec!["Ibuprofen"]);
    }

    #[tokio::test]
    async fn select_unknown_id_leaves_context_untouched() {
        let mock = Arc::new(MockHistoryService::returning(vec![entry("A", 1)]));
        let (cache, context) = cache_with(mock);
        cache.ensure_loaded().await;

        assert!(cache.select(&Uuid::new_v4()).is_none());
        assert!(context.get().is_none());
    }
}
