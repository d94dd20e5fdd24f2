//! Per-tab navigation session tracking

use chrono::{DateTime, Local};
use std::sync::Arc;
use tracing::{debug, info, warn};
use wayfinder_api::{SessionRecord, StorageKey};
use wayfinder_store::{load_blob, save_blob_logged, KeyValueStore, LoadOutcome};
use wayfinder_util::{elapsed_ms, SessionId};

/// Time spent on a page the session just left
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageExit {
    pub session_id: SessionId,
    pub page: String,
    pub elapsed_ms: u64,
}

/// Session state kept in volatile storage. The record is re-read on every
/// call, so several trackers over the same store agree on the session.
pub struct SessionTracker {
    store: Arc<dyn KeyValueStore>,
}

impl SessionTracker {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Current session, if one has been started
    pub fn current(&self) -> Option<SessionRecord> {
        self.read().ok().flatten()
    }

    /// Current session, starting a fresh one when none exists
    pub fn ensure(&self, now: DateTime<Local>) -> SessionRecord {
        self.resolve(now).0
    }

    /// Id of the current session, starting one when needed
    pub fn session_id(&self, now: DateTime<Local>) -> SessionId {
        self.ensure(now).session_id
    }

    /// Observe a route change. Returns the page that was left and the
    /// time spent there, if a different page was being viewed.
    pub fn on_route_change(&self, page: &str, now: DateTime<Local>) -> Option<PageExit> {
        let (mut session, writable) = self.resolve(now);

        if session.current_page.as_deref() == Some(page) {
            debug!(page, "Route unchanged");
            return None;
        }

        let exit = session.current_page.take().map(|previous| PageExit {
            session_id: session.session_id.clone(),
            page: previous,
            elapsed_ms: elapsed_ms(session.page_start_time, now),
        });

        session.current_page = Some(page.to_string());
        session.page_start_time = now;
        if writable {
            self.persist(&session);
        }

        debug!(
            page,
            left = exit.as_ref().map(|e| e.page.as_str()),
            "Route changed"
        );

        exit
    }

    /// Forget the current session
    pub fn end(&self) {
        if let Err(e) = self.store.remove(StorageKey::NavigationSession.as_str()) {
            warn!(error = %e, "Failed to remove session record");
        }
    }

    /// Stored session. Err when the store could not be read.
    fn read(&self) -> Result<Option<SessionRecord>, ()> {
        match load_blob(self.store.as_ref(), StorageKey::NavigationSession) {
            LoadOutcome::Loaded(session) => Ok(Some(session)),
            LoadOutcome::Missing => Ok(None),
            LoadOutcome::Corrupt { reason } => {
                warn!(reason = %reason, "Session record corrupt, a new session will be started");
                Ok(None)
            }
            LoadOutcome::Unavailable { reason } => {
                warn!(reason = %reason, "Session record unreadable");
                Err(())
            }
        }
    }

    /// Stored session or a new one, and whether the store may be written.
    /// When the store cannot be read the new session is kept off disk.
    fn resolve(&self, now: DateTime<Local>) -> (SessionRecord, bool) {
        match self.read() {
            Ok(Some(session)) => (session, true),
            Ok(None) => {
                let session = SessionRecord::new(now);
                info!(session_id = %session.session_id, "Navigation session started");
                self.persist(&session);
                (session, true)
            }
            Err(()) => {
                let session = SessionRecord::new(now);
                debug!(session_id = %session.session_id, "Using a transient session");
                (session, false)
            }
        }
    }

    fn persist(&self, session: &SessionRecord) {
        save_blob_logged(self.store.as_ref(), StorageKey::NavigationSession, session);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FlakyStore;
    use chrono::{Duration, TimeZone};
    use wayfinder_store::MemoryStore;

    fn t0() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_session_is_stable_within_store() {
        let store = Arc::new(MemoryStore::new());
        let tracker = SessionTracker::new(store.clone());

        assert!(tracker.current().is_none());
        let first = tracker.session_id(t0());
        let second = tracker.session_id(t0() + Duration::minutes(5));
        assert_eq!(first, second);

        let other = SessionTracker::new(store);
        assert_eq!(other.current().unwrap().session_id, first);
    }

    #[test]
    fn test_first_route_change_credits_nothing() {
        let tracker = SessionTracker::new(Arc::new(MemoryStore::new()));

        assert!(tracker.on_route_change("/prompts", t0()).is_none());

        let session = tracker.current().unwrap();
        assert_eq!(session.current_page.as_deref(), Some("/prompts"));
        assert_eq!(session.page_start_time, t0());
    }

    #[test]
    fn test_route_change_reports_elapsed() {
        let tracker = SessionTracker::new(Arc::new(MemoryStore::new()));

        tracker.on_route_change("/prompts", t0());
        let exit = tracker
            .on_route_change("/chat", t0() + Duration::seconds(5))
            .unwrap();

        assert_eq!(exit.page, "/prompts");
        assert_eq!(exit.elapsed_ms, 5_000);
        assert_eq!(tracker.current().unwrap().current_page.as_deref(), Some("/chat"));
    }

    #[test]
    fn test_same_page_is_ignored() {
        let tracker = SessionTracker::new(Arc::new(MemoryStore::new()));

        tracker.on_route_change("/chat", t0());
        assert!(tracker
            .on_route_change("/chat", t0() + Duration::seconds(30))
            .is_none());
        // The page timer keeps running from the first visit
        assert_eq!(tracker.current().unwrap().page_start_time, t0());
    }

    #[test]
    fn test_clock_going_backwards_credits_zero() {
        let tracker = SessionTracker::new(Arc::new(MemoryStore::new()));

        tracker.on_route_change("/prompts", t0());
        let exit = tracker
            .on_route_change("/chat", t0() - Duration::seconds(10))
            .unwrap();
        assert_eq!(exit.elapsed_ms, 0);
    }

    #[test]
    fn test_end_starts_fresh_session() {
        let tracker = SessionTracker::new(Arc::new(MemoryStore::new()));
        let first = tracker.session_id(t0());

        tracker.end();
        assert!(tracker.current().is_none());
        assert_ne!(tracker.session_id(t0()), first);
    }

    #[test]
    fn test_unreadable_store_keeps_stored_session() {
        let store = Arc::new(FlakyStore::default());
        let tracker = SessionTracker::new(store.clone());
        tracker.on_route_change("/prompts", t0());
        let original = tracker.current().unwrap();

        store.set_failing(true);
        assert!(tracker.current().is_none());
        assert!(tracker
            .on_route_change("/chat", t0() + Duration::seconds(5))
            .is_none());

        store.set_failing(false);
        assert_eq!(tracker.current().unwrap(), original);
    }
}
