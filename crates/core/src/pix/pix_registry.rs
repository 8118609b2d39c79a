use chrono::{Duration, Utc};
use log::debug;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use super::pix_model::PixSessionSnapshot;
use super::pix_session::PixSession;

/// How long a finished session stays readable after its charge expired.
const FINISHED_SESSION_RETENTION_MINUTES: i64 = 10;

/// Live PIX sessions keyed by transaction id.
///
/// Removing a session disposes its timers. Finished sessions are kept for a
/// short while so clients can still read their final status.
#[derive(Default)]
pub struct PixSessionRegistry {
    sessions: RwLock<HashMap<String, Arc<PixSession>>>,
}

impl PixSessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, session: PixSession) -> Arc<PixSession> {
        self.prune_finished();
        let session = Arc::new(session);
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(session.transaction_id(), session.clone());
        session
    }

    pub fn get(&self, transaction_id: &str) -> Option<Arc<PixSession>> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(transaction_id)
            .cloned()
    }

    pub fn snapshot(&self, transaction_id: &str) -> Option<PixSessionSnapshot> {
        self.get(transaction_id).map(|s| s.snapshot())
    }

    /// Removes a session and stops its timers.
    pub fn remove(&self, transaction_id: &str) -> Option<Arc<PixSession>> {
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(transaction_id);
        if let Some(session) = &removed {
            session.dispose();
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops terminal sessions whose charge expired past the retention window.
    pub fn prune_finished(&self) -> usize {
        let cutoff = Utc::now() - Duration::minutes(FINISHED_SESSION_RETENTION_MINUTES);
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let before = sessions.len();
        sessions.retain(|_, session| {
            let snapshot = session.snapshot();
            !(snapshot.status.is_terminal() && snapshot.expires_at < cutoff)
        });
        let pruned = before - sessions.len();
        if pruned > 0 {
            debug!("Pruned {} finished PIX sessions", pruned);
        }
        pruned
    }

    /// Stops every session's timers and empties the registry.
    pub fn dispose_all(&self) {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        for session in sessions.values() {
            session.dispose();
        }
        sessions.clear();
    }
}
