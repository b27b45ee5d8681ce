use chrono::{DateTime, Utc};
use dashmap::DashMap;

/// Transient per-member "in voice since" bookkeeping. Entries exist only
/// for the lifetime of the process, so a session spanning a restart is
/// never credited.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: DashMap<u64, DateTime<Utc>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Records `member_id` as in voice since `now`. A join arriving while
    /// an earlier one is still unresolved replaces it; the earlier join
    /// time is discarded.
    pub fn on_join(&self, member_id: u64, now: DateTime<Utc>) {
        self.sessions.insert(member_id, now);
    }

    /// Resolves the open session for `member_id` and returns the elapsed
    /// whole seconds. `None` when no join was recorded for the member
    /// (process started mid-session, or a duplicate leave). A backwards
    /// clock step clamps to zero instead of going negative.
    pub fn on_leave(&self, member_id: u64, now: DateTime<Utc>) -> Option<i64> {
        let (_, joined_at) = self.sessions.remove(&member_id)?;
        Some((now - joined_at).num_seconds().max(0))
    }

    /// Drops any open session for `member_id` without crediting it.
    pub fn discard(&self, member_id: u64) {
        self.sessions.remove(&member_id);
    }

    pub fn is_tracking(&self, member_id: u64) -> bool {
        self.sessions.contains_key(&member_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
