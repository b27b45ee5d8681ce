use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::{debug, error, info};

use crate::db::{self, DbPool};
use crate::voice::SessionRegistry;

/// Owns the Session Registry and the ledger handle. Built once at startup
/// and shared with the gateway event handler; all registry and ledger
/// writes go through here.
pub struct VoiceTracker {
    registry: SessionRegistry,
    db: DbPool,
    excluded_channels: HashSet<u64>,
}

impl VoiceTracker {
    pub fn new(db: DbPool, excluded_channels: impl IntoIterator<Item = u64>) -> Self {
        Self {
            registry: SessionRegistry::new(),
            db,
            excluded_channels: excluded_channels.into_iter().collect(),
        }
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Applies one voice-state notification. `channel_id` is the channel
    /// the member is now in, `None` when they disconnected entirely. A
    /// move between channels arrives as a plain join and restarts the
    /// open session; only a full disconnect credits time.
    pub async fn handle_transition(
        &self,
        member_id: u64,
        channel_id: Option<u64>,
        now: DateTime<Utc>,
    ) {
        match channel_id {
            Some(channel) if self.excluded_channels.contains(&channel) => {
                debug!(member_id, channel, "joined excluded channel, not tracking");
                self.registry.discard(member_id);
            }
            Some(channel) => {
                debug!(member_id, channel, "voice join");
                self.registry.on_join(member_id, now);
            }
            None => {
                let Some(seconds) = self.registry.on_leave(member_id, now) else {
                    debug!(member_id, "leave without a recorded join, ignoring");
                    return;
                };

                info!(member_id, seconds, "voice session ended");

                if let Err(e) =
                    db::add_voice_time(&self.db, &member_id.to_string(), seconds, now).await
                {
                    // The session's time is lost; there is no retry queue.
                    error!(member_id, seconds, "failed to write voice time: {e}");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    async fn test_tracker(
        excluded: impl IntoIterator<Item = u64>,
    ) -> (tempfile::TempDir, DbPool, VoiceTracker) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.db");
        let pool = db::init_db(path.to_str().unwrap()).await.unwrap();
        let tracker = VoiceTracker::new(pool.clone(), excluded);
        (dir, pool, tracker)
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[tokio::test]
    async fn test_join_then_leave_credits_the_elapsed_span() {
        let (_dir, pool, tracker) = test_tracker([]).await;

        tracker.handle_transition(1, Some(10), at(0)).await;
        tracker.handle_transition(1, None, at(120)).await;

        let entry = db::get_entry(&pool, "1").await.unwrap().unwrap();
        assert_eq!(entry.total_seconds, 120);
        assert_eq!(entry.last_seen, at(120));
        assert!(!tracker.registry().is_tracking(1));
    }

    #[tokio::test]
    async fn test_leave_without_join_writes_nothing() {
        let (_dir, pool, tracker) = test_tracker([]).await;

        tracker.handle_transition(2, None, at(100)).await;

        assert!(db::get_entry(&pool, "2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_move_between_channels_restarts_the_session() {
        let (_dir, pool, tracker) = test_tracker([]).await;

        tracker.handle_transition(1, Some(10), at(0)).await;
        tracker.handle_transition(1, Some(20), at(200)).await;
        tracker.handle_transition(1, None, at(260)).await;

        // only the span since the move is credited
        let entry = db::get_entry(&pool, "1").await.unwrap().unwrap();
        assert_eq!(entry.total_seconds, 60);
    }

    #[tokio::test]
    async fn test_sessions_accumulate_in_the_ledger() {
        let (_dir, pool, tracker) = test_tracker([]).await;

        tracker.handle_transition(1, Some(10), at(0)).await;
        tracker.handle_transition(1, None, at(120)).await;
        tracker.handle_transition(1, Some(10), at(200)).await;
        tracker.handle_transition(1, None, at(260)).await;

        let entry = db::get_entry(&pool, "1").await.unwrap().unwrap();
        assert_eq!(entry.total_seconds, 180);
        assert_eq!(entry.last_seen, at(260));
    }

    #[tokio::test]
    async fn test_excluded_channel_is_never_credited() {
        let (_dir, pool, tracker) = test_tracker([99]).await;

        tracker.handle_transition(1, Some(99), at(0)).await;
        tracker.handle_transition(1, None, at(50)).await;

        assert!(db::get_entry(&pool, "1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_moving_into_an_excluded_channel_discards_the_session() {
        let (_dir, pool, tracker) = test_tracker([99]).await;

        tracker.handle_transition(1, Some(10), at(0)).await;
        tracker.handle_transition(1, Some(99), at(30)).await;
        tracker.handle_transition(1, None, at(60)).await;

        assert!(db::get_entry(&pool, "1").await.unwrap().is_none());
    }
}
