use chrono::{Duration, Utc};
use ds_qualifier::assessment::{SessionId, SnapshotError, SnapshotStore, SubmissionSnapshot};
use ds_qualifier::config::SessionConfig;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local snapshot slots, one per session. Lost on restart.
///
/// Slots older than the TTL are treated as absent and pruned on the next
/// `replace`. Once `capacity` live slots exist, the oldest submission is
/// evicted to make room.
#[derive(Clone)]
pub(crate) struct InMemorySnapshotStore {
    slots: Arc<Mutex<HashMap<SessionId, SubmissionSnapshot>>>,
    ttl: Duration,
    capacity: usize,
}

impl Default for InMemorySnapshotStore {
    fn default() -> Self {
        Self::from_config(&SessionConfig::default())
    }
}

impl InMemorySnapshotStore {
    pub(crate) fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
            ttl,
            capacity: capacity.max(1),
        }
    }

    pub(crate) fn from_config(config: &SessionConfig) -> Self {
        let ttl = i64::try_from(config.ttl_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX);
        Self::new(ttl, config.capacity)
    }

    fn is_expired(&self, snapshot: &SubmissionSnapshot) -> bool {
        Utc::now().signed_duration_since(snapshot.submitted_at) > self.ttl
    }

    fn slots(&self) -> Result<MutexGuard<'_, HashMap<SessionId, SubmissionSnapshot>>, SnapshotError> {
        self.slots
            .lock()
            .map_err(|_| SnapshotError::Unavailable("snapshot mutex poisoned".to_string()))
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn replace(
        &self,
        session: &SessionId,
        snapshot: SubmissionSnapshot,
    ) -> Result<Option<SubmissionSnapshot>, SnapshotError> {
        let mut slots = self.slots()?;
        slots.retain(|_, existing| !self.is_expired(existing));

        if !slots.contains_key(session) {
            while slots.len() >= self.capacity {
                let Some(oldest) = slots
                    .iter()
                    .min_by_key(|(_, existing)| existing.submitted_at)
                    .map(|(id, _)| id.clone())
                else {
                    break;
                };
                slots.remove(&oldest);
                debug!(session = %oldest.as_str(), "evicted oldest snapshot slot");
            }
        }

        Ok(slots.insert(session.clone(), snapshot))
    }

    fn latest(&self, session: &SessionId) -> Result<Option<SubmissionSnapshot>, SnapshotError> {
        Ok(self
            .slots()?
            .get(session)
            .filter(|snapshot| !self.is_expired(snapshot))
            .cloned())
    }

    fn clear(&self, session: &SessionId) -> Result<bool, SnapshotError> {
        Ok(self.slots()?.remove(session).is_some())
    }
}
