use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::assessment::export::PlainTextRenderer;
use crate::assessment::snapshot::{SessionId, SnapshotError, SnapshotStore, SubmissionSnapshot};
use crate::assessment::{assessment_router, AssessmentService, Assessor, Submission};

/// Submission answering every Data Sovereignty question positively under
/// the financial profile.
pub(super) fn financial_submission() -> Submission {
    Submission::new()
        .with("profile", "financial")
        .with("ds1", "1")
        .with("ds2", "1")
        .with("ds3", "1")
}

pub(super) fn build_service() -> (AssessmentService<MemorySnapshots>, MemorySnapshots) {
    let store = MemorySnapshots::default();
    let service = AssessmentService::new(
        Arc::new(Assessor::standard()),
        Arc::new(store.clone()),
        Arc::new(PlainTextRenderer),
    );
    (service, store)
}

pub(super) fn assessment_router_with_service(
    service: AssessmentService<MemorySnapshots>,
) -> axum::Router {
    assessment_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemorySnapshots {
    slots: Arc<Mutex<HashMap<SessionId, SubmissionSnapshot>>>,
}

impl MemorySnapshots {
    pub(super) fn sessions(&self) -> usize {
        self.slots.lock().expect("snapshot mutex poisoned").len()
    }
}

impl SnapshotStore for MemorySnapshots {
    fn replace(
        &self,
        session: &SessionId,
        snapshot: SubmissionSnapshot,
    ) -> Result<Option<SubmissionSnapshot>, SnapshotError> {
        let mut guard = self.slots.lock().expect("snapshot mutex poisoned");
        Ok(guard.insert(session.clone(), snapshot))
    }

    fn latest(&self, session: &SessionId) -> Result<Option<SubmissionSnapshot>, SnapshotError> {
        let guard = self.slots.lock().expect("snapshot mutex poisoned");
        Ok(guard.get(session).cloned())
    }

    fn clear(&self, session: &SessionId) -> Result<bool, SnapshotError> {
        let mut guard = self.slots.lock().expect("snapshot mutex poisoned");
        Ok(guard.remove(session).is_some())
    }
}

pub(super) struct UnavailableSnapshots;

impl SnapshotStore for UnavailableSnapshots {
    fn replace(
        &self,
        _session: &SessionId,
        _snapshot: SubmissionSnapshot,
    ) -> Result<Option<SubmissionSnapshot>, SnapshotError> {
        Err(SnapshotError::Unavailable("offline".to_string()))
    }

    fn latest(&self, _session: &SessionId) -> Result<Option<SubmissionSnapshot>, SnapshotError> {
        Err(SnapshotError::Unavailable("offline".to_string()))
    }

    fn clear(&self, _session: &SessionId) -> Result<bool, SnapshotError> {
        Err(SnapshotError::Unavailable("offline".to_string()))
    }
}

pub(super) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body")
        .to_vec()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = read_body(response).await;
    serde_json::from_slice(&body).expect("json payload")
}
