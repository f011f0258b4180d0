use super::report::AssessmentResult;
use super::responses::Submission;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of the session owning a snapshot slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    /// Fresh random 128-bit id, hex encoded.
    pub fn generate() -> Self {
        Self(format!("{:032x}", rand::random::<u128>()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Most recent submission of a session together with its scored result,
/// kept so a later export step renders exactly what was displayed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionSnapshot {
    pub submission: Submission,
    pub result: AssessmentResult,
    pub submitted_at: DateTime<Utc>,
}

/// Single-slot-per-session storage owned by the calling layer.
///
/// `replace` overwrites whatever the session held before.
pub trait SnapshotStore: Send + Sync {
    fn replace(
        &self,
        session: &SessionId,
        snapshot: SubmissionSnapshot,
    ) -> Result<Option<SubmissionSnapshot>, SnapshotError>;
    fn latest(&self, session: &SessionId) -> Result<Option<SubmissionSnapshot>, SnapshotError>;
    fn clear(&self, session: &SessionId) -> Result<bool, SnapshotError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot store unavailable: {0}")]
    Unavailable(String),
}
