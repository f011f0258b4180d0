use std::sync::Arc;

use chrono::{NaiveDateTime, Utc};
use tracing::info;

use super::assessor::Assessor;
use super::export::{export_document, DocumentRenderer, ExportDocument, ExportError};
use super::report::AssessmentResult;
use super::responses::Submission;
use super::snapshot::{SessionId, SnapshotError, SnapshotStore, SubmissionSnapshot};

/// Service composing the assessor, the per-session snapshot slot, and the
/// document renderer.
pub struct AssessmentService<S> {
    assessor: Arc<Assessor>,
    store: Arc<S>,
    renderer: Arc<dyn DocumentRenderer>,
}

impl<S> AssessmentService<S>
where
    S: SnapshotStore + 'static,
{
    pub fn new(assessor: Arc<Assessor>, store: Arc<S>, renderer: Arc<dyn DocumentRenderer>) -> Self {
        Self {
            assessor,
            store,
            renderer,
        }
    }

    pub fn assessor(&self) -> &Assessor {
        &self.assessor
    }

    /// Score a submission and keep it as the session's latest snapshot.
    pub fn submit(
        &self,
        session: &SessionId,
        submission: Submission,
    ) -> Result<AssessmentResult, AssessmentServiceError> {
        let result = self.assessor.assess(&submission);
        let snapshot = SubmissionSnapshot {
            submission,
            result: result.clone(),
            submitted_at: Utc::now(),
        };
        self.store.replace(session, snapshot)?;
        Ok(result)
    }

    pub fn latest(
        &self,
        session: &SessionId,
    ) -> Result<SubmissionSnapshot, AssessmentServiceError> {
        self.store
            .latest(session)?
            .ok_or(AssessmentServiceError::NoSubmission)
    }

    /// Render the session's stored result. The result is reused as-is, so
    /// the export shows the same figures as the interactive view.
    pub fn export(
        &self,
        session: &SessionId,
        generated_at: NaiveDateTime,
    ) -> Result<ExportDocument, AssessmentServiceError> {
        let snapshot = self.latest(session)?;
        let document = export_document(self.renderer.as_ref(), &snapshot.result, generated_at)?;
        info!(
            session = %session.0,
            filename = %document.filename,
            bytes = document.body.len(),
            "assessment exported"
        );
        Ok(document)
    }

    /// Drop the session's snapshot. Returns whether one existed.
    pub fn end_session(&self, session: &SessionId) -> Result<bool, AssessmentServiceError> {
        Ok(self.store.clear(session)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error("no assessment has been submitted in this session")]
    NoSubmission,
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error(transparent)]
    Export(#[from] ExportError),
}
