//! Questionnaire parsing, weighted scoring, maturity classification, and
//! report assembly for the digital sovereignty readiness assessment.
//!
//! A submission flows through [`Assessor::assess`] and comes out as one
//! [`AssessmentResult`]. The HTTP surface and the document export both read
//! that value; neither recomputes a figure.

mod assessor;
pub mod catalog;
pub mod export;
pub mod maturity;
pub mod profiles;
pub mod recommendations;
pub mod report;
pub mod responses;
pub mod router;
pub mod scoring;
pub mod service;
pub mod snapshot;
pub mod weights;

#[cfg(test)]
mod tests;

pub use assessor::Assessor;
pub use catalog::{CatalogError, Domain, Question, QuestionCatalog};
pub use export::{
    export_document, export_filename, DocumentRenderer, ExportDocument, ExportError,
    PlainTextRenderer,
};
pub use maturity::{MaturityBadge, MaturityTier};
pub use profiles::{Profile, ProfileCatalog, BALANCED_PROFILE, CUSTOM_PROFILE};
pub use recommendations::{recommended_actions, RecommendedActions};
pub use report::{AssessmentResult, DomainResult, ProfileSummary};
pub use responses::{Submission, UnknownDomainGroup, UnknownQuestion};
pub use router::{assessment_router, session_from_headers, SESSION_HEADER};
pub use scoring::CompositeScore;
pub use service::{AssessmentService, AssessmentServiceError};
pub use snapshot::{SessionId, SnapshotError, SnapshotStore, SubmissionSnapshot};
pub use weights::{custom_weight_field, DomainWeight, DomainWeights, WeightResolver};
