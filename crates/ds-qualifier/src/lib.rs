//! Digital sovereignty readiness scoring.
//!
//! The [`assessment`] module holds the pure scoring pipeline: questionnaire
//! answers are parsed against the question catalog, domain weights are
//! resolved from the selected profile, and a single [`assessment::AssessmentResult`]
//! is assembled for every renderer that needs it.

pub mod assessment;
pub mod config;
pub mod error;
pub mod telemetry;
