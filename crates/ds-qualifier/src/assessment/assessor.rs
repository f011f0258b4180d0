use super::catalog::{CatalogError, QuestionCatalog};
use super::profiles::ProfileCatalog;
use super::report::{assemble_result, AssessmentResult};
use super::responses::{parse_responses, Submission};
use super::scoring::score;
use super::weights::WeightResolver;
use crate::config::CatalogConfig;
use std::sync::Arc;
use tracing::{debug, info};

/// Entry point of the scoring pipeline.
///
/// Holds the immutable catalogs behind `Arc`s so one instance can be shared
/// across concurrent requests; every call to [`Assessor::assess`] works on
/// freshly allocated per-submission state.
#[derive(Debug, Clone)]
pub struct Assessor {
    questions: Arc<QuestionCatalog>,
    profiles: Arc<ProfileCatalog>,
}

impl Assessor {
    /// Pair two catalogs, validating the profiles against the questions and
    /// the catalog ceiling against `max_score`.
    pub fn new(
        questions: QuestionCatalog,
        profiles: ProfileCatalog,
        max_score: u32,
    ) -> Result<Self, CatalogError> {
        questions.ensure_max_score(max_score)?;
        let profiles = ProfileCatalog::new(profiles.profiles().to_vec(), &questions)?;
        Ok(Self {
            questions: Arc::new(questions),
            profiles: Arc::new(profiles),
        })
    }

    /// Reference questions and profiles.
    pub fn standard() -> Self {
        Self {
            questions: Arc::new(QuestionCatalog::standard()),
            profiles: Arc::new(ProfileCatalog::standard()),
        }
    }

    /// Load catalogs from the configured sources, falling back to the
    /// built-in reference catalogs, and refuse inconsistent ones.
    pub fn load(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let questions = match &config.questions_csv {
            Some(path) => QuestionCatalog::from_csv_path(path)?,
            None => QuestionCatalog::new(QuestionCatalog::standard().domains().to_vec())?,
        };
        let profiles = match &config.profiles_json {
            Some(path) => ProfileCatalog::from_json_path(path, &questions)?,
            None => ProfileCatalog::standard(),
        };
        let assessor = Self::new(questions, profiles, config.max_score)?;

        info!(
            domains = assessor.questions.domains().len(),
            questions = assessor.questions.question_count(),
            profiles = assessor.profiles.profiles().len(),
            max_score = config.max_score,
            "assessment catalogs loaded"
        );
        Ok(assessor)
    }

    pub fn questions(&self) -> &QuestionCatalog {
        &self.questions
    }

    pub fn profiles(&self) -> &ProfileCatalog {
        &self.profiles
    }

    /// Score one submission. Never fails: malformed input degrades to
    /// defaults.
    pub fn assess(&self, submission: &Submission) -> AssessmentResult {
        let resolved = WeightResolver::new(&self.profiles, &self.questions).resolve(submission);
        let parsed = parse_responses(submission, &self.questions);
        let scored = score(&self.questions, &parsed, &resolved.weights);
        let result = assemble_result(&self.questions, &resolved, parsed, &scored);

        debug!(
            profile = %result.profile.key,
            substituted = resolved.substituted,
            raw_total = result.raw_total,
            composite = result.composite_score,
            unknown = result.unknown_count(),
            tier = result.maturity.label,
            "assessment scored"
        );
        result
    }
}
