use super::catalog::QuestionCatalog;
use super::maturity::{MaturityBadge, MaturityTier};
use super::recommendations::{recommended_actions, RecommendedActions};
use super::responses::{ParsedResponses, UnknownDomainGroup};
use super::scoring::{domain_percentage, CompositeScore};
use super::weights::ResolvedProfile;
use serde::Serialize;

/// Weights at or above this are highlighted as emphasised.
pub const EMPHASIS_THRESHOLD: f64 = 1.5;

const CUSTOM_BALANCED_DESCRIPTION: &str =
    "Custom profile with balanced weighting (all domains set to 1.0×)";
const CUSTOM_WEIGHTED_DESCRIPTION: &str = "Custom profile with user-defined domain weightings";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileSummary {
    pub key: String,
    pub name: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainResult {
    pub domain: String,
    pub description: String,
    pub raw_score: u32,
    pub max_score: u32,
    pub percentage: u8,
    pub weight: f64,
    pub emphasized: bool,
    pub weighted_contribution: f64,
    pub maturity: MaturityTier,
    pub maturity_label: &'static str,
    /// Texts of the questions answered positively, in catalog order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requirements_identified: Vec<String>,
}

/// Renderer-agnostic outcome of one submission.
///
/// The interactive view and the document export both consume this value, so
/// every figure they show comes from the same computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentResult {
    pub profile: ProfileSummary,
    pub raw_total: u32,
    pub composite_score: f64,
    pub max_score: u32,
    pub composite_percentage: u8,
    pub maturity: MaturityBadge,
    pub domains: Vec<DomainResult>,
    pub unknown_questions: Vec<UnknownDomainGroup>,
    pub recommended_actions: &'static RecommendedActions,
}

impl AssessmentResult {
    pub fn tier(&self) -> MaturityTier {
        self.maturity.tier
    }

    pub fn unknown_count(&self) -> usize {
        self.unknown_questions
            .iter()
            .map(|group| group.questions.len())
            .sum()
    }

    pub fn domain(&self, name: &str) -> Option<&DomainResult> {
        self.domains.iter().find(|domain| domain.domain == name)
    }
}

pub(crate) fn assemble_result(
    catalog: &QuestionCatalog,
    resolved: &ResolvedProfile<'_>,
    mut responses: ParsedResponses,
    score: &CompositeScore,
) -> AssessmentResult {
    let domains = catalog
        .domains()
        .iter()
        .zip(&score.domains)
        .enumerate()
        .map(|(index, (domain, scored))| {
            let percentage = domain_percentage(scored.raw, scored.max);
            let maturity = MaturityTier::for_domain_percentage(f64::from(percentage));
            let requirements_identified = responses
                .affirmed
                .get_mut(index)
                .map(std::mem::take)
                .unwrap_or_default();

            DomainResult {
                domain: domain.name.clone(),
                description: domain.description.clone(),
                raw_score: scored.raw,
                max_score: scored.max,
                percentage,
                weight: scored.weight,
                emphasized: scored.weight >= EMPHASIS_THRESHOLD,
                weighted_contribution: scored.weighted,
                maturity,
                maturity_label: maturity.label(),
                requirements_identified,
            }
        })
        .collect();

    let tier = MaturityTier::for_composite(score.composite, score.global_max);

    AssessmentResult {
        profile: profile_summary(resolved),
        raw_total: score.raw_total,
        composite_score: score.composite,
        max_score: score.global_max,
        composite_percentage: score.percentage(),
        maturity: tier.badge(),
        domains,
        unknown_questions: responses.unknown,
        recommended_actions: recommended_actions(tier),
    }
}

fn profile_summary(resolved: &ResolvedProfile<'_>) -> ProfileSummary {
    let profile = resolved.profile;
    let description = if !profile.is_custom() {
        profile.description.clone()
    } else if resolved
        .weights
        .iter()
        .all(|entry| entry.weight == super::profiles::MIN_WEIGHT)
    {
        CUSTOM_BALANCED_DESCRIPTION.to_string()
    } else {
        CUSTOM_WEIGHTED_DESCRIPTION.to_string()
    };

    ProfileSummary {
        key: profile.key.clone(),
        name: profile.name.clone(),
        description,
        icon: profile.icon.clone(),
    }
}
