use super::catalog::QuestionCatalog;
use super::responses::ParsedResponses;
use super::weights::DomainWeights;

/// Composite scores are kept to this many steps per point.
const SCORE_RESOLUTION: f64 = 1_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainScore {
    pub raw: u32,
    pub max: u32,
    /// `raw / max`, or 0 for a domain without questions.
    pub ratio: f64,
    pub weight: f64,
    /// `ratio * weight`.
    pub weighted: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompositeScore {
    pub domains: Vec<DomainScore>,
    pub raw_total: u32,
    pub weighted_sum: f64,
    pub total_weight: f64,
    /// Weight-normalised score on the `0..=global_max` scale.
    pub composite: f64,
    pub global_max: u32,
}

impl CompositeScore {
    pub fn percentage(&self) -> u8 {
        composite_percentage(self.composite, self.global_max)
    }
}

pub fn domain_ratio(raw: u32, max: u32) -> f64 {
    if max > 0 {
        f64::from(raw) / f64::from(max)
    } else {
        0.0
    }
}

/// Rounded 0..=100 percentage of a domain's score.
pub fn domain_percentage(raw: u32, max: u32) -> u8 {
    to_percent(domain_ratio(raw, max))
}

pub fn composite_percentage(composite: f64, global_max: u32) -> u8 {
    if global_max == 0 {
        return 0;
    }
    to_percent(composite / f64::from(global_max))
}

fn to_percent(ratio: f64) -> u8 {
    let percent = (ratio * 100.0).round().clamp(0.0, 100.0);
    percent as u8
}

fn quantize(value: f64) -> f64 {
    (value * SCORE_RESOLUTION).round() / SCORE_RESOLUTION
}

/// Score parsed responses under resolved weights.
///
/// The ceiling is the catalog's own max score, so the composite always lands
/// on the same scale as the raw total. With uniform weights and domains of
/// equal size the composite equals the raw total.
pub fn score(
    catalog: &QuestionCatalog,
    responses: &ParsedResponses,
    weights: &DomainWeights,
) -> CompositeScore {
    let global_max = catalog.max_score();
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;

    let domains: Vec<DomainScore> = catalog
        .domains()
        .iter()
        .enumerate()
        .map(|(index, domain)| {
            let max = domain.max_score();
            let raw = responses
                .domain_scores
                .get(index)
                .copied()
                .unwrap_or_default()
                .min(max);
            let ratio = domain_ratio(raw, max);
            let weight = weights.by_index(index);
            let weighted = ratio * weight;

            weighted_sum += weighted;
            total_weight += weight;

            DomainScore {
                raw,
                max,
                ratio,
                weight,
                weighted,
            }
        })
        .collect();

    let composite = if total_weight > 0.0 {
        let normalised = (weighted_sum / total_weight) * f64::from(global_max);
        quantize(normalised).clamp(0.0, f64::from(global_max))
    } else {
        0.0
    };

    CompositeScore {
        domains,
        raw_total: responses.raw_total,
        weighted_sum,
        total_weight,
        composite,
        global_max,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::profiles::ProfileCatalog;
    use crate::assessment::responses::{parse_responses, Submission};
    use crate::assessment::weights::WeightResolver;

    fn score_submission(submission: &Submission) -> CompositeScore {
        let questions = QuestionCatalog::standard();
        let profiles = ProfileCatalog::standard();
        let resolved = WeightResolver::new(&profiles, &questions).resolve(submission);
        let parsed = parse_responses(submission, &questions);
        score(&questions, &parsed, &resolved.weights)
    }

    #[test]
    fn ratio_guards_empty_domains() {
        assert_eq!(domain_ratio(0, 0), 0.0);
        assert_eq!(domain_ratio(2, 4), 0.5);
        assert_eq!(domain_percentage(1, 3), 33);
        assert_eq!(domain_percentage(2, 3), 67);
        assert_eq!(domain_percentage(0, 0), 0);
    }

    #[test]
    fn composite_percentage_rounds() {
        assert_eq!(composite_percentage(10.5, 21), 50);
        assert_eq!(composite_percentage(21.0, 21), 100);
        assert_eq!(composite_percentage(1.0, 21), 5);
        assert_eq!(composite_percentage(3.0, 0), 0);
    }

    #[test]
    fn uniform_weights_reproduce_raw_total() {
        let submission: Submission = ["ds1", "ds3", "ts2", "os1", "os2", "os3", "eo1", "ms3"]
            .into_iter()
            .map(|id| (id, "1"))
            .collect();

        let result = score_submission(&submission);

        assert_eq!(result.raw_total, 8);
        assert_eq!(result.composite, 8.0);
        assert_eq!(result.total_weight, 7.0);
    }

    #[test]
    fn weights_shift_composite_toward_emphasised_domains() {
        let answers = [("ds1", "1"), ("ds2", "1"), ("ds3", "1")];
        let balanced: Submission = answers.into_iter().collect();
        let financial = balanced.clone().with("profile", "financial");

        let balanced = score_submission(&balanced);
        let financial = score_submission(&financial);

        assert_eq!(balanced.composite, 3.0);
        // Data Sovereignty carries 2.0 of 10.5 total weight.
        assert!((financial.composite - 4.0).abs() < 1e-9);
        assert!(financial.composite > balanced.composite);
    }

    #[test]
    fn empty_submission_scores_zero() {
        let result = score_submission(&Submission::new());

        assert_eq!(result.composite, 0.0);
        assert_eq!(result.percentage(), 0);
        assert!(result.domains.iter().all(|d| d.raw == 0 && d.weighted == 0.0));
    }
}
