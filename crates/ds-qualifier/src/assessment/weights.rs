use super::catalog::QuestionCatalog;
use super::profiles::{Profile, ProfileCatalog, MAX_WEIGHT, MIN_WEIGHT};
use super::responses::Submission;
use serde::Serialize;
use tracing::debug;

/// Prefix of the per-domain weight override fields used by the custom profile.
pub const CUSTOM_WEIGHT_FIELD_PREFIX: &str = "custom_weight_";

/// Form field carrying the custom weight for `domain`, e.g.
/// `custom_weight_Data_Sovereignty`.
pub fn custom_weight_field(domain: &str) -> String {
    format!("{CUSTOM_WEIGHT_FIELD_PREFIX}{}", domain.replace(' ', "_"))
}

/// Parse a custom weight override. Absent or non-numeric input is 1.0;
/// anything else is clamped into [1.0, 2.0].
pub fn parse_custom_weight(raw: Option<&str>) -> f64 {
    raw.and_then(leading_float)
        .map(|weight| weight.clamp(MIN_WEIGHT, MAX_WEIGHT))
        .unwrap_or(MIN_WEIGHT)
}

fn leading_float(raw: &str) -> Option<f64> {
    let trimmed = raw.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;
    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        if frac_end > frac_start || digits > 0 {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    trimmed[..end].parse::<f64>().ok()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainWeight {
    pub domain: String,
    pub weight: f64,
}

/// Effective weight for every catalog domain, in catalog order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DomainWeights(Vec<DomainWeight>);

impl DomainWeights {
    pub fn get(&self, domain: &str) -> Option<f64> {
        self.0
            .iter()
            .find(|entry| entry.domain == domain)
            .map(|entry| entry.weight)
    }

    pub fn by_index(&self, index: usize) -> f64 {
        self.0.get(index).map(|entry| entry.weight).unwrap_or(MIN_WEIGHT)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DomainWeight> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when every domain carries the same weight.
    pub fn is_uniform(&self) -> bool {
        self.0
            .first()
            .map(|first| self.0.iter().all(|entry| entry.weight == first.weight))
            .unwrap_or(true)
    }
}

/// Profile selected for a submission with its resolved weights.
#[derive(Debug, Clone)]
pub struct ResolvedProfile<'a> {
    pub profile: &'a Profile,
    pub weights: DomainWeights,
    /// The requested key was not in the catalog and balanced was used instead.
    pub substituted: bool,
}

/// Resolves domain weights from the selected profile.
pub struct WeightResolver<'a> {
    profiles: &'a ProfileCatalog,
    questions: &'a QuestionCatalog,
}

impl<'a> WeightResolver<'a> {
    pub fn new(profiles: &'a ProfileCatalog, questions: &'a QuestionCatalog) -> Self {
        Self {
            profiles,
            questions,
        }
    }

    /// Resolve the weights for `submission`'s profile selection.
    ///
    /// A missing or unrecognised key silently selects the balanced profile.
    pub fn resolve(&self, submission: &Submission) -> ResolvedProfile<'a> {
        let requested = submission.profile_key();
        let (profile, substituted) = match requested.and_then(|key| self.profiles.get(key)) {
            Some(profile) => (profile, false),
            None => {
                if let Some(key) = requested {
                    debug!(requested = key, "unrecognised profile, using balanced");
                }
                (self.profiles.balanced(), requested.is_some())
            }
        };

        let weights = if profile.is_custom() {
            self.custom_weights(submission)
        } else {
            self.fixed_weights(profile)
        };

        ResolvedProfile {
            profile,
            weights,
            substituted,
        }
    }

    fn fixed_weights(&self, profile: &Profile) -> DomainWeights {
        DomainWeights(
            self.questions
                .domain_names()
                .map(|domain| DomainWeight {
                    domain: domain.to_string(),
                    weight: profile.weight_for(domain).unwrap_or(MIN_WEIGHT),
                })
                .collect(),
        )
    }

    fn custom_weights(&self, submission: &Submission) -> DomainWeights {
        DomainWeights(
            self.questions
                .domain_names()
                .map(|domain| {
                    let raw = submission.get(&custom_weight_field(domain));
                    let weight = parse_custom_weight(raw);
                    if let Some(raw) = raw {
                        if raw.trim().parse::<f64>().ok() != Some(weight) {
                            debug!(domain, raw, weight, "custom weight coerced");
                        }
                    }
                    DomainWeight {
                        domain: domain.to_string(),
                        weight,
                    }
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::profiles::{BALANCED_PROFILE, CUSTOM_PROFILE};

    fn catalogs() -> (QuestionCatalog, ProfileCatalog) {
        (QuestionCatalog::standard(), ProfileCatalog::standard())
    }

    #[test]
    fn field_name_replaces_spaces() {
        assert_eq!(
            custom_weight_field("Data Sovereignty"),
            "custom_weight_Data_Sovereignty"
        );
        assert_eq!(custom_weight_field("Open Source"), "custom_weight_Open_Source");
    }

    #[test]
    fn custom_weights_are_clamped_and_defaulted() {
        assert_eq!(parse_custom_weight(Some("0.5")), 1.0);
        assert_eq!(parse_custom_weight(Some("3.0")), 2.0);
        assert_eq!(parse_custom_weight(Some("1.5")), 1.5);
        assert_eq!(parse_custom_weight(Some("1.75x")), 1.75);
        assert_eq!(parse_custom_weight(Some(" 2")), 2.0);
        assert_eq!(parse_custom_weight(Some(".5")), 1.0);
        assert_eq!(parse_custom_weight(Some("-4")), 1.0);
        assert_eq!(parse_custom_weight(Some("1e3")), 2.0);
        assert_eq!(parse_custom_weight(Some("heavy")), 1.0);
        assert_eq!(parse_custom_weight(Some("NaN")), 1.0);
        assert_eq!(parse_custom_weight(Some("")), 1.0);
        assert_eq!(parse_custom_weight(None), 1.0);
    }

    #[test]
    fn fixed_profile_weights_are_returned_unchanged() {
        let (questions, profiles) = catalogs();
        let resolver = WeightResolver::new(&profiles, &questions);
        let submission = Submission::new()
            .with("profile", "technology")
            .with(custom_weight_field("Data Sovereignty"), "2.0");

        let resolved = resolver.resolve(&submission);

        assert_eq!(resolved.profile.key, "technology");
        assert!(!resolved.substituted);
        assert_eq!(resolved.weights.len(), 7);
        assert_eq!(resolved.weights.get("Data Sovereignty"), Some(1.5));
        assert_eq!(resolved.weights.get("Open Source"), Some(2.0));
        assert_eq!(resolved.weights.get("Assurance Sovereignty"), Some(1.0));
    }

    #[test]
    fn unrecognised_profile_falls_back_to_balanced() {
        let (questions, profiles) = catalogs();
        let resolver = WeightResolver::new(&profiles, &questions);

        let resolved = resolver.resolve(&Submission::new().with("profile", "aerospace"));
        assert_eq!(resolved.profile.key, BALANCED_PROFILE);
        assert!(resolved.substituted);
        assert!(resolved.weights.iter().all(|entry| entry.weight == 1.0));

        let resolved = resolver.resolve(&Submission::new());
        assert_eq!(resolved.profile.key, BALANCED_PROFILE);
        assert!(!resolved.substituted);
    }

    #[test]
    fn custom_profile_reads_every_domain_override() {
        let (questions, profiles) = catalogs();
        let resolver = WeightResolver::new(&profiles, &questions);
        let submission = Submission::new()
            .with("profile", CUSTOM_PROFILE)
            .with("custom_weight_Data_Sovereignty", "0.5")
            .with("custom_weight_Open_Source", "3.0")
            .with("custom_weight_Managed_Services", "1.25")
            .with("custom_weight_Executive_Oversight", "lots");

        let resolved = resolver.resolve(&submission);

        assert!(resolved.profile.is_custom());
        let names: Vec<_> = resolved.weights.iter().map(|w| w.domain.as_str()).collect();
        assert_eq!(names, questions.domain_names().collect::<Vec<_>>());
        assert_eq!(resolved.weights.get("Data Sovereignty"), Some(1.0));
        assert_eq!(resolved.weights.get("Open Source"), Some(2.0));
        assert_eq!(resolved.weights.get("Managed Services"), Some(1.25));
        assert_eq!(resolved.weights.get("Executive Oversight"), Some(1.0));
        assert_eq!(resolved.weights.get("Technical Sovereignty"), Some(1.0));
        assert!(!resolved.weights.is_uniform());
    }
}
