use super::catalog::{QuestionCatalog, QuestionLocation};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Form field selecting the weighting profile.
pub const PROFILE_FIELD: &str = "profile";
/// Answer token for "don't know".
pub const UNKNOWN_ANSWER: &str = "unknown";

/// Raw questionnaire submission: form field name to string value.
///
/// Created per request and never merged with another submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Submission {
    fields: BTreeMap<String, String>,
}

impl Submission {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn profile_key(&self) -> Option<&str> {
        self.get(PROFILE_FIELD)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(field, value)| (field.as_str(), value.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Submission
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut submission = Self::new();
        for (field, value) in iter {
            submission.insert(field, value);
        }
        submission
    }
}

/// JSON submissions may carry numbers or booleans; they are kept as the
/// string a web form would have sent.
impl<'de> Deserialize<'de> for Submission {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, FieldValue>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .map(|(field, value)| (field, value.into_text()))
            .collect())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FieldValue {
    Text(String),
    Integer(i64),
    Decimal(f64),
    Flag(bool),
}

impl FieldValue {
    fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Integer(value) => value.to_string(),
            Self::Decimal(value) => value.to_string(),
            Self::Flag(true) => "1".to_string(),
            Self::Flag(false) => "0".to_string(),
        }
    }
}

/// Interpreted value of a single question field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Points(u32),
    Unknown,
}

impl Answer {
    pub fn parse(raw: &str) -> Self {
        if raw == UNKNOWN_ANSWER {
            Self::Unknown
        } else {
            Self::Points(parse_answer_points(raw))
        }
    }
}

/// Best-effort integer parse of an answer, clamped to the 0/1 answer scale.
///
/// Leading whitespace, an optional sign and a run of digits are honoured;
/// anything without a numeric prefix is 0.
pub fn parse_answer_points(raw: &str) -> u32 {
    let value = leading_integer(raw);
    if value > 0 {
        1
    } else {
        0
    }
}

fn leading_integer(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let magnitude = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0_i64, |acc, digit| {
            acc.saturating_mul(10)
                .saturating_add(i64::from(digit - b'0'))
        });

    if negative {
        -magnitude
    } else {
        magnitude
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnknownQuestion {
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
}

/// Questions answered "unknown", grouped under their domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnknownDomainGroup {
    pub domain: String,
    pub questions: Vec<UnknownQuestion>,
}

/// Per-domain accumulation of a submission, indexed in catalog domain order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResponses {
    pub domain_scores: Vec<u32>,
    pub affirmed: Vec<Vec<String>>,
    pub raw_total: u32,
    pub unknown: Vec<UnknownDomainGroup>,
}

impl ParsedResponses {
    pub fn unknown_count(&self) -> usize {
        self.unknown.iter().map(|group| group.questions.len()).sum()
    }
}

/// Extract recognised answers from a submission.
///
/// Fields that are not catalog question ids are ignored, as are catalog
/// questions with no field. Unknown answers never contribute to a score.
pub fn parse_responses(submission: &Submission, catalog: &QuestionCatalog) -> ParsedResponses {
    let mut answered: Vec<(QuestionLocation, Answer)> = submission
        .fields()
        .filter_map(|(field, value)| {
            catalog
                .locate(field)
                .map(|location| (location, Answer::parse(value)))
        })
        .collect();
    answered.sort_by_key(|(location, _)| *location);

    let domain_count = catalog.domains().len();
    let mut domain_scores = vec![0_u32; domain_count];
    let mut affirmed = vec![Vec::new(); domain_count];
    let mut raw_total = 0_u32;
    let mut unknown: Vec<UnknownDomainGroup> = Vec::new();

    for (location, answer) in answered {
        let Some((domain, question)) = catalog.question(location) else {
            continue;
        };

        match answer {
            Answer::Unknown => {
                let entry = UnknownQuestion {
                    id: question.id.clone(),
                    text: question.text.clone(),
                    tooltip: question.tooltip.clone(),
                };
                match unknown.last_mut() {
                    Some(group) if group.domain == domain.name => group.questions.push(entry),
                    _ => unknown.push(UnknownDomainGroup {
                        domain: domain.name.clone(),
                        questions: vec![entry],
                    }),
                }
            }
            Answer::Points(points) => {
                domain_scores[location.domain] += points;
                raw_total += points;
                if points > 0 {
                    affirmed[location.domain].push(question.text.clone());
                }
            }
        }
    }

    ParsedResponses {
        domain_scores,
        affirmed,
        raw_total,
        unknown,
    }
}
