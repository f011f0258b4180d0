use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Single yes/no question belonging to a domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
}

/// Named grouping of questions. Every question is worth one point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    pub name: String,
    pub key: String,
    pub description: String,
    pub questions: Vec<Question>,
}

impl Domain {
    pub fn max_score(&self) -> u32 {
        u32::try_from(self.questions.len()).unwrap_or(u32::MAX)
    }

    fn owns_id(&self, id: &str) -> bool {
        id.strip_prefix(self.key.as_str())
            .map(|suffix| !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()))
            .unwrap_or(false)
    }
}

/// Position of a question inside the catalog, in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QuestionLocation {
    pub domain: usize,
    pub question: usize,
}

/// Immutable, ordered question catalog with a precomputed id index.
#[derive(Debug, Clone)]
pub struct QuestionCatalog {
    domains: Vec<Domain>,
    index: HashMap<String, QuestionLocation>,
}

impl QuestionCatalog {
    /// Validate and index a catalog.
    pub fn new(domains: Vec<Domain>) -> Result<Self, CatalogError> {
        validate_domains(&domains)?;
        Ok(Self::indexed(domains))
    }

    /// Reference catalog: seven domains with three questions each.
    pub fn standard() -> Self {
        Self::indexed(reference_domains())
    }

    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_csv_reader(file)
    }

    /// Load from CSV rows of `domain,domain_key,domain_description,id,text,tooltip`.
    ///
    /// Domains keep the order of their first row; the key and description of
    /// later rows for the same domain are ignored.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut domains: Vec<Domain> = Vec::new();

        for row in csv_reader.deserialize::<CatalogRow>() {
            let row = row?;
            let question = Question {
                id: row.id,
                text: row.text,
                tooltip: row.tooltip.filter(|tooltip| !tooltip.is_empty()),
            };

            match domains.iter_mut().find(|domain| domain.name == row.domain) {
                Some(domain) => domain.questions.push(question),
                None => domains.push(Domain {
                    name: row.domain,
                    key: row.domain_key,
                    description: row.domain_description,
                    questions: vec![question],
                }),
            }
        }

        Self::new(domains)
    }

    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    pub fn domain_names(&self) -> impl Iterator<Item = &str> {
        self.domains.iter().map(|domain| domain.name.as_str())
    }

    pub fn locate_domain(&self, name: &str) -> Option<usize> {
        self.domains.iter().position(|domain| domain.name == name)
    }

    pub fn locate(&self, id: &str) -> Option<QuestionLocation> {
        self.index.get(id).copied()
    }

    pub fn question(&self, location: QuestionLocation) -> Option<(&Domain, &Question)> {
        let domain = self.domains.get(location.domain)?;
        let question = domain.questions.get(location.question)?;
        Some((domain, question))
    }

    pub fn question_count(&self) -> usize {
        self.index.len()
    }

    /// Ceiling for raw and composite scores: the sum of every domain's max score.
    pub fn max_score(&self) -> u32 {
        self.domains.iter().map(Domain::max_score).sum()
    }

    /// Fails when the catalog ceiling disagrees with the configured maximum.
    pub fn ensure_max_score(&self, configured: u32) -> Result<(), CatalogError> {
        let catalog = self.max_score();
        if catalog == configured {
            Ok(())
        } else {
            Err(CatalogError::MaxScoreMismatch {
                catalog,
                configured,
            })
        }
    }

    fn indexed(domains: Vec<Domain>) -> Self {
        let mut index = HashMap::new();
        for (domain_idx, domain) in domains.iter().enumerate() {
            for (question_idx, question) in domain.questions.iter().enumerate() {
                index
                    .entry(question.id.clone())
                    .or_insert(QuestionLocation {
                        domain: domain_idx,
                        question: question_idx,
                    });
            }
        }
        Self { domains, index }
    }
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    domain: String,
    domain_key: String,
    #[serde(default)]
    domain_description: String,
    id: String,
    text: String,
    #[serde(default)]
    tooltip: Option<String>,
}

fn validate_domains(domains: &[Domain]) -> Result<(), CatalogError> {
    if domains.is_empty() {
        return Err(CatalogError::Empty);
    }

    let mut names = HashSet::new();
    let mut ids = HashSet::new();
    for domain in domains {
        if !names.insert(domain.name.as_str()) {
            return Err(CatalogError::DuplicateDomain(domain.name.clone()));
        }
        if domain.key.is_empty() || !domain.key.bytes().all(|b| b.is_ascii_lowercase()) {
            return Err(CatalogError::InvalidDomainKey {
                domain: domain.name.clone(),
                key: domain.key.clone(),
            });
        }
        for question in &domain.questions {
            if !domain.owns_id(&question.id) {
                return Err(CatalogError::MalformedQuestionId {
                    id: question.id.clone(),
                    domain_key: domain.key.clone(),
                });
            }
            if !ids.insert(question.id.as_str()) {
                return Err(CatalogError::DuplicateQuestion(question.id.clone()));
            }
        }
    }

    Ok(())
}

/// Catalog consistency failures. These are configuration errors and are only
/// raised while catalogs load.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("unable to read catalog {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed question catalog: {0}")]
    Csv(#[from] csv::Error),
    #[error("malformed profile catalog: {0}")]
    Json(#[from] serde_json::Error),
    #[error("question catalog has no domains")]
    Empty,
    #[error("domain '{0}' is defined more than once")]
    DuplicateDomain(String),
    #[error("domain '{domain}' has invalid key '{key}' (expected lowercase letters)")]
    InvalidDomainKey { domain: String, key: String },
    #[error("question id '{id}' does not match '{domain_key}<digits>'")]
    MalformedQuestionId { id: String, domain_key: String },
    #[error("question id '{0}' is defined more than once")]
    DuplicateQuestion(String),
    #[error("question catalog totals {catalog} points but the configured maximum is {configured}")]
    MaxScoreMismatch { catalog: u32, configured: u32 },
    #[error("profile catalog is missing the '{0}' profile")]
    MissingProfile(&'static str),
    #[error("profile '{0}' is defined more than once")]
    DuplicateProfile(String),
    #[error("profile '{profile}' has no weight for domain '{domain}'")]
    MissingWeight { profile: String, domain: String },
    #[error("profile '{profile}' weights unknown domain '{domain}'")]
    UnknownWeightDomain { profile: String, domain: String },
    #[error("profile '{profile}' weight {weight} for '{domain}' is outside [1.0, 2.0]")]
    WeightOutOfRange {
        profile: String,
        domain: String,
        weight: f64,
    },
    #[error("baseline profile weights '{domain}' at {weight} instead of 1.0")]
    UnbalancedBaseline { domain: String, weight: f64 },
}

fn question(id: &str, text: &str, tooltip: &str) -> Question {
    Question {
        id: id.to_string(),
        text: text.to_string(),
        tooltip: Some(tooltip.to_string()),
    }
}

fn reference_domains() -> Vec<Domain> {
    vec![
        Domain {
            name: "Data Sovereignty".to_string(),
            key: "ds".to_string(),
            description: "Control over where data is stored and processed, who can access it, and who holds the encryption keys.".to_string(),
            questions: vec![
                question(
                    "ds1",
                    "Must sensitive data be stored and processed exclusively within a specific jurisdiction?",
                    "Residency obligations commonly stem from GDPR, national privacy law, or sector regulators.",
                ),
                question(
                    "ds2",
                    "Do you require sole control of encryption keys (BYOK/HYOK) for data held by external providers?",
                    "Holding your own keys prevents a provider from being compelled to hand over readable data.",
                ),
                question(
                    "ds3",
                    "Must you prevent foreign authorities from compelling access to your data under extraterritorial laws?",
                    "Laws such as the US CLOUD Act can reach data held by providers headquartered abroad.",
                ),
            ],
        },
        Domain {
            name: "Technical Sovereignty".to_string(),
            key: "ts".to_string(),
            description: "Freedom to choose, change, and run technology without depending on a single vendor's proprietary stack.".to_string(),
            questions: vec![
                question(
                    "ts1",
                    "Is avoiding lock-in to a single cloud or platform vendor a strategic requirement?",
                    "Lock-in raises switching costs and weakens negotiating leverage.",
                ),
                question(
                    "ts2",
                    "Do workloads need to run portably across on-premises, private, and public cloud environments?",
                    "Containers and open standards keep workloads portable across infrastructure.",
                ),
                question(
                    "ts3",
                    "Must you be able to inspect, modify, or audit the source code of critical software?",
                    "Source access underpins independent security review and long-term maintainability.",
                ),
            ],
        },
        Domain {
            name: "Operational Sovereignty".to_string(),
            key: "os".to_string(),
            description: "Ability to operate, maintain, and recover critical systems independently of external parties.".to_string(),
            questions: vec![
                question(
                    "os1",
                    "Must critical systems stay operable if an external provider withdraws service or access?",
                    "Consider sanctions, trade restrictions, or a provider leaving your market.",
                ),
                question(
                    "os2",
                    "Must critical infrastructure be administered only by vetted, locally resident personnel?",
                    "Some regulators require operations staff to hold local residency or security clearance.",
                ),
                question(
                    "os3",
                    "Do you need tested recovery plans covering geopolitical or supply chain disruption?",
                    "Continuity plans often overlook provider-level and cross-border failure scenarios.",
                ),
            ],
        },
        Domain {
            name: "Assurance Sovereignty".to_string(),
            key: "as".to_string(),
            description: "Independent verification that controls, certifications, and audit rights meet regulatory obligations.".to_string(),
            questions: vec![
                question(
                    "as1",
                    "Do regulators require independent audit rights over the platforms hosting your workloads?",
                    "Financial and public sector regulators frequently mandate direct audit access.",
                ),
                question(
                    "as2",
                    "Must providers hold national security certifications such as SecNumCloud, C5, or ENS?",
                    "National schemes certify providers against sovereignty-specific criteria.",
                ),
                question(
                    "as3",
                    "Must security logs and monitoring data remain under your exclusive control?",
                    "Logs reveal system activity and are often sensitive data in their own right.",
                ),
            ],
        },
        Domain {
            name: "Open Source".to_string(),
            key: "oss".to_string(),
            description: "Use of and contribution to open source software as a foundation for transparency and independence.".to_string(),
            questions: vec![
                question(
                    "oss1",
                    "Does your organization have a policy favouring open source software for critical workloads?",
                    "A formal policy signals intent and guides procurement decisions.",
                ),
                question(
                    "oss2",
                    "Do you require commercial support and security maintenance for the open source software you run?",
                    "Supported distributions provide patch guarantees and lifecycle commitments.",
                ),
                question(
                    "oss3",
                    "Does your organization contribute to or help govern strategic open source projects?",
                    "Participation gives influence over the roadmaps you depend on.",
                ),
            ],
        },
        Domain {
            name: "Executive Oversight".to_string(),
            key: "eo".to_string(),
            description: "Leadership accountability, strategy, and funding for digital sovereignty initiatives.".to_string(),
            questions: vec![
                question(
                    "eo1",
                    "Is digital sovereignty an explicit item on the executive or board agenda?",
                    "Board visibility is a prerequisite for sustained investment.",
                ),
                question(
                    "eo2",
                    "Is a named executive sponsor accountable for sovereignty and vendor risk?",
                    "Clear ownership turns policy into funded, tracked initiatives.",
                ),
                question(
                    "eo3",
                    "Has budget been allocated to sovereignty initiatives in the current planning cycle?",
                    "Dedicated funding separates stated priorities from real ones.",
                ),
            ],
        },
        Domain {
            name: "Managed Services".to_string(),
            key: "ms".to_string(),
            description: "Sovereignty controls over third-party managed and outsourced services.".to_string(),
            questions: vec![
                question(
                    "ms1",
                    "Do managed service providers hold privileged access to your environment?",
                    "Privileged provider access extends your trust boundary to their staff and jurisdiction.",
                ),
                question(
                    "ms2",
                    "Must managed services be delivered by providers established and operated in your jurisdiction?",
                    "Local establishment limits exposure to foreign legal orders.",
                ),
                question(
                    "ms3",
                    "Do contracts include exit provisions guaranteeing data and workload portability?",
                    "Exit clauses keep switching providers a realistic option.",
                ),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG_CSV: &str = "\
domain,domain_key,domain_description,id,text,tooltip
Data Sovereignty,ds,Where data lives,ds1,Residency required?,GDPR
Data Sovereignty,ds,,ds2,Own the keys?,
Open Source,oss,Open source use,oss1,Open source policy?,Procurement
";

    #[test]
    fn reference_catalog_is_consistent() {
        let standard = QuestionCatalog::standard();
        let validated =
            QuestionCatalog::new(standard.domains().to_vec()).expect("reference catalog validates");

        assert_eq!(validated.domains().len(), 7);
        assert_eq!(validated.question_count(), 21);
        assert_eq!(validated.max_score(), 21);
        assert!(validated.domains().iter().all(|d| d.max_score() == 3));
        validated
            .ensure_max_score(21)
            .expect("reference catalog totals 21 points");
    }

    #[test]
    fn index_locates_questions_in_catalog_order() {
        let catalog = QuestionCatalog::standard();

        let location = catalog.locate("oss2").expect("oss2 indexed");
        assert_eq!(
            location,
            QuestionLocation {
                domain: 4,
                question: 1
            }
        );
        let (domain, question) = catalog.question(location).expect("question resolves");
        assert_eq!(domain.name, "Open Source");
        assert_eq!(question.id, "oss2");
        assert!(catalog.locate("ds9").is_none());
    }

    #[test]
    fn csv_catalog_groups_rows_by_domain() {
        let catalog =
            QuestionCatalog::from_csv_reader(CATALOG_CSV.as_bytes()).expect("catalog parses");

        let names: Vec<_> = catalog.domain_names().collect();
        assert_eq!(names, vec!["Data Sovereignty", "Open Source"]);
        assert_eq!(catalog.max_score(), 3);
        let ds = &catalog.domains()[0];
        assert_eq!(ds.description, "Where data lives");
        assert_eq!(ds.questions[1].tooltip, None);
        assert_eq!(ds.questions[0].tooltip.as_deref(), Some("GDPR"));
    }

    #[test]
    fn max_score_mismatch_is_reported() {
        let catalog =
            QuestionCatalog::from_csv_reader(CATALOG_CSV.as_bytes()).expect("catalog parses");

        match catalog.ensure_max_score(21) {
            Err(CatalogError::MaxScoreMismatch {
                catalog: 3,
                configured: 21,
            }) => {}
            other => panic!("expected max score mismatch, got {other:?}"),
        }
    }

    #[test]
    fn rejects_ids_outside_domain_prefix() {
        let mut domains = QuestionCatalog::standard().domains().to_vec();
        domains[1].questions[0].id = "ds7".to_string();

        match QuestionCatalog::new(domains) {
            Err(CatalogError::MalformedQuestionId { id, domain_key }) => {
                assert_eq!(id, "ds7");
                assert_eq!(domain_key, "ts");
            }
            other => panic!("expected malformed id, got {other:?}"),
        }
    }

    #[test]
    fn rejects_duplicate_ids_and_domains() {
        let mut domains = QuestionCatalog::standard().domains().to_vec();
        domains[0].questions[1].id = "ds1".to_string();
        assert!(matches!(
            QuestionCatalog::new(domains),
            Err(CatalogError::DuplicateQuestion(id)) if id == "ds1"
        ));

        let mut domains = QuestionCatalog::standard().domains().to_vec();
        domains[2].name = "Data Sovereignty".to_string();
        assert!(matches!(
            QuestionCatalog::new(domains),
            Err(CatalogError::DuplicateDomain(_))
        ));
    }

    #[test]
    fn open_source_ids_are_not_claimed_by_operational_prefix() {
        let catalog = QuestionCatalog::standard();
        let operational = &catalog.domains()[2];
        assert_eq!(operational.key, "os");
        assert!(!operational.owns_id("oss1"));
        assert!(operational.owns_id("os12"));
        assert!(!operational.owns_id("os"));
    }
}
