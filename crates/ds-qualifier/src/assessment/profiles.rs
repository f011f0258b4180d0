use super::catalog::{CatalogError, QuestionCatalog};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const BALANCED_PROFILE: &str = "balanced";
pub const CUSTOM_PROFILE: &str = "custom";

pub const MIN_WEIGHT: f64 = 1.0;
pub const MAX_WEIGHT: f64 = 2.0;

/// Named set of per-domain importance weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub key: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub weights: BTreeMap<String, f64>,
}

impl Profile {
    pub fn is_custom(&self) -> bool {
        self.key == CUSTOM_PROFILE
    }

    pub fn weight_for(&self, domain: &str) -> Option<f64> {
        self.weights.get(domain).copied()
    }
}

/// Ordered profile catalog. Always contains the balanced and custom profiles.
#[derive(Debug, Clone)]
pub struct ProfileCatalog {
    profiles: Vec<Profile>,
    balanced: usize,
}

impl ProfileCatalog {
    /// Validate profiles against the question catalog's domains.
    pub fn new(profiles: Vec<Profile>, questions: &QuestionCatalog) -> Result<Self, CatalogError> {
        validate_profiles(&profiles, questions)?;
        let balanced = profiles
            .iter()
            .position(|profile| profile.key == BALANCED_PROFILE)
            .ok_or(CatalogError::MissingProfile(BALANCED_PROFILE))?;
        Ok(Self { profiles, balanced })
    }

    /// Built-in industry profiles matching [`QuestionCatalog::standard`].
    pub fn standard() -> Self {
        let profiles = reference_profiles();
        let balanced = profiles
            .iter()
            .position(|profile| profile.key == BALANCED_PROFILE)
            .unwrap_or_default();
        Self { profiles, balanced }
    }

    pub fn from_json_path(
        path: impl AsRef<Path>,
        questions: &QuestionCatalog,
    ) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_reader(file, questions)
    }

    /// Load a JSON array of profiles.
    pub fn from_json_reader<R: Read>(
        reader: R,
        questions: &QuestionCatalog,
    ) -> Result<Self, CatalogError> {
        let profiles: Vec<Profile> = serde_json::from_reader(reader)?;
        Self::new(profiles, questions)
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn get(&self, key: &str) -> Option<&Profile> {
        self.profiles.iter().find(|profile| profile.key == key)
    }

    pub fn balanced(&self) -> &Profile {
        &self.profiles[self.balanced]
    }
}

fn validate_profiles(profiles: &[Profile], questions: &QuestionCatalog) -> Result<(), CatalogError> {
    let mut keys = HashSet::new();
    for profile in profiles {
        if !keys.insert(profile.key.as_str()) {
            return Err(CatalogError::DuplicateProfile(profile.key.clone()));
        }

        for domain in questions.domain_names() {
            let weight = profile
                .weight_for(domain)
                .ok_or_else(|| CatalogError::MissingWeight {
                    profile: profile.key.clone(),
                    domain: domain.to_string(),
                })?;
            if !(MIN_WEIGHT..=MAX_WEIGHT).contains(&weight) {
                return Err(CatalogError::WeightOutOfRange {
                    profile: profile.key.clone(),
                    domain: domain.to_string(),
                    weight,
                });
            }
            if profile.key == BALANCED_PROFILE && weight != MIN_WEIGHT {
                return Err(CatalogError::UnbalancedBaseline {
                    domain: domain.to_string(),
                    weight,
                });
            }
        }

        if let Some(extra) = profile
            .weights
            .keys()
            .find(|domain| questions.locate_domain(domain).is_none())
        {
            return Err(CatalogError::UnknownWeightDomain {
                profile: profile.key.clone(),
                domain: extra.clone(),
            });
        }
    }

    for required in [BALANCED_PROFILE, CUSTOM_PROFILE] {
        if !keys.contains(required) {
            return Err(CatalogError::MissingProfile(required));
        }
    }

    Ok(())
}

const DOMAINS: [&str; 7] = [
    "Data Sovereignty",
    "Technical Sovereignty",
    "Operational Sovereignty",
    "Assurance Sovereignty",
    "Open Source",
    "Executive Oversight",
    "Managed Services",
];

fn profile(key: &str, name: &str, icon: &str, description: &str, weights: [f64; 7]) -> Profile {
    Profile {
        key: key.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        weights: DOMAINS
            .iter()
            .zip(weights)
            .map(|(domain, weight)| (domain.to_string(), weight))
            .collect(),
    }
}

fn reference_profiles() -> Vec<Profile> {
    vec![
        profile(
            BALANCED_PROFILE,
            "Balanced",
            "fa-balance-scale",
            "Equal weighting across all domains - suitable for general assessments. This profile provides a comprehensive baseline evaluation without emphasizing any particular domain, making it ideal for organizations beginning their digital sovereignty journey or those without specific regulatory constraints.",
            [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
        ),
        profile(
            "financial",
            "Financial Services",
            "fa-building-columns",
            "Emphasizes data protection, compliance, and audit controls for banking and finance. Financial institutions face stringent regulatory requirements including PCI DSS, anti-money laundering laws, and data residency mandates that require demonstrable control over customer data and transaction records. Regulators increasingly demand independent audit rights and the ability to verify that financial data remains within approved jurisdictions.",
            [2.0, 1.0, 1.5, 2.0, 1.0, 1.5, 1.5],
        ),
        profile(
            "healthcare",
            "Healthcare",
            "fa-heart-pulse",
            "Focuses on patient data protection, operational resilience, and regulatory compliance. Healthcare organizations must safeguard sensitive patient information under HIPAA, GDPR, and local health data regulations while ensuring 24/7 availability of life-critical systems. The sector faces unique challenges balancing data sovereignty requirements with the need for cross-border medical research collaboration and emergency care coordination.",
            [2.0, 1.0, 2.0, 1.5, 1.0, 1.5, 1.5],
        ),
        profile(
            "government",
            "Government & Public Sector",
            "fa-landmark",
            "Comprehensive sovereignty across all domains for public sector organizations. Government agencies handle sensitive citizen data and critical national infrastructure, making digital sovereignty essential for national security and public trust. Regulations like NIS2, FedRAMP, and national cybersecurity frameworks mandate strict controls over data location, vendor access, and the ability to maintain operations during geopolitical disruptions or trade restrictions.",
            [2.0, 1.5, 1.5, 2.0, 1.5, 2.0, 1.5],
        ),
        profile(
            "technology",
            "Technology & SaaS",
            "fa-laptop-code",
            "Prioritizes technical independence, portability, and open source strategy. Technology companies must avoid vendor lock-in to maintain competitive agility and rapidly adapt to market changes. Building on open standards and contributing to open source communities enables faster innovation, reduces proprietary dependencies, and provides the flexibility to deploy across multiple cloud providers or migrate to new platforms as business needs evolve.",
            [1.5, 2.0, 1.5, 1.0, 2.0, 1.0, 1.5],
        ),
        profile(
            "manufacturing",
            "Manufacturing & Industrial",
            "fa-industry",
            "Emphasizes operational resilience, service continuity, and supply chain control. Manufacturing organizations depend on continuous production operations and just-in-time supply chains that cannot tolerate extended downtime. Protecting intellectual property in design and manufacturing processes is critical, while OT/IT convergence creates new sovereignty challenges as industrial control systems become increasingly cloud-connected and dependent on external service providers.",
            [1.5, 1.0, 2.0, 1.5, 1.0, 1.5, 2.0],
        ),
        profile(
            "telecommunications",
            "Telecommunications",
            "fa-tower-cell",
            "Focuses on infrastructure sovereignty, operational independence, and regulatory compliance. Telecommunications providers are designated as critical infrastructure under regulations like NIS2 and face heightened scrutiny over network security and data handling. Governments increasingly require telcos to ensure subscriber data and network management remain under national control, while maintaining 24/7 service availability and protecting against foreign surveillance or interference.",
            [2.0, 1.5, 2.0, 2.0, 1.0, 1.5, 1.5],
        ),
        profile(
            "energy",
            "Energy & Utilities",
            "fa-bolt",
            "Prioritizes critical infrastructure protection, operational resilience, and regulatory compliance. Energy and utility providers manage essential services where any disruption can have immediate public safety and economic consequences. As critical infrastructure operators under directives like NIS2 and NERC CIP, these organizations must demonstrate robust cybersecurity controls, protect SCADA and grid management systems from foreign interference, and maintain operational independence even during geopolitical crises.",
            [1.5, 1.5, 2.0, 2.0, 1.0, 1.5, 1.5],
        ),
        profile(
            CUSTOM_PROFILE,
            "Custom",
            "fa-sliders",
            "Set your own domain weightings to match your specific organizational priorities. Use the sliders below to adjust the importance of each domain based on your unique regulatory requirements, business model, risk profile, or strategic objectives. This allows you to create a tailored assessment that reflects your organization's specific digital sovereignty concerns and compliance obligations.",
            [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
        ),
    ]
}
