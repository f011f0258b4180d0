use super::maturity::MaturityTier;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActionItem {
    pub title: &'static str,
    pub detail: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SupportingList {
    pub heading: &'static str,
    pub items: &'static [&'static str],
}

/// Static recommended-action content for one maturity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecommendedActions {
    pub tier: MaturityTier,
    pub heading: &'static str,
    pub intro: &'static str,
    pub actions: &'static [ActionItem],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supporting: Option<SupportingList>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<&'static str>,
}

pub fn recommended_actions(tier: MaturityTier) -> &'static RecommendedActions {
    match tier {
        MaturityTier::Foundation => &FOUNDATION,
        MaturityTier::Developing => &DEVELOPING,
        MaturityTier::Strategic => &STRATEGIC,
        MaturityTier::Advanced => &ADVANCED,
    }
}

static FOUNDATION: RecommendedActions = RecommendedActions {
    tier: MaturityTier::Foundation,
    heading: "Priority Actions for Foundation Level",
    intro: "Your organization is in the early stages of digital sovereignty. Focus on building foundational capabilities:",
    actions: &[
        ActionItem {
            title: "Assess Current State",
            detail: "Conduct detailed inventory of data locations, vendor dependencies, and compliance requirements",
        },
        ActionItem {
            title: "Define Strategy",
            detail: "Develop a digital sovereignty roadmap aligned with your business objectives and regulatory obligations",
        },
        ActionItem {
            title: "Establish Governance",
            detail: "Create executive sponsorship and steering committee for sovereignty initiatives",
        },
        ActionItem {
            title: "Address Quick Wins",
            detail: "Implement encryption key management (BYOK/HYOK) and data residency controls",
        },
        ActionItem {
            title: "Build Expertise",
            detail: "Train technical teams on sovereign technologies and compliance frameworks",
        },
        ActionItem {
            title: "Evaluate Solutions",
            detail: "Research open-source and sovereign-ready platforms that reduce vendor lock-in",
        },
    ],
    supporting: Some(SupportingList {
        heading: "Recommended Focus Areas",
        items: &[
            "Data sovereignty and encryption controls",
            "Open-source adoption strategy",
            "Compliance framework alignment (GDPR, NIS2, etc.)",
            "Vendor risk assessment and diversification",
        ],
    }),
    note: None,
};

static DEVELOPING: RecommendedActions = RecommendedActions {
    tier: MaturityTier::Developing,
    heading: "Advancement Actions for Developing Level",
    intro: "Your organization is making progress building digital sovereignty capabilities. Continue your momentum:",
    actions: &[
        ActionItem {
            title: "Strengthen Foundations",
            detail: "Solidify controls in domains where you scored lowest (0-1 points)",
        },
        ActionItem {
            title: "Implement Standards",
            detail: "Adopt open standards and containerization to improve portability",
        },
        ActionItem {
            title: "Enhance Data Controls",
            detail: "Ensure all sensitive data has proper residency and encryption controls",
        },
        ActionItem {
            title: "Build Resilience",
            detail: "Develop disaster recovery and business continuity plans for geopolitical scenarios",
        },
        ActionItem {
            title: "Expand Expertise",
            detail: "Grow in-house technical capabilities for managing sovereign infrastructure",
        },
        ActionItem {
            title: "Document Policies",
            detail: "Create formal policies for open-source adoption and vendor selection",
        },
    ],
    supporting: Some(SupportingList {
        heading: "Recommended Focus Areas",
        items: &[
            "Cloud platform portability and migration testing",
            "Security log sovereignty and audit controls",
            "Operational independence from external providers",
            "Executive alignment and budget allocation",
        ],
    }),
    note: None,
};

static STRATEGIC: RecommendedActions = RecommendedActions {
    tier: MaturityTier::Strategic,
    heading: "Growth Actions for Strategic Level",
    intro: "Your organization has established strong capabilities. Continue building momentum:",
    actions: &[
        ActionItem {
            title: "Close Remaining Gaps",
            detail: "Address specific weaknesses identified in lower-scoring domains",
        },
        ActionItem {
            title: "Enhance Portability",
            detail: "Migrate workloads to open standards and test cloud portability",
        },
        ActionItem {
            title: "Strengthen Controls",
            detail: "Implement advanced monitoring, audit rights, and security log sovereignty",
        },
        ActionItem {
            title: "Expand Open Source",
            detail: "Increase use of open-source software and participate in strategic projects",
        },
        ActionItem {
            title: "Test Resilience",
            detail: "Validate disaster recovery plans and operational independence from cloud providers",
        },
        ActionItem {
            title: "Pursue Certifications",
            detail: "Obtain national security certifications (NIS2, SecNumCloud, etc.)",
        },
    ],
    supporting: Some(SupportingList {
        heading: "Recommended Resources",
        items: &[
            "Digital Sovereignty best practices and frameworks",
            "Cloud migration and portability guides",
            "National certification requirements documentation",
            "Open-source governance policies",
        ],
    }),
    note: None,
};

static ADVANCED: RecommendedActions = RecommendedActions {
    tier: MaturityTier::Advanced,
    heading: "Optimization Actions for Advanced Level",
    intro: "Your organization demonstrates strong sovereignty capabilities. Maintain and enhance your position:",
    actions: &[
        ActionItem {
            title: "Maintain Excellence",
            detail: "Continuously monitor and update sovereignty controls as regulations evolve",
        },
        ActionItem {
            title: "Share Knowledge",
            detail: "Document and share best practices internally and with industry peers",
        },
        ActionItem {
            title: "Lead Innovation",
            detail: "Contribute to open-source projects and influence sovereignty standards",
        },
        ActionItem {
            title: "Expand Scope",
            detail: "Apply sovereignty principles to emerging technologies (AI, edge computing, IoT)",
        },
        ActionItem {
            title: "Regular Validation",
            detail: "Conduct periodic audits and re-certifications to maintain compliance",
        },
        ActionItem {
            title: "Stay Informed",
            detail: "Monitor geopolitical changes and emerging regulations that may impact your strategy",
        },
    ],
    supporting: None,
    note: Some("Digital sovereignty is a continuous journey. Regulations and threats evolve, requiring ongoing attention and investment to maintain your advanced posture."),
};
