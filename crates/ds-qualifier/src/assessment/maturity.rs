use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaturityTier {
    Foundation,
    Developing,
    Strategic,
    Advanced,
}

impl MaturityTier {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Foundation,
            Self::Developing,
            Self::Strategic,
            Self::Advanced,
        ]
    }

    /// Tier for a composite score on the `0..=global_max` scale, split into
    /// quarters with each upper bound inclusive.
    pub fn for_composite(score: f64, global_max: u32) -> Self {
        let max = f64::from(global_max);
        if score <= max * 0.25 {
            Self::Foundation
        } else if score <= max * 0.5 {
            Self::Developing
        } else if score <= max * 0.75 {
            Self::Strategic
        } else {
            Self::Advanced
        }
    }

    /// Tier for a single domain percentage (0..=100).
    ///
    /// Only an exact zero is Foundation; the remaining range splits at 33 and
    /// 67, unlike the quarter split of [`MaturityTier::for_composite`].
    pub fn for_domain_percentage(percentage: f64) -> Self {
        if percentage <= 0.0 {
            Self::Foundation
        } else if percentage <= 33.0 {
            Self::Developing
        } else if percentage <= 67.0 {
            Self::Strategic
        } else {
            Self::Advanced
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Foundation => "Foundation",
            Self::Developing => "Developing",
            Self::Strategic => "Strategic",
            Self::Advanced => "Advanced",
        }
    }

    pub const fn headline(self) -> &'static str {
        match self {
            Self::Foundation => "Foundation Level",
            Self::Developing => "Developing Level",
            Self::Strategic => "Strategic Level",
            Self::Advanced => "Advanced Level",
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            Self::Foundation => "#c9190b",
            Self::Developing => "#ec7a08",
            Self::Strategic => "#f0ab00",
            Self::Advanced => "#2aaa04",
        }
    }

    pub const fn icon(self) -> &'static str {
        match self {
            Self::Foundation => "fa-seedling",
            Self::Developing => "fa-arrow-trend-up",
            Self::Strategic => "fa-chart-line",
            Self::Advanced => "fa-shield-halved",
        }
    }

    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Foundation => "maturity-foundation",
            Self::Developing => "maturity-developing",
            Self::Strategic => "maturity-strategic",
            Self::Advanced => "maturity-advanced",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Foundation => "Your organization is in the early stages of digital sovereignty. Significant opportunities exist to strengthen capabilities across multiple domains and reduce dependencies on external providers.",
            Self::Developing => "Your organization is actively building digital sovereignty capabilities and making progress. Continue developing your foundational controls and addressing gaps to move toward strategic maturity.",
            Self::Strategic => "Your organization has established strong digital sovereignty capabilities across most domains. Focus on closing remaining gaps and optimizing existing controls to achieve advanced maturity.",
            Self::Advanced => "Your organization demonstrates comprehensive digital sovereignty capabilities across all domains. Continue maintaining excellence and stay ahead of evolving regulatory and geopolitical requirements.",
        }
    }

    pub fn badge(self) -> MaturityBadge {
        MaturityBadge {
            tier: self,
            label: self.label(),
            headline: self.headline(),
            color: self.color(),
            icon: self.icon(),
            css_class: self.css_class(),
            description: self.description(),
        }
    }
}

/// Presentation tokens of a tier, used verbatim by renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MaturityBadge {
    pub tier: MaturityTier,
    pub label: &'static str,
    pub headline: &'static str,
    pub color: &'static str,
    pub icon: &'static str,
    pub css_class: &'static str,
    pub description: &'static str,
}
