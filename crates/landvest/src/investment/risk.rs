use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse risk band shown on listings and dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const MEDIUM_FROM: u8 = 30;
    pub const HIGH_FROM: u8 = 60;

    pub fn from_score(score: u8) -> Self {
        if score < Self::MEDIUM_FROM {
            Self::Low
        } else if score < Self::HIGH_FROM {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" | "med" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One assessed category of site risk. Scores are supplied, not predicted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub category: String,
    pub level: RiskLevel,
    pub score: u8,
    pub details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mitigation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RiskError {
    #[error("at least one risk factor is required")]
    NoFactors,
    #[error("risk factor '{category}' has score {score}, expected 0-100")]
    ScoreOutOfRange { category: String, score: u8 },
}

/// Aggregate view rendered by the risk dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskSummary {
    pub overall_score: u8,
    pub overall_level: RiskLevel,
    pub factors: Vec<RiskFactor>,
    pub mitigations: Vec<String>,
}

impl RiskSummary {
    pub fn from_factors(factors: Vec<RiskFactor>) -> Result<Self, RiskError> {
        if factors.is_empty() {
            return Err(RiskError::NoFactors);
        }

        if let Some(factor) = factors.iter().find(|factor| factor.score > 100) {
            return Err(RiskError::ScoreOutOfRange {
                category: factor.category.clone(),
                score: factor.score,
            });
        }

        let total: u32 = factors.iter().map(|factor| u32::from(factor.score)).sum();
        let count = factors.len() as f64;
        let overall_score = (f64::from(total) / count).round() as u8;

        let mitigations = factors
            .iter()
            .filter_map(|factor| factor.mitigation.clone())
            .collect();

        Ok(Self {
            overall_score,
            overall_level: RiskLevel::from_score(overall_score),
            factors,
            mitigations,
        })
    }

    /// Factors at or above the given band, highest score first.
    pub fn concerns(&self, at_least: RiskLevel) -> Vec<&RiskFactor> {
        let mut concerns: Vec<&RiskFactor> = self
            .factors
            .iter()
            .filter(|factor| factor.level >= at_least)
            .collect();
        concerns.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.category.cmp(&b.category)));
        concerns
    }
}

/// Baseline site profile used until a real scoring service is wired in.
pub fn default_site_profile() -> Vec<RiskFactor> {
    let factor = |category: &str, level, score, details: &str, mitigation: &str| RiskFactor {
        category: category.to_string(),
        level,
        score,
        details: details.to_string(),
        mitigation: Some(mitigation.to_string()),
    };

    vec![
        factor(
            "Flood Risk",
            RiskLevel::Low,
            15,
            "Flood Zone 1, very low probability of flooding",
            "Standard insurance coverage recommended",
        ),
        factor(
            "Planning Risk",
            RiskLevel::Medium,
            45,
            "Conservation area restrictions require additional approvals",
            "Engage heritage consultant early in planning process",
        ),
        factor(
            "Contamination",
            RiskLevel::Low,
            20,
            "No historical industrial use recorded on site",
            "Phase 1 environmental assessment recommended",
        ),
        factor(
            "Access Rights",
            RiskLevel::Medium,
            40,
            "Shared access road requires easement agreement",
            "Legal review of access rights needed before purchase",
        ),
        factor(
            "Infrastructure",
            RiskLevel::Low,
            25,
            "All utilities available at site boundary",
            "Confirm capacity with utility providers",
        ),
        factor(
            "Market Risk",
            RiskLevel::Low,
            30,
            "Strong regional demand driven by rail investment",
            "Monitor market conditions quarterly",
        ),
        factor(
            "Environmental",
            RiskLevel::Low,
            20,
            "No protected species or habitats identified",
            "Ecological survey recommended pre-development",
        ),
        factor(
            "Legal Title",
            RiskLevel::Low,
            10,
            "Clear freehold title with no restrictions",
            "Standard conveyancing process",
        ),
    ]
}
