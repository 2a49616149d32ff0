use serde::{Deserialize, Serialize};
use std::fmt;

/// Letter rating summarising projected return quality. `A` is best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InvestmentGrade {
    A,
    B,
    C,
    D,
    F,
}

impl InvestmentGrade {
    /// ROI strictly above this earns an `A`.
    pub const A_THRESHOLD: f64 = 50.0;
    pub const B_THRESHOLD: f64 = 30.0;
    pub const C_THRESHOLD: f64 = 15.0;

    /// Grade from ROI alone. Never yields `F`.
    pub fn from_roi(roi_percent: f64) -> Self {
        if roi_percent > Self::A_THRESHOLD {
            Self::A
        } else if roi_percent > Self::B_THRESHOLD {
            Self::B
        } else if roi_percent > Self::C_THRESHOLD {
            Self::C
        } else {
            Self::D
        }
    }

    pub const fn letter(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::A => "Excellent",
            Self::B => "Good",
            Self::C => "Fair",
            Self::D => "Poor",
            Self::F => "Avoid",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            "C" => Some(Self::C),
            "D" => Some(Self::D),
            "F" => Some(Self::F),
            _ => None,
        }
    }
}

impl fmt::Display for InvestmentGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter())
    }
}

/// Grading rules applied by the estimator.
///
/// With no threshold configured the grade is a pure function of ROI and only
/// `A` through `D` are produced. A threshold lets a qualitative risk score force
/// `F` independently of the projected return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradePolicy {
    pub risk_override_threshold: Option<u8>,
}

impl GradePolicy {
    pub fn grade(&self, roi_percent: Option<f64>, risk_score: Option<u8>) -> InvestmentGrade {
        if let (Some(threshold), Some(score)) = (self.risk_override_threshold, risk_score) {
            if score >= threshold {
                return InvestmentGrade::F;
            }
        }

        match roi_percent {
            Some(roi) => InvestmentGrade::from_roi(roi),
            None => InvestmentGrade::D,
        }
    }
}
