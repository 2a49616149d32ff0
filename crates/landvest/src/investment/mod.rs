//! Investment metrics: the ROI estimator, grading policy, and the risk and
//! portfolio summaries behind the dashboard pages.

pub mod grade;
pub mod portfolio;
pub mod risk;
pub mod roi;
pub mod router;

pub use grade::{GradePolicy, InvestmentGrade};
pub use portfolio::{
    HoldingPerformance, PortfolioError, PortfolioHolding, PortfolioSummary, MAX_AMOUNT,
};
pub use risk::{default_site_profile, RiskError, RiskFactor, RiskLevel, RiskSummary};
pub use roi::{
    Estimate, EstimateError, EstimateResult, RoiEstimator, RoiInputs, UndefinedReason,
    DEVELOPMENT_VALUE_CAPTURE,
};
pub use router::investment_router;
