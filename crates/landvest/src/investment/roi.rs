use serde::{Deserialize, Serialize};

use super::grade::{GradePolicy, InvestmentGrade};

/// Share of development spend assumed to convert into added site value.
pub const DEVELOPMENT_VALUE_CAPTURE: f64 = 0.7;

/// Purchase and development parameters collected by the ROI calculator form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoiInputs {
    pub purchase_price: f64,
    pub development_cost: f64,
    pub planning_cost: f64,
    pub professional_fees: f64,
    pub holding_period_months: i32,
    pub expected_annual_growth_percent: f64,
}

impl RoiInputs {
    pub fn total_investment(&self) -> f64 {
        self.purchase_price + self.development_cost + self.planning_cost + self.professional_fees
    }

    /// Simple pro-rated growth over the holding period. Not compounded.
    pub fn growth_multiplier(&self) -> f64 {
        1.0 + (self.expected_annual_growth_percent / 100.0)
            * (f64::from(self.holding_period_months) / 12.0)
    }

    fn validate(&self) -> Result<(), EstimateError> {
        let amounts = [
            ("purchase_price", self.purchase_price),
            ("development_cost", self.development_cost),
            ("planning_cost", self.planning_cost),
            ("professional_fees", self.professional_fees),
        ];
        for (field, value) in amounts {
            if !value.is_finite() {
                return Err(EstimateError::NonFinite { field });
            }
            if value < 0.0 {
                return Err(EstimateError::NegativeAmount { field, value });
            }
        }

        if !self.expected_annual_growth_percent.is_finite() {
            return Err(EstimateError::NonFinite {
                field: "expected_annual_growth_percent",
            });
        }

        if self.holding_period_months <= 0 {
            return Err(EstimateError::InvalidHoldingPeriod(
                self.holding_period_months,
            ));
        }

        Ok(())
    }
}

/// Caller errors. Every variant is an invalid argument; none are retried.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EstimateError {
    #[error("{field} must not be negative (got {value})")]
    NegativeAmount { field: &'static str, value: f64 },
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },
    #[error("holding period must be at least one month (got {0})")]
    InvalidHoldingPeriod(i32),
    #[error("inputs are too large to produce a finite {0}")]
    Overflow(&'static str),
}

/// Why a metric could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndefinedReason {
    ZeroInvestment,
    NonPositiveValueRatio,
    NeverBreaksEven,
    NonFinite,
}

impl UndefinedReason {
    pub const fn describe(self) -> &'static str {
        match self {
            Self::ZeroInvestment => "no capital invested",
            Self::NonPositiveValueRatio => "projected value is not positive",
            Self::NeverBreaksEven => "investment never breaks even",
            Self::NonFinite => "result is not a finite number",
        }
    }
}

/// A metric that is either a real value or explicitly undefined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Estimate<T> {
    Defined(T),
    Undefined(UndefinedReason),
}

impl<T: Copy> Estimate<T> {
    pub fn value(&self) -> Option<T> {
        match self {
            Self::Defined(value) => Some(*value),
            Self::Undefined(_) => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, Self::Defined(_))
    }
}

impl Estimate<f64> {
    fn finite(value: f64) -> Self {
        if value.is_finite() {
            Self::Defined(value)
        } else {
            Self::Undefined(UndefinedReason::NonFinite)
        }
    }
}

/// Projected metrics for one set of inputs. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimateResult {
    pub total_investment: f64,
    pub growth_multiplier: f64,
    pub expected_value: f64,
    pub net_profit: f64,
    pub roi_percent: Estimate<f64>,
    pub annualized_return_percent: Estimate<f64>,
    pub break_even_months: Estimate<u32>,
    pub investment_grade: InvestmentGrade,
}

/// Stateless ROI calculator. Identical inputs always give identical results.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoiEstimator {
    policy: GradePolicy,
}

impl RoiEstimator {
    pub fn new(policy: GradePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> GradePolicy {
        self.policy
    }

    pub fn estimate(&self, inputs: &RoiInputs) -> Result<EstimateResult, EstimateError> {
        self.estimate_with_risk(inputs, None)
    }

    /// Same as [`estimate`](Self::estimate), letting a risk score feed the grade policy.
    pub fn estimate_with_risk(
        &self,
        inputs: &RoiInputs,
        risk_score: Option<u8>,
    ) -> Result<EstimateResult, EstimateError> {
        inputs.validate()?;

        let total_investment = inputs.total_investment();
        let growth_multiplier = inputs.growth_multiplier();
        let expected_value = inputs.purchase_price * growth_multiplier
            + inputs.development_cost * DEVELOPMENT_VALUE_CAPTURE;
        let net_profit = expected_value - total_investment;

        for (name, value) in [
            ("total investment", total_investment),
            ("expected value", expected_value),
            ("net profit", net_profit),
        ] {
            if !value.is_finite() {
                return Err(EstimateError::Overflow(name));
            }
        }

        let months = f64::from(inputs.holding_period_months);

        let roi_percent = if total_investment == 0.0 {
            Estimate::Undefined(UndefinedReason::ZeroInvestment)
        } else {
            Estimate::finite(net_profit / total_investment * 100.0)
        };

        let annualized_return_percent = if total_investment == 0.0 {
            Estimate::Undefined(UndefinedReason::ZeroInvestment)
        } else {
            let ratio = expected_value / total_investment;
            if ratio <= 0.0 {
                Estimate::Undefined(UndefinedReason::NonPositiveValueRatio)
            } else {
                Estimate::finite((ratio.powf(12.0 / months) - 1.0) * 100.0)
            }
        };

        let break_even_months = if net_profit <= 0.0 {
            Estimate::Undefined(UndefinedReason::NeverBreaksEven)
        } else {
            let raw = total_investment / (net_profit / months);
            if raw.is_finite() {
                Estimate::Defined(raw.round().clamp(0.0, f64::from(u32::MAX)) as u32)
            } else {
                Estimate::Undefined(UndefinedReason::NonFinite)
            }
        };

        let investment_grade = self.policy.grade(roi_percent.value(), risk_score);

        Ok(EstimateResult {
            total_investment,
            growth_multiplier,
            expected_value,
            net_profit,
            roi_percent,
            annualized_return_percent,
            break_even_months,
            investment_grade,
        })
    }
}
