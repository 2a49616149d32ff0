use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::roi::{Estimate, UndefinedReason};

/// A parcel the investor already owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioHolding {
    pub listing_id: String,
    pub title: String,
    pub purchase_price: u64,
    pub current_value: u64,
    pub purchase_date: NaiveDate,
}

impl PortfolioHolding {
    /// Saturates rather than wrapping; [`PortfolioSummary::build`] rejects
    /// amounts that would need it.
    pub fn profit(&self) -> i64 {
        signed_difference(self.current_value, self.purchase_price)
    }

    fn check_range(&self) -> Result<(), PortfolioError> {
        if self.purchase_price > MAX_AMOUNT || self.current_value > MAX_AMOUNT {
            return Err(PortfolioError::AmountOutOfRange {
                listing_id: self.listing_id.clone(),
            });
        }
        Ok(())
    }

    pub fn growth_percent(&self) -> Estimate<f64> {
        growth(self.purchase_price, self.profit())
    }
}

/// Largest purchase price or valuation a holding may carry.
pub const MAX_AMOUNT: u64 = i64::MAX as u64;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortfolioError {
    #[error("holding {listing_id} has an amount above {}", MAX_AMOUNT)]
    AmountOutOfRange { listing_id: String },
    #[error("portfolio totals exceed {}", MAX_AMOUNT)]
    TotalOutOfRange,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoldingPerformance {
    pub listing_id: String,
    pub title: String,
    pub purchase_price: u64,
    pub current_value: u64,
    pub profit: i64,
    pub growth_percent: Estimate<f64>,
    pub months_held: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub total_value: u64,
    pub total_invested: u64,
    pub total_return: i64,
    pub total_growth_percent: Estimate<f64>,
    pub best_performer: Option<String>,
    pub worst_performer: Option<String>,
    pub holdings: Vec<HoldingPerformance>,
}

impl PortfolioSummary {
    /// Summarise holdings as of `today`; holding periods count whole calendar
    /// months.
    pub fn build(holdings: &[PortfolioHolding], today: NaiveDate) -> Result<Self, PortfolioError> {
        let mut total_value: u64 = 0;
        let mut total_invested: u64 = 0;
        for holding in holdings {
            holding.check_range()?;
            total_value = checked_total(total_value, holding.current_value)?;
            total_invested = checked_total(total_invested, holding.purchase_price)?;
        }
        let total_return = signed_difference(total_value, total_invested);

        let performance: Vec<HoldingPerformance> = holdings
            .iter()
            .map(|holding| HoldingPerformance {
                listing_id: holding.listing_id.clone(),
                title: holding.title.clone(),
                purchase_price: holding.purchase_price,
                current_value: holding.current_value,
                profit: holding.profit(),
                growth_percent: holding.growth_percent(),
                months_held: months_between(holding.purchase_date, today),
            })
            .collect();

        let ranked: Vec<(&HoldingPerformance, f64)> = performance
            .iter()
            .filter_map(|entry| entry.growth_percent.value().map(|growth| (entry, growth)))
            .collect();

        let best_performer = ranked
            .iter()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(entry, _)| entry.title.clone());
        let worst_performer = ranked
            .iter()
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(entry, _)| entry.title.clone());

        Ok(Self {
            total_value,
            total_invested,
            total_return,
            total_growth_percent: growth(total_invested, total_return),
            best_performer,
            worst_performer,
            holdings: performance,
        })
    }

    pub fn average_months_held(&self) -> Option<f64> {
        if self.holdings.is_empty() {
            return None;
        }
        let total: u64 = self
            .holdings
            .iter()
            .map(|entry| u64::from(entry.months_held))
            .sum();
        Some(total as f64 / self.holdings.len() as f64)
    }
}

fn growth(invested: u64, profit: i64) -> Estimate<f64> {
    if invested == 0 {
        Estimate::Undefined(UndefinedReason::ZeroInvestment)
    } else {
        Estimate::Defined(profit as f64 / invested as f64 * 100.0)
    }
}

fn checked_total(total: u64, amount: u64) -> Result<u64, PortfolioError> {
    total
        .checked_add(amount)
        .filter(|total| *total <= MAX_AMOUNT)
        .ok_or(PortfolioError::TotalOutOfRange)
}

fn signed_difference(minuend: u64, subtrahend: u64) -> i64 {
    let difference = i128::from(minuend) - i128::from(subtrahend);
    i64::try_from(difference).unwrap_or(if difference < 0 { i64::MIN } else { i64::MAX })
}

fn months_between(from: NaiveDate, to: NaiveDate) -> u32 {
    if to <= from {
        return 0;
    }
    let span = (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32;
    let mut months = u32::try_from(span).unwrap_or(0);
    while months > 0
        && from
            .checked_add_months(Months::new(months))
            .map_or(true, |anniversary| anniversary > to)
    {
        months -= 1;
    }
    months
}
