//! Investment domain models.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::constants::MIN_RETURN_PERCENTAGE;
use crate::{Error, Result};

/// How the principal was contributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentType {
    #[default]
    Single,
    Recurring,
}

/// Strategy bucket an investment belongs to.
///
/// The pool only informs simulation. Valuation compounds the admin-entered
/// monthly returns regardless of pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Pool {
    #[default]
    Base,
    Performance,
    Mixed,
}

impl Pool {
    /// Target monthly return rate of the pool, as a fraction (0.032 = 3.2%).
    pub fn target_monthly_rate(&self) -> Decimal {
        match self {
            Pool::Base => dec!(0.032),
            Pool::Performance => dec!(0.045),
            Pool::Mixed => dec!(0.038),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Pool::Base => "base",
            Pool::Performance => "performance",
            Pool::Mixed => "mixed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentStatus {
    #[default]
    Active,
    Withdrawn,
}

/// One admin-entered return for a calendar month of an investment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReturn {
    pub id: String,
    pub investment_id: String,
    /// Zero-padded `YYYY-MM`; unique within an investment.
    pub month: String,
    /// Signed percentage, `15` means +15%.
    pub return_percentage: Decimal,
    /// Only applied returns take part in valuation.
    pub applied: bool,
    pub created_at: NaiveDateTime,
}

/// Domain model representing an investment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    pub id: String,
    pub investor_id: String,
    /// Principal. Immutable after creation.
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub investment_type: InvestmentType,
    pub pool: Pool,
    /// Acquisition date.
    pub date: NaiveDate,
    pub status: InvestmentStatus,
    #[serde(default)]
    pub monthly_returns: Vec<MonthlyReturn>,
}

impl Investment {
    /// Month of acquisition in `YYYY-MM` form.
    pub fn acquisition_month(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }

    pub fn is_active(&self) -> bool {
        self.status == InvestmentStatus::Active
    }
}

/// Input model for creating a new investment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInvestment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub investor_id: String,
    pub amount: Decimal,
    #[serde(rename = "type", default)]
    pub investment_type: InvestmentType,
    #[serde(default)]
    pub pool: Pool,
    pub date: NaiveDate,
}

impl NewInvestment {
    /// Validates the new investment data.
    pub fn validate(&self) -> Result<()> {
        if self.investor_id.trim().is_empty() {
            return Err(Error::invalid_input("Investor id cannot be empty"));
        }
        if self.amount.is_sign_negative() {
            return Err(Error::invalid_input(format!(
                "Investment amount cannot be negative: {}",
                self.amount
            )));
        }
        Ok(())
    }
}

/// Input model for appending a monthly return to an investment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMonthlyReturn {
    pub investment_id: String,
    pub month: String,
    pub return_percentage: Decimal,
    /// New returns are staged unless explicitly applied.
    #[serde(default)]
    pub applied: bool,
}

impl NewMonthlyReturn {
    pub fn validate(&self) -> Result<()> {
        if self.investment_id.trim().is_empty() {
            return Err(Error::invalid_input("Investment id cannot be empty"));
        }
        if !is_valid_month(&self.month) {
            return Err(Error::invalid_input(format!(
                "Month must be formatted as YYYY-MM, got '{}'",
                self.month
            )));
        }
        if self.return_percentage < MIN_RETURN_PERCENTAGE {
            return Err(Error::invalid_input(format!(
                "Return percentage {} is below {}",
                self.return_percentage, MIN_RETURN_PERCENTAGE
            )));
        }
        Ok(())
    }
}

/// Checks the zero-padded `YYYY-MM` shape that makes lexicographic order
/// chronological.
pub fn is_valid_month(month: &str) -> bool {
    let bytes = month.as_bytes();
    if bytes.len() != 7 || bytes[4] != b'-' {
        return false;
    }
    if !bytes[..4].iter().chain(&bytes[5..]).all(u8::is_ascii_digit) {
        return false;
    }
    matches!(month[5..].parse::<u32>(), Ok(1..=12))
}
