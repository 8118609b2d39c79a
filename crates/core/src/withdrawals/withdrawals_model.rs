//! Withdrawal domain models.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::WITHDRAWAL_NOTICE_DAYS;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WithdrawalStatus {
    Scheduled,
    Cancelled,
}

/// A withdrawal request honoring the notice period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalRequest {
    pub id: String,
    pub investment_id: String,
    pub amount: Decimal,
    pub requested_at: NaiveDateTime,
    /// First day the funds may be released.
    pub available_on: NaiveDate,
    pub status: WithdrawalStatus,
}

/// Input model for requesting a withdrawal.
///
/// The request time is stamped by the service, never taken from the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWithdrawal {
    pub investment_id: String,
    pub amount: Decimal,
}

impl NewWithdrawal {
    pub fn validate(&self) -> Result<()> {
        if self.investment_id.trim().is_empty() {
            return Err(Error::invalid_input("Investment id cannot be empty"));
        }
        if self.amount <= Decimal::ZERO {
            return Err(Error::invalid_input(format!(
                "Withdrawal amount must be positive, got {}",
                self.amount
            )));
        }
        Ok(())
    }
}

/// Date funds become available for a request made at `requested_at`.
pub fn notice_available_on(requested_at: NaiveDateTime) -> NaiveDate {
    (requested_at + Duration::days(WITHDRAWAL_NOTICE_DAYS)).date()
}
