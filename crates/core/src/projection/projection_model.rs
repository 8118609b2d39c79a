//! Simulator domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::MAX_PROJECTION_MONTHS;
use crate::investments::Pool;
use crate::{Error, Result};

/// Simulator input shared by every scenario of a projection set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionInput {
    pub initial_amount: Decimal,
    pub months: u32,
    #[serde(default)]
    pub monthly_deposit: Decimal,
    #[serde(default = "default_reinvest")]
    pub reinvest: bool,
    /// Pool whose target rate drives the base scenario. Falls back to the
    /// reference rate when absent.
    #[serde(default)]
    pub pool: Option<Pool>,
}

fn default_reinvest() -> bool {
    true
}

impl ProjectionInput {
    pub fn validate(&self) -> Result<()> {
        if self.initial_amount.is_sign_negative() {
            return Err(Error::invalid_input("Initial amount cannot be negative"));
        }
        if self.monthly_deposit.is_sign_negative() {
            return Err(Error::invalid_input("Monthly deposit cannot be negative"));
        }
        if self.months > MAX_PROJECTION_MONTHS {
            return Err(Error::invalid_input(format!(
                "Projection horizon is limited to {} months",
                MAX_PROJECTION_MONTHS
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioKind {
    Conservative,
    Base,
    Aggressive,
}

/// One projected path: `months + 1` values in whole currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionScenario {
    pub kind: ScenarioKind,
    pub monthly_rate: Decimal,
    pub values: Vec<Decimal>,
}

impl ProjectionScenario {
    pub fn final_value(&self) -> Decimal {
        self.values.last().copied().unwrap_or(Decimal::ZERO)
    }
}

/// The three canonical scenarios, generated from identical inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSet {
    pub conservative: ProjectionScenario,
    pub base: ProjectionScenario,
    pub aggressive: ProjectionScenario,
    /// Sum of the initial amount and every monthly deposit.
    pub total_contributed: Decimal,
}
