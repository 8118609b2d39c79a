use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One step of an investment's value history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvolutionPoint {
    /// `YYYY-MM`
    pub month: String,
    pub value: Decimal,
    /// Return applied to reach this point; zero for the acquisition month.
    pub return_percentage: Decimal,
}

/// Derived valuation of an investment. Never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentValuation {
    pub investment_id: String,
    pub principal: Decimal,
    pub current_value: Decimal,
    /// Cumulative gain over the principal, in percent.
    pub total_return_percentage: Decimal,
    pub evolution: Vec<EvolutionPoint>,
}
