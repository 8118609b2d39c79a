//! Investment repository and service traits.
//!
//! These traits define the contract for investment operations without any
//! storage-specific types, so the engine can be exercised against fixtures.

use async_trait::async_trait;

use super::investments_model::{Investment, InvestmentStatus, MonthlyReturn, NewInvestment, NewMonthlyReturn};
use crate::errors::Result;
use crate::valuation::InvestmentValuation;

/// Trait defining the contract for Investment repository operations.
#[async_trait]
pub trait InvestmentRepositoryTrait: Send + Sync {
    /// Creates a new investment with an empty return history.
    async fn create(&self, new_investment: NewInvestment) -> Result<Investment>;

    /// Retrieves an investment by its ID, with its returns populated.
    fn get(&self, investment_id: &str) -> Result<Investment>;

    /// Lists the investments owned by an investor.
    fn list_for_investor(&self, investor_id: &str) -> Result<Vec<Investment>>;

    /// Returns an owned snapshot of the investment's monthly returns.
    ///
    /// Callers compute over the snapshot, never over a live list.
    fn list_returns_for(&self, investment_id: &str) -> Result<Vec<MonthlyReturn>>;

    /// Appends a monthly return.
    ///
    /// Fails with `ConstraintViolation` when the month already exists for
    /// the investment.
    async fn append_return(&self, new_return: NewMonthlyReturn) -> Result<MonthlyReturn>;

    /// Replaces a stored monthly return, matched by investment and month.
    async fn update_return(&self, monthly_return: MonthlyReturn) -> Result<MonthlyReturn>;

    /// Sets the lifecycle status of an investment.
    async fn update_status(&self, investment_id: &str, status: InvestmentStatus) -> Result<Investment>;
}

/// Trait defining the contract for Investment service operations.
#[async_trait]
pub trait InvestmentServiceTrait: Send + Sync {
    async fn create_investment(&self, new_investment: NewInvestment) -> Result<Investment>;

    fn get_investment(&self, investment_id: &str) -> Result<Investment>;

    fn list_investor_investments(&self, investor_id: &str) -> Result<Vec<Investment>>;

    fn list_monthly_returns(&self, investment_id: &str) -> Result<Vec<MonthlyReturn>>;

    /// Appends a monthly return after validation.
    async fn add_monthly_return(&self, new_return: NewMonthlyReturn) -> Result<MonthlyReturn>;

    /// Applies or stages an existing monthly return.
    async fn set_return_applied(
        &self,
        investment_id: &str,
        month: &str,
        applied: bool,
    ) -> Result<MonthlyReturn>;

    /// Current value and evolution series, recomputed from the stored history.
    fn get_valuation(&self, investment_id: &str) -> Result<InvestmentValuation>;

    /// Marks an active investment as withdrawn. It then accepts neither new
    /// returns nor withdrawal requests.
    async fn close_investment(&self, investment_id: &str) -> Result<Investment>;
}
