use log::{debug, info};
use std::sync::Arc;

use super::investments_model::{
    Investment, InvestmentStatus, MonthlyReturn, NewInvestment, NewMonthlyReturn,
};
use super::investments_traits::{InvestmentRepositoryTrait, InvestmentServiceTrait};
use crate::errors::{Error, Result};
use crate::valuation::{calculate_valuation, InvestmentValuation};

/// Service for managing investments and their monthly returns
pub struct InvestmentService {
    repository: Arc<dyn InvestmentRepositoryTrait>,
}

impl InvestmentService {
    pub fn new(repository: Arc<dyn InvestmentRepositoryTrait>) -> Self {
        Self { repository }
    }

    fn find_return(&self, investment_id: &str, month: &str) -> Result<MonthlyReturn> {
        self.repository
            .list_returns_for(investment_id)?
            .into_iter()
            .find(|r| r.month == month)
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "Monthly return {} for investment {}",
                    month, investment_id
                ))
            })
    }
}

#[async_trait::async_trait]
impl InvestmentServiceTrait for InvestmentService {
    async fn create_investment(&self, new_investment: NewInvestment) -> Result<Investment> {
        new_investment.validate()?;
        let investment = self.repository.create(new_investment).await?;
        info!(
            "Created investment {} for investor {} ({} in pool {})",
            investment.id,
            investment.investor_id,
            investment.amount,
            investment.pool.as_str()
        );
        Ok(investment)
    }

    fn get_investment(&self, investment_id: &str) -> Result<Investment> {
        self.repository.get(investment_id)
    }

    fn list_investor_investments(&self, investor_id: &str) -> Result<Vec<Investment>> {
        self.repository.list_for_investor(investor_id)
    }

    fn list_monthly_returns(&self, investment_id: &str) -> Result<Vec<MonthlyReturn>> {
        // Fails with NotFound for unknown investments
        self.repository.get(investment_id)?;
        let mut returns = self.repository.list_returns_for(investment_id)?;
        returns.sort_by(|a, b| a.month.cmp(&b.month));
        Ok(returns)
    }

    async fn add_monthly_return(&self, new_return: NewMonthlyReturn) -> Result<MonthlyReturn> {
        new_return.validate()?;

        let investment = self.repository.get(&new_return.investment_id)?;
        if !investment.is_active() {
            return Err(Error::ConstraintViolation(format!(
                "Investment {} is withdrawn and no longer accepts returns",
                investment.id
            )));
        }
        if investment
            .monthly_returns
            .iter()
            .any(|r| r.month == new_return.month)
        {
            return Err(Error::ConstraintViolation(format!(
                "Investment {} already has a return for {}",
                investment.id, new_return.month
            )));
        }

        debug!(
            "Appending {}% for {} to investment {} (applied: {})",
            new_return.return_percentage, new_return.month, investment.id, new_return.applied
        );
        self.repository.append_return(new_return).await
    }

    async fn set_return_applied(
        &self,
        investment_id: &str,
        month: &str,
        applied: bool,
    ) -> Result<MonthlyReturn> {
        let mut monthly_return = self.find_return(investment_id, month)?;
        if monthly_return.applied == applied {
            return Ok(monthly_return);
        }
        monthly_return.applied = applied;
        info!(
            "Monthly return {} of investment {} is now {}",
            month,
            investment_id,
            if applied { "applied" } else { "staged" }
        );
        self.repository.update_return(monthly_return).await
    }

    fn get_valuation(&self, investment_id: &str) -> Result<InvestmentValuation> {
        let investment = self.repository.get(investment_id)?;
        Ok(calculate_valuation(&investment))
    }

    async fn close_investment(&self, investment_id: &str) -> Result<Investment> {
        let investment = self.repository.get(investment_id)?;
        if !investment.is_active() {
            return Err(Error::ConstraintViolation(format!(
                "Investment {} is already withdrawn",
                investment_id
            )));
        }
        let closed = self
            .repository
            .update_status(investment_id, InvestmentStatus::Withdrawn)
            .await?;
        info!("Investment {} marked as withdrawn", investment_id);
        Ok(closed)
    }
}
