use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

use prospere_core::investments::{
    Investment, InvestmentRepositoryTrait, InvestmentStatus, MonthlyReturn, NewInvestment,
    NewMonthlyReturn,
};
use prospere_core::Result;

use crate::errors::StorageError;

/// Investments keyed by id. Monthly returns are stored on their investment.
#[derive(Default)]
pub struct InMemoryInvestmentRepository {
    investments: RwLock<HashMap<String, Investment>>,
}

impl InMemoryInvestmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-populated with existing investments.
    pub fn with_investments(investments: impl IntoIterator<Item = Investment>) -> Self {
        let map = investments
            .into_iter()
            .map(|investment| (investment.id.clone(), investment))
            .collect();
        Self {
            investments: RwLock::new(map),
        }
    }

    fn not_found(investment_id: &str) -> StorageError {
        StorageError::NotFound(format!("Investment {}", investment_id))
    }
}

#[async_trait]
impl InvestmentRepositoryTrait for InMemoryInvestmentRepository {
    async fn create(&self, new_investment: NewInvestment) -> Result<Investment> {
        let id = new_investment
            .id
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let investment = Investment {
            id: id.clone(),
            investor_id: new_investment.investor_id,
            amount: new_investment.amount,
            investment_type: new_investment.investment_type,
            pool: new_investment.pool,
            date: new_investment.date,
            status: InvestmentStatus::Active,
            monthly_returns: Vec::new(),
        };

        let mut investments = self.investments.write().map_err(StorageError::from)?;
        if investments.contains_key(&id) {
            return Err(
                StorageError::UniqueViolation(format!("Investment {} already exists", id)).into(),
            );
        }
        investments.insert(id, investment.clone());
        Ok(investment)
    }

    fn get(&self, investment_id: &str) -> Result<Investment> {
        let investments = self.investments.read().map_err(StorageError::from)?;
        investments
            .get(investment_id)
            .cloned()
            .ok_or_else(|| Self::not_found(investment_id).into())
    }

    fn list_for_investor(&self, investor_id: &str) -> Result<Vec<Investment>> {
        let investments = self.investments.read().map_err(StorageError::from)?;
        let mut owned: Vec<Investment> = investments
            .values()
            .filter(|i| i.investor_id == investor_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        Ok(owned)
    }

    fn list_returns_for(&self, investment_id: &str) -> Result<Vec<MonthlyReturn>> {
        Ok(self.get(investment_id)?.monthly_returns)
    }

    async fn append_return(&self, new_return: NewMonthlyReturn) -> Result<MonthlyReturn> {
        let mut investments = self.investments.write().map_err(StorageError::from)?;
        let investment = investments
            .get_mut(&new_return.investment_id)
            .ok_or_else(|| Self::not_found(&new_return.investment_id))?;

        // The check and the insert share one write lock.
        if investment
            .monthly_returns
            .iter()
            .any(|r| r.month == new_return.month)
        {
            return Err(StorageError::UniqueViolation(format!(
                "Investment {} already has a return for {}",
                investment.id, new_return.month
            ))
            .into());
        }

        let monthly_return = MonthlyReturn {
            id: Uuid::new_v4().to_string(),
            investment_id: new_return.investment_id,
            month: new_return.month,
            return_percentage: new_return.return_percentage,
            applied: new_return.applied,
            created_at: Utc::now().naive_utc(),
        };
        debug!(
            "Stored return {} for investment {}",
            monthly_return.month, monthly_return.investment_id
        );
        investment.monthly_returns.push(monthly_return.clone());
        Ok(monthly_return)
    }

    async fn update_return(&self, monthly_return: MonthlyReturn) -> Result<MonthlyReturn> {
        let mut investments = self.investments.write().map_err(StorageError::from)?;
        let investment = investments
            .get_mut(&monthly_return.investment_id)
            .ok_or_else(|| Self::not_found(&monthly_return.investment_id))?;
        let stored = investment
            .monthly_returns
            .iter_mut()
            .find(|r| r.id == monthly_return.id)
            .ok_or_else(|| {
                StorageError::NotFound(format!("Monthly return {}", monthly_return.id))
            })?;

        // Month and creation time identify the record and never change.
        stored.return_percentage = monthly_return.return_percentage;
        stored.applied = monthly_return.applied;
        Ok(stored.clone())
    }

    async fn update_status(
        &self,
        investment_id: &str,
        status: InvestmentStatus,
    ) -> Result<Investment> {
        let mut investments = self.investments.write().map_err(StorageError::from)?;
        let investment = investments
            .get_mut(investment_id)
            .ok_or_else(|| Self::not_found(investment_id))?;
        investment.status = status;
        Ok(investment.clone())
    }
}
