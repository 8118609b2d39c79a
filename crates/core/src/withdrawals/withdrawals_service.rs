use chrono::{NaiveDateTime, Utc};
use log::info;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use super::withdrawals_model::{
    notice_available_on, NewWithdrawal, WithdrawalRequest, WithdrawalStatus,
};
use super::withdrawals_traits::{WithdrawalRepositoryTrait, WithdrawalServiceTrait};
use crate::errors::{Error, Result};
use crate::investments::InvestmentRepositoryTrait;
use crate::valuation::calculate_current_value;

/// Source of the request time stamped on new withdrawals.
pub type WithdrawalClock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// Service scheduling withdrawals under the notice rule
pub struct WithdrawalService {
    repository: Arc<dyn WithdrawalRepositoryTrait>,
    investment_repository: Arc<dyn InvestmentRepositoryTrait>,
    clock: WithdrawalClock,
}

impl WithdrawalService {
    pub fn new(
        repository: Arc<dyn WithdrawalRepositoryTrait>,
        investment_repository: Arc<dyn InvestmentRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            investment_repository,
            clock: Arc::new(|| Utc::now().naive_utc()),
        }
    }

    /// Replaces the wall clock, e.g. with a fixed time in tests.
    pub fn with_clock(mut self, clock: WithdrawalClock) -> Self {
        self.clock = clock;
        self
    }

    /// Value still free to withdraw: current value minus scheduled requests.
    fn available_balance(&self, investment_id: &str, current_value: Decimal) -> Result<Decimal> {
        let committed: Decimal = self
            .repository
            .list_for_investment(investment_id)?
            .iter()
            .filter(|w| w.status == WithdrawalStatus::Scheduled)
            .map(|w| w.amount)
            .sum();
        Ok(current_value - committed)
    }
}

#[async_trait::async_trait]
impl WithdrawalServiceTrait for WithdrawalService {
    async fn request_withdrawal(&self, new_withdrawal: NewWithdrawal) -> Result<WithdrawalRequest> {
        new_withdrawal.validate()?;

        let investment = self.investment_repository.get(&new_withdrawal.investment_id)?;
        if !investment.is_active() {
            return Err(Error::ConstraintViolation(format!(
                "Investment {} is already withdrawn",
                investment.id
            )));
        }

        let current_value = calculate_current_value(&investment);
        let available = self.available_balance(&investment.id, current_value)?;
        if new_withdrawal.amount > available {
            return Err(Error::ConstraintViolation(format!(
                "Withdrawal of {} exceeds the available balance of {}",
                new_withdrawal.amount, available
            )));
        }

        let requested_at = (self.clock)();
        let request = WithdrawalRequest {
            id: Uuid::new_v4().to_string(),
            investment_id: investment.id.clone(),
            amount: new_withdrawal.amount,
            requested_at,
            available_on: notice_available_on(requested_at),
            status: WithdrawalStatus::Scheduled,
        };

        info!(
            "Scheduled withdrawal of {} from investment {} for {}",
            request.amount, request.investment_id, request.available_on
        );
        self.repository.insert(request).await
    }

    async fn cancel_withdrawal(&self, withdrawal_id: &str) -> Result<WithdrawalRequest> {
        let request = self.repository.get(withdrawal_id)?;
        if request.status != WithdrawalStatus::Scheduled {
            return Err(Error::ConstraintViolation(format!(
                "Withdrawal {} is not scheduled",
                withdrawal_id
            )));
        }
        self.repository
            .update_status(withdrawal_id, WithdrawalStatus::Cancelled)
            .await
    }

    fn list_withdrawals(&self, investment_id: &str) -> Result<Vec<WithdrawalRequest>> {
        self.investment_repository.get(investment_id)?;
        let mut requests = self.repository.list_for_investment(investment_id)?;
        requests.sort_by(|a, b| a.requested_at.cmp(&b.requested_at));
        Ok(requests)
    }
}
