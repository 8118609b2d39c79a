use async_trait::async_trait;

use super::withdrawals_model::{NewWithdrawal, WithdrawalRequest, WithdrawalStatus};
use crate::errors::Result;

/// Trait for withdrawal repository operations
#[async_trait]
pub trait WithdrawalRepositoryTrait: Send + Sync {
    async fn insert(&self, request: WithdrawalRequest) -> Result<WithdrawalRequest>;
    fn get(&self, withdrawal_id: &str) -> Result<WithdrawalRequest>;
    fn list_for_investment(&self, investment_id: &str) -> Result<Vec<WithdrawalRequest>>;
    async fn update_status(
        &self,
        withdrawal_id: &str,
        status: WithdrawalStatus,
    ) -> Result<WithdrawalRequest>;
}

/// Trait for withdrawal service operations
#[async_trait]
pub trait WithdrawalServiceTrait: Send + Sync {
    async fn request_withdrawal(&self, new_withdrawal: NewWithdrawal) -> Result<WithdrawalRequest>;
    async fn cancel_withdrawal(&self, withdrawal_id: &str) -> Result<WithdrawalRequest>;
    fn list_withdrawals(&self, investment_id: &str) -> Result<Vec<WithdrawalRequest>>;
}
