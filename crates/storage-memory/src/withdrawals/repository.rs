use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use prospere_core::withdrawals::{WithdrawalRepositoryTrait, WithdrawalRequest, WithdrawalStatus};
use prospere_core::Result;

use crate::errors::StorageError;

#[derive(Default)]
pub struct InMemoryWithdrawalRepository {
    requests: RwLock<HashMap<String, WithdrawalRequest>>,
}

impl InMemoryWithdrawalRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WithdrawalRepositoryTrait for InMemoryWithdrawalRepository {
    async fn insert(&self, request: WithdrawalRequest) -> Result<WithdrawalRequest> {
        let mut requests = self.requests.write().map_err(StorageError::from)?;
        if requests.contains_key(&request.id) {
            return Err(
                StorageError::UniqueViolation(format!("Withdrawal {} already exists", request.id))
                    .into(),
            );
        }
        requests.insert(request.id.clone(), request.clone());
        Ok(request)
    }

    fn get(&self, withdrawal_id: &str) -> Result<WithdrawalRequest> {
        let requests = self.requests.read().map_err(StorageError::from)?;
        requests
            .get(withdrawal_id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(format!("Withdrawal {}", withdrawal_id)).into())
    }

    fn list_for_investment(&self, investment_id: &str) -> Result<Vec<WithdrawalRequest>> {
        let requests = self.requests.read().map_err(StorageError::from)?;
        Ok(requests
            .values()
            .filter(|w| w.investment_id == investment_id)
            .cloned()
            .collect())
    }

    async fn update_status(
        &self,
        withdrawal_id: &str,
        status: WithdrawalStatus,
    ) -> Result<WithdrawalRequest> {
        let mut requests = self.requests.write().map_err(StorageError::from)?;
        let request = requests
            .get_mut(withdrawal_id)
            .ok_or_else(|| StorageError::NotFound(format!("Withdrawal {}", withdrawal_id)))?;
        request.status = status;
        Ok(request.clone())
    }
}
