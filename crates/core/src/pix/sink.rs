//! Settlement sink trait and implementations.

use std::sync::{Arc, Mutex};

use super::pix_model::PixSettlement;

/// Receives confirmed PIX settlements.
///
/// This is the hand-off point to account crediting. A session calls
/// `on_settled` at most once, from its polling task, so implementations
/// must be fast and must not block.
pub trait PixSettlementSink: Send + Sync {
    fn on_settled(&self, settlement: PixSettlement);
}

/// No-op implementation for contexts that only observe the status.
#[derive(Clone, Default)]
pub struct NoOpSettlementSink;

impl PixSettlementSink for NoOpSettlementSink {
    fn on_settled(&self, _settlement: PixSettlement) {}
}

/// Mock sink for testing - collects settlements.
#[derive(Clone, Default)]
pub struct MockSettlementSink {
    settlements: Arc<Mutex<Vec<PixSettlement>>>,
}

impl MockSettlementSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn settlements(&self) -> Vec<PixSettlement> {
        self.settlements.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.settlements.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.settlements.lock().unwrap().is_empty()
    }
}

impl PixSettlementSink for MockSettlementSink {
    fn on_settled(&self, settlement: PixSettlement) {
        self.settlements.lock().unwrap().push(settlement);
    }
}
