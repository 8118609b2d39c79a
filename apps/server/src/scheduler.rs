//! Background housekeeping for PIX sessions.

use std::sync::Arc;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info};

use crate::main_lib::AppState;

/// How often finished PIX sessions are swept from the registry
const PRUNE_INTERVAL_SECS: u64 = 60;

/// Starts the periodic sweep of finished PIX sessions.
pub fn start_pix_session_pruner(state: Arc<AppState>) {
    tokio::spawn(async move {
        info!("PIX session pruner started ({}s interval)", PRUNE_INTERVAL_SECS);

        let mut prune_interval = interval(Duration::from_secs(PRUNE_INTERVAL_SECS));
        prune_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            prune_interval.tick().await;
            let pruned = state.pix_sessions.prune_finished();
            debug!(
                "PIX session sweep removed {} ({} live)",
                pruned,
                state.pix_sessions.len()
            );
        }
    });
}
