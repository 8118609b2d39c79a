//! Client-side state machine for a single PIX deposit.
//!
//! A session is created only after the gateway has issued a charge, so it
//! starts in `Pending`. Two timers run per session:
//!
//! - the poll timer queries the gateway immediately, then every
//!   `poll_interval`, until a terminal status is observed;
//! - the countdown timer publishes the remaining time every
//!   `countdown_interval` and resolves the deadline.
//!
//! Gateway calls go through a per-session permit, so at most one query is
//! outstanding. A poll tick that finds the permit taken is skipped. A poll
//! query is abandoned after `query_timeout`, which also bounds how long the
//! deadline waits for the permit.
//!
//! At the deadline the countdown stops polling and asks the gateway one last
//! time. A terminal answer from the gateway wins over the local clock; a
//! pending answer or a failed query expires the session locally.

use chrono::Utc;
use log::{debug, info, warn};
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, timeout, MissedTickBehavior};

use super::pix_errors::PixError;
use super::pix_model::{
    format_countdown, seconds_until, PixChargeRequest, PixResolution, PixSessionSnapshot,
    PixSettlement, PixStatus, PixStatusReport,
};
use super::pix_traits::PixGatewayTrait;
use super::sink::PixSettlementSink;
use crate::constants::{PIX_COUNTDOWN_INTERVAL_MS, PIX_POLL_INTERVAL_MS, PIX_QUERY_TIMEOUT_MS};

/// Timer settings of a PIX session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixSessionConfig {
    pub poll_interval: Duration,
    pub countdown_interval: Duration,
    /// Upper bound on one status query issued by the poll timer.
    pub query_timeout: Duration,
}

impl Default for PixSessionConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(PIX_POLL_INTERVAL_MS),
            countdown_interval: Duration::from_millis(PIX_COUNTDOWN_INTERVAL_MS),
            query_timeout: Duration::from_millis(PIX_QUERY_TIMEOUT_MS),
        }
    }
}

/// State shared between the session handle and its two timer tasks.
struct SessionShared {
    gateway: Arc<dyn PixGatewayTrait>,
    config: PixSessionConfig,
    /// Source of truth for the session state; receivers observe it.
    updates: watch::Sender<PixSessionSnapshot>,
    /// Taken by the single transition to `Paid`.
    sink: Mutex<Option<Arc<dyn PixSettlementSink>>>,
    /// Held for the duration of every gateway status query.
    gateway_permit: tokio::sync::Mutex<()>,
    deadline_reached: AtomicBool,
}

impl SessionShared {
    fn transaction_id(&self) -> String {
        self.updates.borrow().transaction_id.clone()
    }

    fn status(&self) -> PixStatus {
        self.updates.borrow().status
    }

    /// Moves a pending session to `status`. Returns `false` when the session
    /// was already terminal, which makes terminal states absorbing.
    fn transition(&self, status: PixStatus, resolution: PixResolution) -> bool {
        if status == PixStatus::Pending {
            return false;
        }
        self.updates.send_if_modified(|snapshot| {
            if snapshot.status.is_terminal() {
                return false;
            }
            snapshot.status = status;
            snapshot.resolution = Some(resolution);
            if status != PixStatus::Paid {
                snapshot.remaining_seconds = 0;
            }
            true
        })
    }

    /// Applies a gateway report. Returns `true` once the session is terminal.
    fn apply_report(&self, report: PixStatusReport) -> bool {
        match report.status {
            PixStatus::Pending => self.status().is_terminal(),
            PixStatus::Paid => {
                if self.transition(PixStatus::Paid, PixResolution::Gateway) {
                    self.settle(report);
                }
                true
            }
            status @ (PixStatus::Expired | PixStatus::Cancelled) => {
                if self.transition(status, PixResolution::Gateway) {
                    info!(
                        "PIX transaction {} ended by gateway as {:?}",
                        self.transaction_id(),
                        status
                    );
                }
                true
            }
        }
    }

    fn settle(&self, report: PixStatusReport) {
        let (transaction_id, amount) = {
            let snapshot = self.updates.borrow();
            (snapshot.transaction_id.clone(), snapshot.amount)
        };
        let settlement = PixSettlement {
            transaction_id,
            amount: report.amount.unwrap_or(amount),
            paid_at: report.paid_at.unwrap_or_else(Utc::now),
        };
        info!(
            "PIX transaction {} paid: {}",
            settlement.transaction_id, settlement.amount
        );

        let sink = self
            .sink
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(sink) = sink {
            sink.on_settled(settlement);
        }
    }

    /// Recomputes the remaining time and publishes it when it changed.
    fn refresh_remaining(&self) -> i64 {
        let mut remaining = 0;
        self.updates.send_if_modified(|snapshot| {
            remaining = seconds_until(snapshot.expires_at, Utc::now());
            if snapshot.status.is_terminal() || snapshot.remaining_seconds == remaining {
                return false;
            }
            snapshot.remaining_seconds = remaining;
            true
        });
        remaining
    }

    /// Runs one status query under the permit.
    async fn query_gateway(&self) -> Result<PixStatusReport, PixError> {
        let transaction_id = self.transaction_id();
        self.gateway.check_status(&transaction_id).await
    }

    /// Final reconciliation at the deadline.
    async fn resolve_deadline(&self) {
        self.deadline_reached.store(true, Ordering::SeqCst);

        let transaction_id = self.transaction_id();

        // Waits for an in-flight poll so its answer is applied first.
        let Ok(_permit) = timeout(self.config.query_timeout, self.gateway_permit.lock()).await
        else {
            warn!(
                "PIX status query for {} still in flight at deadline, expiring locally",
                transaction_id
            );
            self.expire_locally(&transaction_id);
            return;
        };
        if self.status().is_terminal() {
            return;
        }

        match timeout(self.config.poll_interval, self.query_gateway()).await {
            Ok(Ok(report)) if report.status.is_terminal() => {
                debug!(
                    "PIX transaction {} reconciled at deadline as {:?}",
                    transaction_id, report.status
                );
                self.apply_report(report);
                return;
            }
            Ok(Ok(_)) => {
                debug!("PIX transaction {} still pending at deadline", transaction_id);
            }
            Ok(Err(e)) => {
                warn!(
                    "PIX deadline check for {} failed, expiring locally: {}",
                    transaction_id, e
                );
            }
            Err(_) => {
                warn!(
                    "PIX deadline check for {} timed out, expiring locally",
                    transaction_id
                );
            }
        }

        self.expire_locally(&transaction_id);
    }

    fn expire_locally(&self, transaction_id: &str) {
        if self.transition(PixStatus::Expired, PixResolution::LocalExpiry) {
            info!("PIX transaction {} expired", transaction_id);
        }
    }
}

async fn run_poll_timer(shared: Arc<SessionShared>) {
    let mut ticker = interval(shared.config.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        // The first tick completes immediately.
        ticker.tick().await;
        if shared.status().is_terminal() || shared.deadline_reached.load(Ordering::SeqCst) {
            break;
        }

        let Ok(_permit) = shared.gateway_permit.try_lock() else {
            debug!("PIX poll skipped: a status query is still in flight");
            continue;
        };

        match timeout(shared.config.query_timeout, shared.query_gateway()).await {
            Ok(Ok(report)) => {
                if shared.apply_report(report) {
                    break;
                }
            }
            Ok(Err(e)) => {
                // No transition on failure; the next tick retries.
                warn!(
                    "PIX status poll for {} failed ({:?}): {}",
                    shared.transaction_id(),
                    e.retry_class(),
                    e
                );
            }
            Err(_) => {
                warn!(
                    "PIX status poll for {} timed out after {:?}",
                    shared.transaction_id(),
                    shared.config.query_timeout
                );
            }
        }
    }
    debug!("PIX poll timer for {} stopped", shared.transaction_id());
}

async fn run_countdown_timer(shared: Arc<SessionShared>) {
    let mut ticker = interval(shared.config.countdown_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        if shared.status().is_terminal() {
            break;
        }
        if shared.refresh_remaining() == 0 {
            shared.resolve_deadline().await;
            break;
        }
    }
    debug!("PIX countdown for {} stopped", shared.transaction_id());
}

/// A live PIX deposit owning its poll and countdown timers.
///
/// Dropping the session (or calling [`dispose`](Self::dispose)) stops both
/// timers together.
pub struct PixSession {
    shared: Arc<SessionShared>,
    poll_task: JoinHandle<()>,
    countdown_task: JoinHandle<()>,
}

impl PixSession {
    /// Requests a charge from the gateway and starts both timers.
    ///
    /// Gateway failures are returned as-is; creation is never retried here.
    /// Must be called from within a tokio runtime.
    pub async fn start(
        gateway: Arc<dyn PixGatewayTrait>,
        amount: Decimal,
        description: impl Into<String>,
        sink: Arc<dyn PixSettlementSink>,
        config: PixSessionConfig,
    ) -> Result<Self, PixError> {
        if amount <= Decimal::ZERO {
            return Err(PixError::InvalidAmount(format!(
                "amount must be greater than zero, got {}",
                amount
            )));
        }

        let request = PixChargeRequest {
            amount,
            description: description.into(),
        };
        let charge = gateway.generate_charge(&request).await.map_err(|e| {
            warn!("PIX charge creation failed ({:?}): {}", e.retry_class(), e);
            e
        })?;
        info!(
            "PIX transaction {} created for {} (expires {})",
            charge.transaction_id, amount, charge.expires_at
        );

        let snapshot = PixSessionSnapshot {
            remaining_seconds: seconds_until(charge.expires_at, Utc::now()),
            transaction_id: charge.transaction_id,
            qr_code: charge.qr_code,
            qr_code_image: charge.qr_code_image,
            amount,
            description: request.description,
            expires_at: charge.expires_at,
            status: PixStatus::Pending,
            resolution: None,
        };
        let (updates, _) = watch::channel(snapshot);

        let shared = Arc::new(SessionShared {
            gateway,
            config,
            updates,
            sink: Mutex::new(Some(sink)),
            gateway_permit: tokio::sync::Mutex::new(()),
            deadline_reached: AtomicBool::new(false),
        });

        let poll_task = tokio::spawn(run_poll_timer(shared.clone()));
        let countdown_task = tokio::spawn(run_countdown_timer(shared.clone()));

        Ok(Self {
            shared,
            poll_task,
            countdown_task,
        })
    }

    pub fn transaction_id(&self) -> String {
        self.shared.transaction_id()
    }

    pub fn status(&self) -> PixStatus {
        self.shared.status()
    }

    pub fn snapshot(&self) -> PixSessionSnapshot {
        self.shared.updates.borrow().clone()
    }

    /// Receives every published state change.
    pub fn subscribe(&self) -> watch::Receiver<PixSessionSnapshot> {
        self.shared.updates.subscribe()
    }

    /// Remaining time as `MM:SS`, computed against the current clock.
    pub fn expiry_countdown(&self) -> String {
        let snapshot = self.shared.updates.borrow();
        if snapshot.status.is_terminal() {
            return format_countdown(0);
        }
        format_countdown(seconds_until(snapshot.expires_at, Utc::now()))
    }

    /// Cancels a pending deposit on behalf of the user and stops the timers.
    ///
    /// Returns `false` when the session had already reached a terminal state.
    pub fn cancel(&self) -> bool {
        let cancelled = self
            .shared
            .transition(PixStatus::Cancelled, PixResolution::UserCancelled);
        if cancelled {
            info!("PIX transaction {} cancelled by user", self.transaction_id());
        }
        self.dispose();
        cancelled
    }

    /// Stops both timers. The last published state stays readable.
    pub fn dispose(&self) {
        self.poll_task.abort();
        self.countdown_task.abort();
    }

    /// True once both timer tasks have stopped.
    pub fn timers_stopped(&self) -> bool {
        self.poll_task.is_finished() && self.countdown_task.is_finished()
    }

    #[cfg(test)]
    pub(crate) fn apply_status_report(&self, report: PixStatusReport) -> bool {
        self.shared.apply_report(report)
    }
}

impl Drop for PixSession {
    fn drop(&mut self) {
        self.dispose();
    }
}
