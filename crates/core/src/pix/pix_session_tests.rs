//! Tests for the PIX session state machine.

use super::*;
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use rust_decimal_macros::dec;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::{sleep, timeout};

// ============================================================================
// Mock Gateway
// ============================================================================

/// Gateway whose status answers are scripted; the last answer repeats.
struct ScriptedGateway {
    expires_at: DateTime<Utc>,
    generate_error: Option<PixError>,
    checks: Mutex<VecDeque<Result<PixStatusReport, PixError>>>,
    fallback: Mutex<Result<PixStatusReport, PixError>>,
    delay: Duration,
    generate_calls: AtomicUsize,
    check_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedGateway {
    fn new(expires_in: ChronoDuration) -> Self {
        Self {
            expires_at: Utc::now() + expires_in,
            generate_error: None,
            checks: Mutex::new(VecDeque::new()),
            fallback: Mutex::new(Ok(PixStatusReport::pending())),
            delay: Duration::ZERO,
            generate_calls: AtomicUsize::new(0),
            check_calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    fn with_checks(self, checks: Vec<Result<PixStatusReport, PixError>>) -> Self {
        if let Some(last) = checks.last() {
            *self.fallback.lock().unwrap() = last.clone();
        }
        *self.checks.lock().unwrap() = checks.into();
        self
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn failing_generate(mut self, error: PixError) -> Self {
        self.generate_error = Some(error);
        self
    }

    fn check_calls(&self) -> usize {
        self.check_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PixGatewayTrait for ScriptedGateway {
    async fn generate_charge(&self, request: &PixChargeRequest) -> Result<PixCharge, PixError> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = &self.generate_error {
            return Err(error.clone());
        }
        Ok(PixCharge {
            transaction_id: "tx-123".to_string(),
            qr_code: format!("00020126PIX{}", request.amount),
            qr_code_image: "data:image/png;base64,AAAA".to_string(),
            expires_at: self.expires_at,
        })
    }

    async fn check_status(&self, _transaction_id: &str) -> Result<PixStatusReport, PixError> {
        self.check_calls.fetch_add(1, Ordering::SeqCst);
        let now_in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now_in_flight, Ordering::SeqCst);
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let next = self.checks.lock().unwrap().pop_front();
        next.unwrap_or_else(|| self.fallback.lock().unwrap().clone())
    }
}

/// Gateway that issues charges but never answers a status query.
struct UnresponsiveGateway {
    expires_at: DateTime<Utc>,
    check_calls: AtomicUsize,
}

#[async_trait]
impl PixGatewayTrait for UnresponsiveGateway {
    async fn generate_charge(&self, _request: &PixChargeRequest) -> Result<PixCharge, PixError> {
        Ok(PixCharge {
            transaction_id: "tx-silent".to_string(),
            qr_code: "00020126PIX".to_string(),
            qr_code_image: "data:image/png;base64,AAAA".to_string(),
            expires_at: self.expires_at,
        })
    }

    async fn check_status(&self, _transaction_id: &str) -> Result<PixStatusReport, PixError> {
        self.check_calls.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }
}

fn fast_config() -> PixSessionConfig {
    PixSessionConfig {
        poll_interval: Duration::from_millis(20),
        countdown_interval: Duration::from_millis(10),
        query_timeout: Duration::from_millis(200),
    }
}

fn paid(amount: Option<rust_decimal::Decimal>) -> Result<PixStatusReport, PixError> {
    Ok(PixStatusReport {
        status: PixStatus::Paid,
        paid_at: Some(Utc::now()),
        amount,
    })
}

fn status(status: PixStatus) -> Result<PixStatusReport, PixError> {
    Ok(PixStatusReport {
        status,
        paid_at: None,
        amount: None,
    })
}

async fn start(gateway: Arc<ScriptedGateway>, sink: MockSettlementSink) -> PixSession {
    PixSession::start(gateway, dec!(250), "Deposit", Arc::new(sink), fast_config())
        .await
        .expect("session should start")
}

async fn wait_for_terminal(session: &PixSession) -> PixSessionSnapshot {
    let mut rx = session.subscribe();
    let snapshot = timeout(
        Duration::from_secs(2),
        rx.wait_for(|s| s.status.is_terminal()),
    )
    .await
    .expect("session should reach a terminal state")
    .expect("session channel closed")
    .clone();
    snapshot
}

// ============================================================================
// Creation
// ============================================================================

#[tokio::test]
async fn test_start_rejects_non_positive_amount_without_gateway_call() {
    let gateway = Arc::new(ScriptedGateway::new(ChronoDuration::minutes(15)));
    let result = PixSession::start(
        gateway.clone(),
        dec!(0),
        "Deposit",
        Arc::new(NoOpSettlementSink),
        fast_config(),
    )
    .await;
    assert!(matches!(result, Err(PixError::InvalidAmount(_))));
    assert_eq!(gateway.generate_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_start_surfaces_permanent_gateway_error_once() {
    let gateway = Arc::new(
        ScriptedGateway::new(ChronoDuration::minutes(15)).failing_generate(PixError::Unauthorized),
    );
    let result = PixSession::start(
        gateway.clone(),
        dec!(100),
        "Deposit",
        Arc::new(NoOpSettlementSink),
        fast_config(),
    )
    .await;
    let error = result.err().expect("creation should fail");
    assert_eq!(error.retry_class(), RetryClass::Permanent);
    assert_eq!(gateway.generate_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_start_surfaces_transient_gateway_error_once() {
    let gateway = Arc::new(
        ScriptedGateway::new(ChronoDuration::minutes(15))
            .failing_generate(PixError::Unavailable("HTTP 503".to_string())),
    );
    let result = PixSession::start(
        gateway.clone(),
        dec!(100),
        "Deposit",
        Arc::new(NoOpSettlementSink),
        fast_config(),
    )
    .await;
    let error = result.err().expect("creation should fail");
    assert_eq!(error.retry_class(), RetryClass::Transient);
    assert_eq!(gateway.generate_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_new_session_is_pending_and_polls_immediately() {
    let gateway = Arc::new(ScriptedGateway::new(ChronoDuration::minutes(15)));
    let session = start(gateway.clone(), MockSettlementSink::new()).await;

    let snapshot = session.snapshot();
    assert_eq!(snapshot.status, PixStatus::Pending);
    assert_eq!(snapshot.transaction_id, "tx-123");
    assert_eq!(snapshot.resolution, None);
    assert!(snapshot.remaining_seconds > 14 * 60);

    sleep(Duration::from_millis(10)).await;
    assert!(gateway.check_calls() >= 1);
    session.dispose();
}

// ============================================================================
// Polling
// ============================================================================

#[tokio::test]
async fn test_paid_fires_settlement_once_and_stops_polling() {
    let gateway = Arc::new(
        ScriptedGateway::new(ChronoDuration::minutes(15)).with_checks(vec![
            status(PixStatus::Pending),
            paid(Some(dec!(250))),
        ]),
    );
    let sink = MockSettlementSink::new();
    let session = start(gateway.clone(), sink.clone()).await;

    let snapshot = wait_for_terminal(&session).await;
    assert_eq!(snapshot.status, PixStatus::Paid);
    assert_eq!(snapshot.resolution, Some(PixResolution::Gateway));

    let calls = gateway.check_calls();
    sleep(Duration::from_millis(120)).await;
    assert_eq!(gateway.check_calls(), calls);
    assert!(session.timers_stopped());

    let settlements = sink.settlements();
    assert_eq!(settlements.len(), 1);
    assert_eq!(settlements[0].transaction_id, "tx-123");
    assert_eq!(settlements[0].amount, dec!(250));
}

#[tokio::test]
async fn test_settlement_falls_back_to_session_amount() {
    let gateway = Arc::new(
        ScriptedGateway::new(ChronoDuration::minutes(15)).with_checks(vec![paid(None)]),
    );
    let sink = MockSettlementSink::new();
    let session = start(gateway, sink.clone()).await;

    wait_for_terminal(&session).await;
    assert_eq!(sink.settlements()[0].amount, dec!(250));
}

#[tokio::test]
async fn test_gateway_expiry_ends_session_without_settlement() {
    let gateway = Arc::new(
        ScriptedGateway::new(ChronoDuration::minutes(15))
            .with_checks(vec![status(PixStatus::Expired)]),
    );
    let sink = MockSettlementSink::new();
    let session = start(gateway, sink.clone()).await;

    let snapshot = wait_for_terminal(&session).await;
    assert_eq!(snapshot.status, PixStatus::Expired);
    assert_eq!(snapshot.resolution, Some(PixResolution::Gateway));
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_gateway_cancellation_ends_session_without_settlement() {
    let gateway = Arc::new(
        ScriptedGateway::new(ChronoDuration::minutes(15))
            .with_checks(vec![status(PixStatus::Cancelled)]),
    );
    let sink = MockSettlementSink::new();
    let session = start(gateway, sink.clone()).await;

    let snapshot = wait_for_terminal(&session).await;
    assert_eq!(snapshot.status, PixStatus::Cancelled);
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_transient_poll_failures_keep_session_pending() {
    let gateway = Arc::new(
        ScriptedGateway::new(ChronoDuration::minutes(15)).with_checks(vec![
            Err(PixError::Timeout),
            Err(PixError::Unavailable("HTTP 502".to_string())),
            Err(PixError::MalformedResponse("unexpected eof".to_string())),
        ]),
    );
    let session = start(gateway.clone(), MockSettlementSink::new()).await;

    sleep(Duration::from_millis(150)).await;
    assert_eq!(session.status(), PixStatus::Pending);
    assert!(gateway.check_calls() >= 4);
    session.dispose();
}

#[tokio::test]
async fn test_failures_then_payment_settles() {
    let gateway = Arc::new(
        ScriptedGateway::new(ChronoDuration::minutes(15)).with_checks(vec![
            Err(PixError::Timeout),
            Err(PixError::NotFound("tx-123".to_string())),
            paid(Some(dec!(250))),
        ]),
    );
    let sink = MockSettlementSink::new();
    let session = start(gateway, sink.clone()).await;

    assert_eq!(wait_for_terminal(&session).await.status, PixStatus::Paid);
    assert_eq!(sink.len(), 1);
}

#[tokio::test]
async fn test_slow_gateway_never_sees_overlapping_polls() {
    let gateway = Arc::new(
        ScriptedGateway::new(ChronoDuration::minutes(15)).with_delay(Duration::from_millis(60)),
    );
    let session = start(gateway.clone(), MockSettlementSink::new()).await;

    sleep(Duration::from_millis(250)).await;
    session.dispose();

    assert_eq!(gateway.max_in_flight.load(Ordering::SeqCst), 1);
    // 20ms ticks during 60ms queries: skipped ticks are not queued up.
    assert!(gateway.check_calls() <= 6);
}

// ============================================================================
// Terminal idempotence
// ============================================================================

#[tokio::test]
async fn test_terminal_state_ignores_later_reports() {
    let gateway = Arc::new(ScriptedGateway::new(ChronoDuration::minutes(15)).with_delay(
        // Keep the poll timer from observing anything on its own.
        Duration::from_secs(5),
    ));
    let sink = MockSettlementSink::new();
    let session = start(gateway, sink.clone()).await;

    assert!(session.apply_status_report(PixStatusReport {
        status: PixStatus::Paid,
        paid_at: None,
        amount: Some(dec!(250)),
    }));
    for later in [
        PixStatus::Expired,
        PixStatus::Cancelled,
        PixStatus::Pending,
        PixStatus::Paid,
    ] {
        assert!(session.apply_status_report(PixStatusReport {
            status: later,
            paid_at: None,
            amount: None,
        }));
        assert_eq!(session.status(), PixStatus::Paid);
    }
    assert_eq!(sink.len(), 1);
    assert!(!session.cancel());
    assert_eq!(session.status(), PixStatus::Paid);
}

#[tokio::test]
async fn test_expired_session_ignores_later_payment() {
    let gateway = Arc::new(
        ScriptedGateway::new(ChronoDuration::minutes(15)).with_delay(Duration::from_secs(5)),
    );
    let sink = MockSettlementSink::new();
    let session = start(gateway, sink.clone()).await;

    assert!(session.apply_status_report(PixStatusReport {
        status: PixStatus::Expired,
        paid_at: None,
        amount: None,
    }));
    session.apply_status_report(PixStatusReport {
        status: PixStatus::Paid,
        paid_at: None,
        amount: None,
    });
    assert_eq!(session.status(), PixStatus::Expired);
    assert!(sink.is_empty());
}

// ============================================================================
// Countdown and deadline
// ============================================================================

#[tokio::test]
async fn test_due_charge_expires_on_first_countdown_tick() {
    let gateway = Arc::new(ScriptedGateway::new(ChronoDuration::zero()));
    let sink = MockSettlementSink::new();
    let session = start(gateway, sink.clone()).await;

    let snapshot = wait_for_terminal(&session).await;
    assert_eq!(snapshot.status, PixStatus::Expired);
    assert_eq!(snapshot.resolution, Some(PixResolution::LocalExpiry));
    assert_eq!(snapshot.remaining_seconds, 0);
    assert_eq!(session.expiry_countdown(), "00:00");
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_due_charge_expires_even_when_gateway_is_down() {
    let gateway = Arc::new(
        ScriptedGateway::new(ChronoDuration::zero())
            .with_checks(vec![Err(PixError::Unavailable("connection refused".to_string()))]),
    );
    let session = start(gateway, MockSettlementSink::new()).await;

    let snapshot = wait_for_terminal(&session).await;
    assert_eq!(snapshot.status, PixStatus::Expired);
    assert_eq!(snapshot.resolution, Some(PixResolution::LocalExpiry));
}

#[tokio::test]
async fn test_gateway_payment_wins_at_deadline() {
    let gateway = Arc::new(
        ScriptedGateway::new(ChronoDuration::zero()).with_checks(vec![paid(Some(dec!(250)))]),
    );
    let sink = MockSettlementSink::new();
    let session = start(gateway, sink.clone()).await;

    let snapshot = wait_for_terminal(&session).await;
    assert_eq!(snapshot.status, PixStatus::Paid);
    assert_eq!(snapshot.resolution, Some(PixResolution::Gateway));
    assert_eq!(sink.len(), 1);
}

#[tokio::test]
async fn test_in_flight_payment_is_applied_before_local_expiry() {
    // The only query is slow and reports payment after the deadline passed.
    let gateway = Arc::new(
        ScriptedGateway::new(ChronoDuration::milliseconds(30))
            .with_checks(vec![paid(Some(dec!(250)))])
            .with_delay(Duration::from_millis(80)),
    );
    let sink = MockSettlementSink::new();
    let session = start(gateway, sink.clone()).await;

    let snapshot = wait_for_terminal(&session).await;
    assert_eq!(snapshot.status, PixStatus::Paid);
    assert_eq!(sink.len(), 1);
}

#[tokio::test]
async fn test_unanswered_status_query_does_not_block_local_expiry() {
    let gateway = Arc::new(UnresponsiveGateway {
        expires_at: Utc::now() + ChronoDuration::milliseconds(100),
        check_calls: AtomicUsize::new(0),
    });
    let sink = MockSettlementSink::new();
    let session = PixSession::start(
        gateway.clone(),
        dec!(250),
        "Deposit",
        Arc::new(sink.clone()),
        fast_config(),
    )
    .await
    .expect("session should start");

    let snapshot = wait_for_terminal(&session).await;
    assert_eq!(snapshot.status, PixStatus::Expired);
    assert_eq!(snapshot.resolution, Some(PixResolution::LocalExpiry));
    assert_eq!(snapshot.remaining_seconds, 0);
    assert_eq!(session.expiry_countdown(), "00:00");
    assert!(gateway.check_calls.load(Ordering::SeqCst) >= 1);
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_countdown_publishes_remaining_time() {
    let gateway = Arc::new(ScriptedGateway::new(ChronoDuration::milliseconds(2500)));
    let session = start(gateway, MockSettlementSink::new()).await;
    let mut rx = session.subscribe();

    let snapshot = timeout(
        Duration::from_secs(2),
        rx.wait_for(|s| s.remaining_seconds <= 2),
    )
    .await
    .expect("countdown should tick")
    .expect("session channel closed")
    .clone();
    assert_eq!(snapshot.status, PixStatus::Pending);
    assert!(snapshot.countdown().starts_with("00:0"));
    session.dispose();
}

// ============================================================================
// Disposal
// ============================================================================

#[tokio::test]
async fn test_dispose_stops_both_timers() {
    let gateway = Arc::new(ScriptedGateway::new(ChronoDuration::minutes(15)));
    let session = start(gateway.clone(), MockSettlementSink::new()).await;
    sleep(Duration::from_millis(50)).await;

    session.dispose();
    sleep(Duration::from_millis(20)).await;
    assert!(session.timers_stopped());

    let calls = gateway.check_calls();
    sleep(Duration::from_millis(100)).await;
    assert_eq!(gateway.check_calls(), calls);
    assert_eq!(session.status(), PixStatus::Pending);
}

#[tokio::test]
async fn test_user_cancel_is_terminal_and_silent() {
    let gateway = Arc::new(ScriptedGateway::new(ChronoDuration::minutes(15)));
    let sink = MockSettlementSink::new();
    let session = start(gateway, sink.clone()).await;

    assert!(session.cancel());
    let snapshot = session.snapshot();
    assert_eq!(snapshot.status, PixStatus::Cancelled);
    assert_eq!(snapshot.resolution, Some(PixResolution::UserCancelled));
    assert!(sink.is_empty());

    sleep(Duration::from_millis(20)).await;
    assert!(session.timers_stopped());
}

#[tokio::test]
async fn test_registry_remove_disposes_session() {
    let gateway = Arc::new(ScriptedGateway::new(ChronoDuration::minutes(15)));
    let registry = PixSessionRegistry::new();
    let session = registry.insert(start(gateway, MockSettlementSink::new()).await);

    assert_eq!(registry.len(), 1);
    assert_eq!(
        registry.snapshot("tx-123").map(|s| s.status),
        Some(PixStatus::Pending)
    );

    let removed = registry.remove("tx-123").expect("session registered");
    sleep(Duration::from_millis(20)).await;
    assert!(removed.timers_stopped());
    assert!(session.timers_stopped());
    assert!(registry.is_empty());
}
