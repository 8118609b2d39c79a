//! PIX deposit domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Lifecycle of a PIX charge. Every state but `Pending` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixStatus {
    Pending,
    Paid,
    Expired,
    Cancelled,
}

impl PixStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PixStatus::Pending)
    }
}

/// What moved a session out of `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PixResolution {
    /// A status reported by the gateway.
    Gateway,
    /// The local countdown reached the deadline without a gateway payment.
    LocalExpiry,
    /// The hosting context cancelled the deposit.
    UserCancelled,
}

/// Body sent to the gateway to create a charge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixChargeRequest {
    pub amount: Decimal,
    pub description: String,
}

/// Charge returned by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixCharge {
    pub transaction_id: String,
    /// Copy-and-paste PIX payload.
    pub qr_code: String,
    /// Data URI or URL of the rendered QR code.
    pub qr_code_image: String,
    pub expires_at: DateTime<Utc>,
}

/// Result of a status query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixStatusReport {
    pub status: PixStatus,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub amount: Option<Decimal>,
}

impl PixStatusReport {
    pub fn pending() -> Self {
        Self {
            status: PixStatus::Pending,
            paid_at: None,
            amount: None,
        }
    }
}

/// Payload handed to the settlement sink once a charge is paid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixSettlement {
    pub transaction_id: String,
    pub amount: Decimal,
    pub paid_at: DateTime<Utc>,
}

/// Observable state of a PIX session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixSessionSnapshot {
    pub transaction_id: String,
    pub qr_code: String,
    pub qr_code_image: String,
    pub amount: Decimal,
    pub description: String,
    pub expires_at: DateTime<Utc>,
    pub status: PixStatus,
    pub resolution: Option<PixResolution>,
    pub remaining_seconds: i64,
}

impl PixSessionSnapshot {
    /// Remaining time as `MM:SS`.
    pub fn countdown(&self) -> String {
        format_countdown(self.remaining_seconds)
    }
}

/// Whole seconds left until `expires_at`, rounded up and floored at zero.
///
/// Rounding up keeps the countdown from showing `00:00` while the charge
/// is still payable.
pub fn seconds_until(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (expires_at - now).num_milliseconds();
    if millis <= 0 {
        0
    } else {
        (millis + 999) / 1000
    }
}

/// Formats a second count as `MM:SS`. Minutes are not wrapped into hours.
pub fn format_countdown(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
