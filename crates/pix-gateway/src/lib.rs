//! HTTP client for the PIX payment gateway.
//!
//! Two endpoints are used:
//! - `POST {base}/pix/generate` creates a charge and returns its QR code
//! - `GET {base}/pix/check?transactionId=..` reports the charge status
//!
//! HTTP failures are mapped onto [`PixError`] so callers can tell transient
//! trouble (retry on the next poll) from permanent refusals.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, StatusCode};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

use prospere_core::pix::{
    PixCharge, PixChargeRequest, PixError, PixGatewayTrait, PixStatus, PixStatusReport,
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

// ============================================================================
// API Response Structures
// ============================================================================

/// Response from /pix/generate
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    transaction_id: String,
    qr_code: String,
    #[serde(default)]
    qr_code_image: String,
    expires_at: DateTime<Utc>,
}

/// Response from /pix/check
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckResponse {
    status: String,
    #[serde(default)]
    paid_at: Option<DateTime<Utc>>,
    #[serde(default)]
    amount: Option<Decimal>,
}

/// Error body some gateway deployments return alongside non-2xx statuses
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(alias = "error")]
    message: Option<String>,
}

/// Which endpoint a response came from. Status codes mean different things
/// on each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayCall<'a> {
    Generate,
    Check { transaction_id: &'a str },
}

// ============================================================================
// PixGatewayClient
// ============================================================================

/// PIX gateway reached over HTTPS with a bearer API key.
pub struct PixGatewayClient {
    client: Client,
    base_url: Option<String>,
    api_key: Option<String>,
}

impl PixGatewayClient {
    /// Creates a client. A missing URL or key is not an error here: every
    /// call then fails with [`PixError::NotConfigured`].
    pub fn new(base_url: Option<String>, api_key: Option<String>, timeout: Option<Duration>) -> Self {
        let client = Client::builder()
            .timeout(timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .unwrap_or_else(|_| Client::new());

        let base_url = base_url
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());
        let api_key = api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        Self {
            client,
            base_url,
            api_key,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.base_url.is_some() && self.api_key.is_some()
    }

    fn endpoint(&self, path: &str) -> Result<(String, &str), PixError> {
        let base = self
            .base_url
            .as_deref()
            .ok_or_else(|| PixError::NotConfigured("missing gateway URL".to_string()))?;
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| PixError::NotConfigured("missing API key".to_string()))?;
        Ok((format!("{}{}", base, path), key))
    }

    /// Sends a request and returns the body of a successful response.
    async fn send(&self, request: RequestBuilder, call: GatewayCall<'_>) -> Result<String, PixError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                PixError::Timeout
            } else {
                PixError::Unavailable(format!("Request failed: {}", e))
            }
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                PixError::Timeout
            } else {
                PixError::Unavailable(format!("Failed to read response: {}", e))
            }
        })?;

        match classify_status(call, status, &body) {
            Some(err) => {
                warn!("PIX gateway {:?} answered HTTP {}: {}", call, status, err);
                Err(err)
            }
            None => Ok(body),
        }
    }
}

#[async_trait]
impl PixGatewayTrait for PixGatewayClient {
    async fn generate_charge(&self, request: &PixChargeRequest) -> Result<PixCharge, PixError> {
        let (url, key) = self.endpoint("/pix/generate")?;
        debug!("PIX generate: {} for '{}'", request.amount, request.description);

        let builder = self.client.post(&url).bearer_auth(key).json(request);
        let body = self.send(builder, GatewayCall::Generate).await?;
        parse_charge(&body)
    }

    async fn check_status(&self, transaction_id: &str) -> Result<PixStatusReport, PixError> {
        let (url, key) = self.endpoint("/pix/check")?;
        debug!("PIX check: {}", transaction_id);

        let builder = self
            .client
            .get(&url)
            .bearer_auth(key)
            .query(&[("transactionId", transaction_id)]);
        let body = self
            .send(builder, GatewayCall::Check { transaction_id })
            .await?;
        parse_status_report(&body)
    }
}

// ============================================================================
// Response mapping
// ============================================================================

/// Maps an HTTP status onto a [`PixError`]. Returns `None` for 2xx.
pub fn classify_status(call: GatewayCall<'_>, status: StatusCode, body: &str) -> Option<PixError> {
    if status.is_success() {
        return None;
    }

    let detail = serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|e| e.message)
        .unwrap_or_else(|| format!("HTTP {}", status));

    let err = match (status, call) {
        (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN, _) => PixError::Unauthorized,
        (StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY, GatewayCall::Generate) => {
            PixError::Rejected(detail)
        }
        (StatusCode::NOT_FOUND, GatewayCall::Check { transaction_id }) => {
            PixError::NotFound(transaction_id.to_string())
        }
        (StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT, _) => PixError::Timeout,
        _ => PixError::Unavailable(detail),
    };
    Some(err)
}

/// Parses a gateway status label. Labels are matched case-insensitively
/// and both spellings of "cancelled" are accepted.
pub fn parse_status_label(label: &str) -> Option<PixStatus> {
    match label.trim().to_ascii_lowercase().as_str() {
        "pending" => Some(PixStatus::Pending),
        "paid" => Some(PixStatus::Paid),
        "expired" => Some(PixStatus::Expired),
        "cancelled" | "canceled" => Some(PixStatus::Cancelled),
        _ => None,
    }
}

pub fn parse_charge(body: &str) -> Result<PixCharge, PixError> {
    let resp: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| PixError::MalformedResponse(format!("generate: {}", e)))?;
    if resp.transaction_id.trim().is_empty() || resp.qr_code.trim().is_empty() {
        return Err(PixError::MalformedResponse(
            "generate: empty transactionId or qrCode".to_string(),
        ));
    }
    Ok(PixCharge {
        transaction_id: resp.transaction_id,
        qr_code: resp.qr_code,
        qr_code_image: resp.qr_code_image,
        expires_at: resp.expires_at,
    })
}

pub fn parse_status_report(body: &str) -> Result<PixStatusReport, PixError> {
    let resp: CheckResponse = serde_json::from_str(body)
        .map_err(|e| PixError::MalformedResponse(format!("check: {}", e)))?;
    let status = parse_status_label(&resp.status).ok_or_else(|| {
        PixError::MalformedResponse(format!("check: unknown status '{}'", resp.status))
    })?;
    Ok(PixStatusReport {
        status,
        paid_at: resp.paid_at,
        amount: resp.amount,
    })
}
