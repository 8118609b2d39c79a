use async_trait::async_trait;

use super::pix_errors::PixError;
use super::pix_model::{PixCharge, PixChargeRequest, PixStatusReport};

/// Contract of the bank gateway that issues and settles PIX charges.
///
/// Implementations must not retry internally; retry policy belongs to the
/// session (polling) or to the caller (charge creation).
#[async_trait]
pub trait PixGatewayTrait: Send + Sync {
    /// Creates a charge and returns its QR code.
    async fn generate_charge(&self, request: &PixChargeRequest) -> Result<PixCharge, PixError>;

    /// Queries the settlement status of a charge.
    async fn check_status(&self, transaction_id: &str) -> Result<PixStatusReport, PixError>;
}
