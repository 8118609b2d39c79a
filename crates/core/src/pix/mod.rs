//! PIX module - deposit sessions driven by a bank gateway.

mod pix_errors;
mod pix_model;
mod pix_registry;
mod pix_session;
mod pix_traits;
mod sink;

#[cfg(test)]
mod pix_session_tests;

pub use pix_errors::{PixError, RetryClass};
pub use pix_model::{
    format_countdown, seconds_until, PixCharge, PixChargeRequest, PixResolution,
    PixSessionSnapshot, PixSettlement, PixStatus, PixStatusReport,
};
pub use pix_registry::PixSessionRegistry;
pub use pix_session::{PixSession, PixSessionConfig};
pub use pix_traits::PixGatewayTrait;
pub use sink::{MockSettlementSink, NoOpSettlementSink, PixSettlementSink};
