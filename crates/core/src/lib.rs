//! Prospere Capital Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic of the Prospere Capital
//! dashboard: investment valuation and projections, withdrawals under the
//! notice rule, and PIX deposit sessions. It is storage-agnostic and
//! defines traits that are implemented by the `storage-memory` and
//! `pix-gateway` crates.

pub mod constants;
pub mod errors;
pub mod investments;
pub mod onboarding;
pub mod pix;
pub mod projection;
pub mod valuation;
pub mod withdrawals;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
