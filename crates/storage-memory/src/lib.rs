//! In-memory storage implementation for Prospere Capital.
//!
//! Implements the repository traits defined in `prospere-core` on top of
//! lock-guarded maps. Data lives for the lifetime of the process, which is
//! what the dashboard's demo deployment and the server tests need.
//!
//! ```text
//! core (domain, traits)
//!          │
//!          ▼
//!   storage-memory (this crate)
//! ```

pub mod errors;

// Repository implementations
pub mod investments;
pub mod withdrawals;

pub use errors::StorageError;
pub use investments::InMemoryInvestmentRepository;
pub use withdrawals::InMemoryWithdrawalRepository;
