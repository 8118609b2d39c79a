//! In-memory storage for withdrawal requests.

mod repository;

pub use repository::InMemoryWithdrawalRepository;
