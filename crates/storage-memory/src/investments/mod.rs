//! In-memory storage for investments and their monthly returns.

mod repository;

pub use repository::InMemoryInvestmentRepository;
