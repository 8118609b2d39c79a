//! Withdrawals module - scheduling withdrawals with a 30-day notice.

mod withdrawals_model;
mod withdrawals_service;
mod withdrawals_traits;


pub use withdrawals_model::{
    notice_available_on, NewWithdrawal, WithdrawalRequest, WithdrawalStatus,
};
pub use withdrawals_service::{WithdrawalClock, WithdrawalService};
pub use withdrawals_traits::{WithdrawalRepositoryTrait, WithdrawalServiceTrait};
