//! Investments module - domain models, services, and traits.

mod investments_model;
mod investments_service;
mod investments_traits;

#[cfg(test)]
mod investments_model_tests;

pub use investments_model::{
    is_valid_month, Investment, InvestmentStatus, InvestmentType, MonthlyReturn, NewInvestment,
    NewMonthlyReturn, Pool,
};
pub use investments_service::InvestmentService;
pub use investments_traits::{InvestmentRepositoryTrait, InvestmentServiceTrait};
