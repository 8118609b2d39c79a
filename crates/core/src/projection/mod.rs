//! Projection module - scenario simulation for prospective investors.

pub mod projection_calculator;
pub mod projection_model;

pub use projection_calculator::*;
pub use projection_model::*;
