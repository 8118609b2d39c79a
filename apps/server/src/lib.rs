pub mod api;
pub mod config;
pub mod error;
mod main_lib;
pub mod scheduler;
pub mod settlement;

pub use main_lib::{build_state, build_state_with_gateway, init_tracing, AppState};
