//! HTTP inbound adapter exposing REST endpoints.

pub mod error;
pub mod recipes;
pub mod session;
pub mod state;
pub mod tags;
#[cfg(test)]
pub mod test_utils;

pub use error::{ApiError, ApiResult};
