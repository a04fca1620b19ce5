//! Business logic services

pub mod estimator;
pub mod geo;
pub mod rate_limiter;
