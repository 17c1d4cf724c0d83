//! Ambient service plumbing shared by otpgate services: error bodies, tracing,
//! health checks, request ids, env configuration and serde helpers.

pub mod config;
pub mod error;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
