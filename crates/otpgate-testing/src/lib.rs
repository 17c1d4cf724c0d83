//! Test utilities for otpgate services.
//!
//! Provides `IntegrationSession` (sign-in helpers including the two-factor
//! bypass) and the user fixture loader.
//! Import as a dev-dependency only; never in production code.

pub mod auth;
pub mod fixture;
