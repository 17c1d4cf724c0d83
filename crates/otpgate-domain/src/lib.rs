//! Domain types shared across otpgate crates.
//!
//! Pure types with no web or database framework dependencies.

pub mod credential;
pub mod id;
pub mod scope;
pub mod sms;
pub mod user;
pub mod validation;
