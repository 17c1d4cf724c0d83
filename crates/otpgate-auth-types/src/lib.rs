//! Session and two-factor primitives shared by otpgate services and test support.
//!
//! Provides the session cookie and trusted-device cookie builders, session-token
//! issue/validation, [`two_factor::TwoFactorConfig`] and the [`session::SignIn`]
//! contract.

pub mod cookie;
pub mod session;
pub mod token;
pub mod two_factor;
