//! Two-factor settings injected into every component that reads or writes the
//! trusted-device cookie.

use serde::Deserialize;

/// Default name of the trusted-device cookie.
pub const REMEMBER_TFA_COOKIE_NAME: &str = "remember_tfa";

/// Default one-time code length in digits.
pub const DEFAULT_OTP_LENGTH: usize = 6;

/// Code lengths the TOTP library accepts.
pub const OTP_LENGTHS: std::ops::RangeInclusive<usize> = 6..=8;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TwoFactorConfig {
    /// Name of the signed "remember two-factor" cookie.
    #[serde(default = "default_cookie_name")]
    pub remember_cookie_name: String,
    /// How long a verified device skips the OTP challenge. `0` disables the cookie.
    #[serde(default)]
    pub remember_for_seconds: u64,
    /// Digits per one-time code.
    #[serde(default = "default_otp_length")]
    pub otp_length: usize,
}

fn default_cookie_name() -> String {
    REMEMBER_TFA_COOKIE_NAME.to_owned()
}

fn default_otp_length() -> usize {
    DEFAULT_OTP_LENGTH
}

impl Default for TwoFactorConfig {
    fn default() -> Self {
        Self {
            remember_cookie_name: default_cookie_name(),
            remember_for_seconds: 0,
            otp_length: default_otp_length(),
        }
    }
}

impl TwoFactorConfig {
    pub fn remembers_devices(&self) -> bool {
        self.remember_for_seconds > 0
    }
}
