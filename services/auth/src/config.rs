use anyhow::{anyhow, bail};
use axum_extra::extract::cookie::Key;
use serde::Deserialize;

use otpgate_auth_types::two_factor::{
    DEFAULT_OTP_LENGTH, OTP_LENGTHS, REMEMBER_TFA_COOKIE_NAME, TwoFactorConfig,
};
use otpgate_core::config::Config;

/// Auth service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret for signing session tokens.
    pub session_secret: String,
    /// At least 64 bytes; signs the trusted-device cookie.
    pub cookie_key: String,
    /// Cookie domain attribute (root domain, e.g. "example.com").
    pub cookie_domain: String,
    /// TCP port to listen on. Env var: `AUTH_PORT`.
    #[serde(default = "default_auth_port")]
    pub auth_port: u16,
    #[serde(default = "default_remember_tfa_cookie_name")]
    pub remember_tfa_cookie_name: String,
    /// `0` disables trusted-device cookies.
    #[serde(default)]
    pub remember_otp_session_for_seconds: u64,
    #[serde(default = "default_otp_length")]
    pub otp_length: usize,
}

fn default_auth_port() -> u16 {
    3112
}

fn default_remember_tfa_cookie_name() -> String {
    REMEMBER_TFA_COOKIE_NAME.to_owned()
}

fn default_otp_length() -> usize {
    DEFAULT_OTP_LENGTH
}

impl Config for AuthConfig {}

impl AuthConfig {
    pub fn two_factor(&self) -> anyhow::Result<TwoFactorConfig> {
        if !OTP_LENGTHS.contains(&self.otp_length) {
            bail!(
                "OTP_LENGTH must be within {}..={}, got {}",
                OTP_LENGTHS.start(),
                OTP_LENGTHS.end(),
                self.otp_length
            );
        }
        Ok(TwoFactorConfig {
            remember_cookie_name: self.remember_tfa_cookie_name.clone(),
            remember_for_seconds: self.remember_otp_session_for_seconds,
            otp_length: self.otp_length,
        })
    }

    pub fn cookie_key(&self) -> anyhow::Result<Key> {
        Key::try_from(self.cookie_key.as_bytes())
            .map_err(|e| anyhow!("COOKIE_KEY must be at least 64 bytes: {e:?}"))
    }
}
