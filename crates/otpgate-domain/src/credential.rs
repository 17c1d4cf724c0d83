//! Credential collaborators held by a [`User`](crate::user::User).
//!
//! Each type owns one authentication concern. Hashing, OTP math and token
//! digests are done by the auth service; these types only carry state.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Password-reset tokens stay valid for this long after being sent (6 hours).
pub const RESET_PASSWORD_WITHIN_SECS: i64 = 21600;

/// Stored password hash (argon2 PHC string).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordCredential {
    pub encrypted_password: String,
}

impl PasswordCredential {
    pub fn from_hash(hash: impl Into<String>) -> Self {
        Self {
            encrypted_password: hash.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.encrypted_password
    }
}

/// OTP secret owned by the one-time-password library.
///
/// Plain secrets must never be logged, so `Debug` redacts the key.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondFactorCredential {
    /// Base32-encoded shared secret.
    pub otp_secret_key: String,
}

impl SecondFactorCredential {
    pub fn new(otp_secret_key: impl Into<String>) -> Self {
        Self {
            otp_secret_key: otp_secret_key.into(),
        }
    }
}

impl std::fmt::Debug for SecondFactorCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecondFactorCredential")
            .field("otp_secret_key", &"[redacted]")
            .finish()
    }
}

/// Outstanding password-reset request. Only the token digest is stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryToken {
    pub reset_password_token: Option<String>,
    pub reset_password_sent_at: Option<DateTime<Utc>>,
}

impl RecoveryToken {
    pub fn issued(digest: String, sent_at: DateTime<Utc>) -> Self {
        Self {
            reset_password_token: Some(digest),
            reset_password_sent_at: Some(sent_at),
        }
    }

    /// `true` while a token exists and was sent less than six hours before `now`.
    pub fn is_period_valid(&self, now: DateTime<Utc>) -> bool {
        match (&self.reset_password_token, self.reset_password_sent_at) {
            (Some(_), Some(sent_at)) => {
                now < sent_at + Duration::seconds(RESET_PASSWORD_WITHIN_SECS)
            }
            _ => false,
        }
    }
}

/// Persistent "remember me" marker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RememberMe {
    pub remember_created_at: Option<DateTime<Utc>>,
}

/// Sign-in bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInActivity {
    pub sign_in_count: i32,
    pub current_sign_in_at: Option<DateTime<Utc>>,
    pub last_sign_in_at: Option<DateTime<Utc>>,
}

impl SignInActivity {
    /// Activity after one more sign-in at `now`.
    pub fn record(&self, now: DateTime<Utc>) -> Self {
        Self {
            sign_in_count: self.sign_in_count.saturating_add(1),
            last_sign_in_at: self.current_sign_in_at.or(Some(now)),
            current_sign_in_at: Some(now),
        }
    }
}
