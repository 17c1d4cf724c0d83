#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};

use otpgate_domain::credential::{PasswordCredential, RecoveryToken};
use otpgate_domain::id::UserId;
use otpgate_domain::user::User;

use crate::error::AuthServiceError;

/// Repository for user accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, AuthServiceError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthServiceError>;

    /// Find the user holding an outstanding reset token with this digest.
    async fn find_by_reset_token(&self, digest: &str) -> Result<Option<User>, AuthServiceError>;

    async fn create(&self, user: &User) -> Result<(), AuthServiceError>;

    /// Count a sign-in at `at` against the stored row: increment the count,
    /// move the current sign-in time to last, and set `remember_created_at` if
    /// `remember` and not already set. Returns `false` if the user does not exist.
    async fn record_sign_in(
        &self,
        id: UserId,
        at: DateTime<Utc>,
        remember: bool,
    ) -> Result<bool, AuthServiceError>;

    async fn set_recovery(
        &self,
        id: UserId,
        recovery: &RecoveryToken,
    ) -> Result<(), AuthServiceError>;

    /// Replace the password hash and drop any outstanding reset token.
    async fn update_password(
        &self,
        id: UserId,
        password: &PasswordCredential,
    ) -> Result<(), AuthServiceError>;
}

/// Delivers password-reset instructions.
pub trait Mailer: Send + Sync {
    async fn send_reset_password_instructions(
        &self,
        to: &str,
        token: &str,
    ) -> Result<(), AuthServiceError>;
}
