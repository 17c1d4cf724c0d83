//! Password recovery: emailed reset tokens, stored only as digests.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use sha2::{Digest, Sha256};

use otpgate_domain::credential::RecoveryToken;
use otpgate_domain::validation::validate_password;

use crate::domain::repository::{Mailer, UserRepository};
use crate::domain::types::RESET_TOKEN_BYTES;
use crate::error::AuthServiceError;
use crate::usecase::password::hash_password;
use crate::usecase::session::normalize_email;

/// Returns `(token, digest)`. The token goes to the user, the digest to storage.
pub fn generate_reset_token() -> (String, String) {
    let bytes: [u8; RESET_TOKEN_BYTES] = rand::random();
    let token = URL_SAFE_NO_PAD.encode(bytes);
    let digest = reset_token_digest(&token);
    (token, digest)
}

pub fn reset_token_digest(token: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(token.as_bytes()))
}

// ── Request reset ────────────────────────────────────────────────────────────

pub struct RequestPasswordResetUseCase<U: UserRepository, M: Mailer> {
    pub users: U,
    pub mailer: M,
}

impl<U: UserRepository, M: Mailer> RequestPasswordResetUseCase<U, M> {
    /// Unknown addresses succeed silently so callers cannot discover which accounts exist.
    pub async fn execute(&self, email: &str) -> Result<(), AuthServiceError> {
        let Some(user) = self.users.find_by_email(&normalize_email(email)).await? else {
            tracing::debug!("password reset requested for unknown email");
            return Ok(());
        };

        let (token, digest) = generate_reset_token();
        self.users
            .set_recovery(user.id, &RecoveryToken::issued(digest, Utc::now()))
            .await?;
        self.mailer
            .send_reset_password_instructions(&user.email, &token)
            .await?;

        tracing::info!(user_id = %user.id, "password reset requested");
        Ok(())
    }
}

// ── Reset ────────────────────────────────────────────────────────────────────

pub struct ResetPasswordInput {
    pub token: String,
    pub password: String,
}

pub struct ResetPasswordUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> ResetPasswordUseCase<U> {
    pub async fn execute(&self, input: ResetPasswordInput) -> Result<(), AuthServiceError> {
        // 1. Token must match an outstanding, unexpired request → 401
        let user = self
            .users
            .find_by_reset_token(&reset_token_digest(&input.token))
            .await?
            .ok_or(AuthServiceError::InvalidResetToken)?;
        if !user.recovery.is_period_valid(Utc::now()) {
            return Err(AuthServiceError::InvalidResetToken);
        }

        // 2. Validate and store the new password; the token is consumed
        validate_password(&input.password)?;
        self.users
            .update_password(user.id, &hash_password(&input.password)?)
            .await?;

        tracing::info!(user_id = %user.id, "password reset");
        Ok(())
    }
}
