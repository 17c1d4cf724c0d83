use anyhow::{Context as _, anyhow};
use axum_extra::extract::cookie::{CookieJar, SignedCookieJar};
use totp_rs::{Algorithm, Secret, TOTP};

use otpgate_auth_types::cookie::{
    REMEMBER_FOR_SECS, SESSION_TTL_SECS, set_session_cookie, set_trusted_device_cookie,
};
use otpgate_auth_types::token::{SessionClaims, issue_session_token};
use otpgate_auth_types::two_factor::TwoFactorConfig;
use otpgate_domain::credential::SecondFactorCredential;
use otpgate_domain::sms::SmsTransport;
use otpgate_domain::user::{Authenticatable, DeliveryMethod, User};

use crate::domain::types::{OTP_SECRET_BYTES, OTP_SKEW, OTP_STEP_SECS};
use crate::error::AuthServiceError;

// ── OTP primitives ───────────────────────────────────────────────────────────

/// Fresh base32 OTP secret for a new account.
pub fn generate_otp_secret() -> Result<SecondFactorCredential, AuthServiceError> {
    let bytes: [u8; OTP_SECRET_BYTES] = rand::random();
    match Secret::Raw(bytes.to_vec()).to_encoded() {
        Secret::Encoded(encoded) => Ok(SecondFactorCredential::new(encoded)),
        Secret::Raw(_) => Err(anyhow!("otp secret did not encode").into()),
    }
}

fn totp(credential: &SecondFactorCredential, digits: usize) -> Result<TOTP, AuthServiceError> {
    let secret = Secret::Encoded(credential.otp_secret_key.clone())
        .to_bytes()
        .map_err(|e| anyhow!("invalid otp secret: {e:?}"))?;
    let totp = TOTP::new(Algorithm::SHA1, digits, OTP_SKEW, OTP_STEP_SECS, secret)
        .map_err(|e| anyhow!("invalid otp parameters: {e:?}"))?;
    Ok(totp)
}

/// The code valid for the current time step.
pub fn current_code(
    credential: &SecondFactorCredential,
    digits: usize,
) -> Result<String, AuthServiceError> {
    let code = totp(credential, digits)?
        .generate_current()
        .context("system clock before unix epoch")?;
    Ok(code)
}

/// `true` if `code` matches the current step or one step either side.
pub fn authenticate_otp(
    credential: &SecondFactorCredential,
    digits: usize,
    code: &str,
) -> Result<bool, AuthServiceError> {
    let valid = totp(credential, digits)?
        .check_current(code.trim())
        .context("system clock before unix epoch")?;
    Ok(valid)
}

// ── Send code ────────────────────────────────────────────────────────────────

pub struct SendCodeUseCase<T: SmsTransport> {
    pub sms: T,
    pub otp_length: usize,
}

impl<T: SmsTransport> SendCodeUseCase<T> {
    pub async fn execute(
        &self,
        user: &User,
        delivery_method: DeliveryMethod,
    ) -> Result<(), AuthServiceError> {
        let code = current_code(&user.second_factor, self.otp_length)?;
        user.send_two_factor_authentication_code(&self.sms, &code, delivery_method)
            .await
            .map_err(|e| anyhow::Error::new(e).context("send two-factor code"))?;

        tracing::info!(user_id = %user.id, ?delivery_method, "two-factor code sent");
        Ok(())
    }
}

// ── Verify code ──────────────────────────────────────────────────────────────

pub struct VerifyCodeUseCase {
    pub session_secret: String,
    pub cookie_domain: String,
    pub two_factor: TwoFactorConfig,
}

impl VerifyCodeUseCase {
    /// Marks the session as two-factor verified and, when devices are
    /// remembered, stores a signed trusted-device cookie.
    pub fn execute(
        &self,
        jar: CookieJar,
        trusted: SignedCookieJar,
        user: &User,
        claims: &SessionClaims,
        code: &str,
    ) -> Result<(CookieJar, SignedCookieJar), AuthServiceError> {
        if !authenticate_otp(&user.second_factor, self.two_factor.otp_length, code)? {
            tracing::warn!(user_id = %user.id, "two-factor code rejected");
            return Err(AuthServiceError::InvalidOtp);
        }

        let persistent = user.remember.remember_created_at.is_some();
        let ttl = if persistent {
            REMEMBER_FOR_SECS
        } else {
            SESSION_TTL_SECS
        };
        let (token, _) = issue_session_token(
            &user.session_subject(),
            &claims.scope,
            true,
            ttl,
            &self.session_secret,
        )
        .map_err(|e| AuthServiceError::Internal(e.into()))?;
        let jar = set_session_cookie(
            jar,
            &claims.scope,
            token,
            self.cookie_domain.clone(),
            persistent,
        );

        let trusted = if self.two_factor.remembers_devices() {
            set_trusted_device_cookie(trusted, &self.two_factor, user, self.cookie_domain.clone())
        } else {
            trusted
        };

        tracing::info!(user_id = %user.id, scope = %claims.scope, "two-factor verified");
        Ok((jar, trusted))
    }
}
