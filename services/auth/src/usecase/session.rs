use axum_extra::extract::cookie::{CookieJar, SignedCookieJar};
use chrono::Utc;

use otpgate_auth_types::cookie::{
    REMEMBER_FOR_SECS, SESSION_TTL_SECS, is_trusted_device, set_session_cookie,
};
use otpgate_auth_types::session::{SignIn, resolve_scope};
use otpgate_auth_types::token::issue_session_token;
use otpgate_auth_types::two_factor::TwoFactorConfig;
use otpgate_domain::scope::Scope;
use otpgate_domain::user::{Authenticatable, User};

use crate::domain::repository::UserRepository;
use crate::error::AuthServiceError;
use crate::usecase::password::verify_password;

/// Normalized lookup key for an email address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

// ── Sign-in primitive ────────────────────────────────────────────────────────

/// Records sign-in activity and issues the scope's session cookie.
///
/// The session starts with `tfa = false`; the two-factor gate decides whether a
/// trusted-device cookie or a later OTP verification lets requests through.
pub struct SessionAuthenticator<U: UserRepository> {
    pub users: U,
    pub session_secret: String,
    pub cookie_domain: String,
    pub remember_me: bool,
}

impl<U: UserRepository> SignIn<User> for SessionAuthenticator<U> {
    type Error = AuthServiceError;

    async fn sign_in(
        &self,
        jar: CookieJar,
        resource: &User,
        scope: Option<Scope>,
    ) -> Result<CookieJar, Self::Error> {
        let scope = resolve_scope::<User>(scope);
        if !self
            .users
            .record_sign_in(resource.id, Utc::now(), self.remember_me)
            .await?
        {
            return Err(AuthServiceError::UserNotFound);
        }

        let ttl = if self.remember_me {
            REMEMBER_FOR_SECS
        } else {
            SESSION_TTL_SECS
        };
        let (token, _) = issue_session_token(
            &resource.session_subject(),
            &scope,
            false,
            ttl,
            &self.session_secret,
        )
        .map_err(|e| AuthServiceError::Internal(e.into()))?;

        tracing::info!(user_id = %resource.id, scope = %scope, "signed in");
        Ok(set_session_cookie(
            jar,
            &scope,
            token,
            self.cookie_domain.clone(),
            self.remember_me,
        ))
    }
}

// ── Password sign-in ─────────────────────────────────────────────────────────

pub struct PasswordSignInInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct PasswordSignInOutput {
    pub user: User,
    pub jar: CookieJar,
    /// `false` when the device already carries a valid trusted-device cookie.
    pub two_factor_required: bool,
}

pub struct PasswordSignInUseCase<U: UserRepository> {
    pub authenticator: SessionAuthenticator<U>,
    pub two_factor: TwoFactorConfig,
}

impl<U: UserRepository> PasswordSignInUseCase<U> {
    pub async fn execute(
        &self,
        jar: CookieJar,
        trusted: &SignedCookieJar,
        input: PasswordSignInInput,
    ) -> Result<PasswordSignInOutput, AuthServiceError> {
        let user = self
            .authenticator
            .users
            .find_by_email(&normalize_email(&input.email))
            .await?
            .ok_or(AuthServiceError::InvalidCredential)?;

        if !verify_password(&user.password, &input.password)? {
            return Err(AuthServiceError::InvalidCredential);
        }

        let jar = self.authenticator.sign_in(jar, &user, None).await?;
        let two_factor_required = user.need_two_factor_authentication()
            && !is_trusted_device(trusted, &self.two_factor, &user);

        Ok(PasswordSignInOutput {
            user,
            jar,
            two_factor_required,
        })
    }
}
