//! Session extractors for the `user` scope.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{CookieJar, SignedCookieJar};

use otpgate_auth_types::cookie::is_trusted_device;
use otpgate_auth_types::session::read_session;
use otpgate_auth_types::token::{SessionClaims, SessionError};
use otpgate_domain::id::UserId;
use otpgate_domain::user::{Authenticatable, User};

use crate::domain::repository::UserRepository;
use crate::error::AuthServiceError;
use crate::infra::db::DbUserRepository;
use crate::state::AppState;

/// The signed-in user, whether or not the second factor has been passed.
///
/// Rejects with `INVALID_SESSION` when the scope's session cookie is missing,
/// invalid, expired, or names a user that no longer exists.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub claims: SessionClaims,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AuthServiceError;

    // Values are read synchronously so the returned future is 'static.
    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let jar = CookieJar::from_headers(&parts.headers);
        let claims = read_session(&jar, &User::default_scope(), &state.session_secret);
        load_current_user(claims, state.user_repo())
    }
}

async fn load_current_user(
    claims: Result<SessionClaims, SessionError>,
    users: DbUserRepository,
) -> Result<CurrentUser, AuthServiceError> {
    let claims = claims.map_err(|e| {
        tracing::debug!(error = %e, "session rejected");
        AuthServiceError::InvalidSession
    })?;
    let id: UserId = claims
        .sub
        .parse()
        .map_err(|_| AuthServiceError::InvalidSession)?;
    let user = users
        .find_by_id(id)
        .await?
        .ok_or(AuthServiceError::InvalidSession)?;
    Ok(CurrentUser { user, claims })
}

/// A signed-in user who has passed the second factor.
///
/// Passes when the session was verified with an OTP, when the user does not
/// need two-factor authentication, or when the request carries a trusted-device
/// cookie bound to this user. Otherwise rejects with `TWO_FACTOR_REQUIRED`.
#[derive(Debug, Clone)]
pub struct TwoFactorVerified(pub User);

impl FromRequestParts<AppState> for TwoFactorVerified {
    type Rejection = AuthServiceError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let trusted = SignedCookieJar::from_headers(&parts.headers, state.cookie_key.clone());
        let two_factor = state.two_factor.clone();
        let jar = CookieJar::from_headers(&parts.headers);
        let claims = read_session(&jar, &User::default_scope(), &state.session_secret);
        let users = state.user_repo();

        async move {
            let CurrentUser { user, claims } = load_current_user(claims, users).await?;
            if claims.tfa
                || !user.need_two_factor_authentication()
                || is_trusted_device(&trusted, &two_factor, &user)
            {
                return Ok(Self(user));
            }
            tracing::debug!(user_id = %user.id, "second factor required");
            Err(AuthServiceError::TwoFactorRequired)
        }
    }
}
