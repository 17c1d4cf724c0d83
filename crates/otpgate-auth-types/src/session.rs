#![allow(async_fn_in_trait)]

//! The sign-in primitive and session lookup.

use axum_extra::extract::cookie::CookieJar;

use otpgate_domain::scope::Scope;
use otpgate_domain::user::Authenticatable;

use crate::cookie::session_cookie_name;
use crate::token::{SessionClaims, SessionError, validate_session_token};

/// Establishes an authenticated session for a resource.
///
/// Implementations record whatever sign-in bookkeeping they keep and return the
/// jar with the scope's session cookie added. Rejections are reported through
/// `Error` and leave the caller's jar untouched.
pub trait SignIn<R: Authenticatable> {
    type Error: std::error::Error;

    async fn sign_in(
        &self,
        jar: CookieJar,
        resource: &R,
        scope: Option<Scope>,
    ) -> Result<CookieJar, Self::Error>;
}

/// The named scope, or the resource type's default.
pub fn resolve_scope<R: Authenticatable>(scope: Option<Scope>) -> Scope {
    scope.unwrap_or_else(R::default_scope)
}

/// Read and validate the session for `scope` from the request cookies.
pub fn read_session(
    jar: &CookieJar,
    scope: &Scope,
    secret: &str,
) -> Result<SessionClaims, SessionError> {
    let token = jar
        .get(&session_cookie_name(scope))
        .map(|c| c.value().to_owned())
        .filter(|v| !v.is_empty())
        .ok_or(SessionError::Missing)?;
    let claims = validate_session_token(&token, secret)?;
    if &claims.scope != scope {
        return Err(SessionError::ScopeMismatch);
    }
    Ok(claims)
}
