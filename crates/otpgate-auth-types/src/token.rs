//! Session-token issue and validation.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use otpgate_domain::scope::Scope;

/// Errors returned by [`issue_session_token`] and [`validate_session_token`].
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session cookie missing")]
    Missing,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("session expired")]
    Expired,
    #[error("malformed session")]
    Malformed,
    #[error("session issued for another scope")]
    ScopeMismatch,
    #[error("failed to encode session token")]
    Encode(#[source] jsonwebtoken::errors::Error),
}

/// Session claims stored in the per-scope session cookie.
///
/// | Field | JWT claim | Meaning |
/// |-------|-----------|---------|
/// | `sub` | `sub` | resource session subject (user id) |
/// | `scope` | custom | scope the resource was signed in under |
/// | `tfa` | custom | second factor verified during this session |
/// | `exp` | `exp` | expiration, seconds since epoch |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub scope: Scope,
    pub tfa: bool,
    pub exp: u64,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Sign a session token valid for `ttl_secs`. Returns the token and its expiry.
pub fn issue_session_token(
    subject: &str,
    scope: &Scope,
    tfa: bool,
    ttl_secs: u64,
    secret: &str,
) -> Result<(String, u64), SessionError> {
    let exp = now_secs() + ttl_secs;
    let claims = SessionClaims {
        sub: subject.to_owned(),
        scope: scope.clone(),
        tfa,
        exp,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(SessionError::Encode)?;
    Ok((token, exp))
}

/// Decode and validate a session token.
///
/// Validation: HS256, exp checked, required claims `exp` + `sub`, default 60s leeway.
pub fn validate_session_token(token: &str, secret: &str) -> Result<SessionClaims, SessionError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => SessionError::InvalidSignature,
        _ => SessionError::Malformed,
    })?;

    Ok(data.claims)
}
