//! Integration-test sessions.
//!
//! `IntegrationSession` plays the part of a browser: it keeps a cookie jar,
//! turns it into request headers and absorbs `Set-Cookie` from responses.
//! `sign_in_with_2fa` signs a resource in and marks the session's device as
//! already verified, so OTP-gated routes answer without a code.
//!
//! ```ignore
//! let mut session = IntegrationSession::new(authenticator, key, TwoFactorConfig::default());
//! session.sign_in_with_2fa(&Fixture::user("bob"), None).await?;
//!
//! let response = router
//!     .oneshot(get("/users/me").with_headers(session.headers()))
//!     .await?;
//! assert_eq!(response.status(), StatusCode::OK);
//! ```

use axum::response::IntoResponse;
use axum_extra::extract::cookie::{Cookie, CookieJar, Key, SignedCookieJar};
use http::header::{COOKIE, SET_COOKIE};
use http::{HeaderMap, HeaderValue};

use otpgate_auth_types::cookie::trusted_device_value;
use otpgate_auth_types::session::SignIn;
use otpgate_auth_types::two_factor::TwoFactorConfig;
use otpgate_domain::scope::Scope;
use otpgate_domain::user::Authenticatable;

/// Cookie-carrying test session bound to one sign-in primitive.
pub struct IntegrationSession<A> {
    authenticator: A,
    key: Key,
    two_factor: TwoFactorConfig,
    jar: CookieJar,
}

impl<A> IntegrationSession<A> {
    /// `key` and `two_factor` must be the ones the application under test uses.
    pub fn new(authenticator: A, key: Key, two_factor: TwoFactorConfig) -> Self {
        Self {
            authenticator,
            key,
            two_factor,
            jar: CookieJar::new(),
        }
    }

    pub fn jar(&self) -> &CookieJar {
        &self.jar
    }

    pub fn cookie(&self, name: &str) -> Option<&Cookie<'static>> {
        self.jar.get(name)
    }

    /// Value of a signed cookie after verifying it with the application key.
    pub fn verified_cookie_value(&self, name: &str) -> Option<String> {
        SignedCookieJar::from_headers(&self.headers(), self.key.clone())
            .get(name)
            .map(|c| c.value().to_owned())
    }

    /// `Cookie` header carrying every cookie in the session.
    pub fn cookie_header(&self) -> Option<HeaderValue> {
        let pairs: Vec<String> = self
            .jar
            .iter()
            .filter(|c| !c.value().is_empty())
            .map(|c| c.encoded().stripped().to_string())
            .collect();
        if pairs.is_empty() {
            return None;
        }
        HeaderValue::from_str(&pairs.join("; ")).ok()
    }

    /// Request headers as a browser holding this session would send them.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        if let Some(value) = self.cookie_header() {
            map.insert(COOKIE, value);
        }
        map
    }

    /// Apply `Set-Cookie` headers from a response. Cookies cleared with an
    /// empty value or zero Max-Age are dropped from the session.
    pub fn store_set_cookies(&mut self, headers: &HeaderMap) {
        let mut jar = self.jar.clone();
        for cookie in headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| Cookie::parse_encoded(v.to_owned()).ok())
        {
            let cleared = cookie.value().is_empty()
                || cookie.max_age().is_some_and(|age| age.is_zero());
            jar = if cleared {
                jar.remove(cookie.name().to_owned())
            } else {
                jar.add(cookie)
            };
        }
        self.jar = jar;
    }

    /// Trusted-device cookie for `resource`, signed in a throwaway jar seeded
    /// with a copy of the application key. Only the signed value leaves it.
    fn signed_trusted_device_cookie<R: Authenticatable>(&self, resource: &R) -> Cookie<'static> {
        let name = self.two_factor.remember_cookie_name.clone();
        let dummy = SignedCookieJar::new(self.key.clone())
            .add(Cookie::new(name.clone(), trusted_device_value(resource)));
        let response = dummy.into_response();
        let signed_value = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| Cookie::parse_encoded(v.to_owned()).ok())
            .find(|c| c.name() == name)
            .map(|c| c.value().to_owned())
            .expect("signed jar emits the cookie it was given");
        Cookie::new(name, signed_value)
    }

    /// Sign `resource` in exactly as a real login would, without the
    /// trusted-device cookie. OTP-gated routes will still challenge.
    pub async fn sign_in<R>(&mut self, resource: &R, scope: Option<Scope>) -> Result<(), A::Error>
    where
        R: Authenticatable,
        A: SignIn<R>,
    {
        self.jar = self
            .authenticator
            .sign_in(self.jar.clone(), resource, scope)
            .await?;
        Ok(())
    }

    /// Sign `resource` in and install a validly signed trusted-device cookie,
    /// skipping the OTP challenge.
    ///
    /// No OTP code is generated or checked and the resource's OTP state is not
    /// touched. Sign-in errors are returned unchanged and leave the session's
    /// cookies as they were.
    pub async fn sign_in_with_2fa<R>(
        &mut self,
        resource: &R,
        scope: Option<Scope>,
    ) -> Result<(), A::Error>
    where
        R: Authenticatable,
        A: SignIn<R>,
    {
        let jar = self.jar.clone().add(self.signed_trusted_device_cookie(resource));
        self.jar = self.authenticator.sign_in(jar, resource, scope).await?;
        Ok(())
    }
}
