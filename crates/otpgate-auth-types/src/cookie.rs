//! Cookie builders for the per-scope session and the trusted-device cookie.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite, SignedCookieJar};
use time::Duration;

use otpgate_domain::scope::Scope;
use otpgate_domain::user::Authenticatable;

use crate::two_factor::TwoFactorConfig;

/// Session-token lifetime in seconds (1 day).
pub const SESSION_TTL_SECS: u64 = 86400;

/// Remember-me session lifetime in seconds (2 weeks).
pub const REMEMBER_FOR_SECS: u64 = 1209600;

/// Name of the session cookie for `scope`.
///
/// ```
/// use otpgate_auth_types::cookie::session_cookie_name;
/// use otpgate_domain::scope::Scope;
///
/// let scope = Scope::new("admin").unwrap();
/// assert_eq!(session_cookie_name(&scope), "otpgate_admin_session");
/// ```
pub fn session_cookie_name(scope: &Scope) -> String {
    format!("otpgate_{scope}_session")
}

/// Set the session cookie for `scope`.
///
/// A `persistent` session carries a two-week Max-Age; otherwise it is a browser-session cookie.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use otpgate_auth_types::cookie::{set_session_cookie, REMEMBER_FOR_SECS};
/// use otpgate_domain::scope::Scope;
///
/// let scope = Scope::new("user").unwrap();
/// let jar = set_session_cookie(CookieJar::new(), &scope, "token".to_string(), "example.com".to_string(), true);
/// let cookie = jar.get("otpgate_user_session").unwrap();
/// assert_eq!(cookie.path(), Some("/"));
/// assert_eq!(cookie.domain(), Some("example.com"));
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(REMEMBER_FOR_SECS as i64)));
/// assert!(cookie.http_only().unwrap_or(false));
///
/// let jar = set_session_cookie(CookieJar::new(), &scope, "token".to_string(), "example.com".to_string(), false);
/// assert_eq!(jar.get("otpgate_user_session").unwrap().max_age(), None);
/// ```
pub fn set_session_cookie(
    jar: CookieJar,
    scope: &Scope,
    value: String,
    domain: String,
    persistent: bool,
) -> CookieJar {
    let mut builder = Cookie::build((session_cookie_name(scope), value))
        .path("/")
        .domain(domain)
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax);
    if persistent {
        builder = builder.max_age(Duration::seconds(REMEMBER_FOR_SECS as i64));
    }
    jar.add(builder.build())
}

/// Clear the session cookie for `scope` by setting Max-Age to 0.
pub fn clear_session_cookie(jar: CookieJar, scope: &Scope, domain: String) -> CookieJar {
    let cookie = Cookie::build((session_cookie_name(scope), ""))
        .path("/")
        .domain(domain)
        .max_age(Duration::ZERO)
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}

/// Plain trusted-device value for `resource`: `"<type>-<second factor id>"`.
pub fn trusted_device_value<R: Authenticatable>(resource: &R) -> String {
    format!("{}-{}", R::RESOURCE_TYPE, resource.second_factor_resource_id())
}

/// Sign and set the trusted-device cookie for `resource`.
///
/// ```
/// use axum_extra::extract::cookie::{Key, SignedCookieJar};
/// use otpgate_auth_types::cookie::{is_trusted_device, set_trusted_device_cookie};
/// use otpgate_auth_types::two_factor::TwoFactorConfig;
/// use otpgate_domain::user::{Authenticatable, SecondFactorIdentifiable};
///
/// struct Admin;
/// impl SecondFactorIdentifiable for Admin {
///     fn second_factor_resource_id(&self) -> String { "42".to_string() }
/// }
/// impl Authenticatable for Admin {
///     const RESOURCE_TYPE: &'static str = "Admin";
///     fn session_subject(&self) -> String { "42".to_string() }
/// }
///
/// let config = TwoFactorConfig { remember_for_seconds: 3600, ..TwoFactorConfig::default() };
/// let jar = SignedCookieJar::new(Key::generate());
/// let jar = set_trusted_device_cookie(jar, &config, &Admin, "example.com".to_string());
/// assert_eq!(jar.get("remember_tfa").unwrap().value(), "Admin-42");
/// assert!(is_trusted_device(&jar, &config, &Admin));
/// ```
pub fn set_trusted_device_cookie<R: Authenticatable>(
    jar: SignedCookieJar,
    config: &TwoFactorConfig,
    resource: &R,
    domain: String,
) -> SignedCookieJar {
    let cookie = Cookie::build((
        config.remember_cookie_name.clone(),
        trusted_device_value(resource),
    ))
    .path("/")
    .domain(domain)
    .max_age(Duration::seconds(config.remember_for_seconds as i64))
    .http_only(true)
    .secure(true)
    .same_site(SameSite::Lax)
    .build();
    jar.add(cookie)
}

/// `true` if the jar holds a validly signed trusted-device cookie bound to `resource`.
///
/// The signed jar only yields cookies whose signature verifies against its key,
/// so forged or re-keyed values are treated as absent.
pub fn is_trusted_device<R: Authenticatable>(
    jar: &SignedCookieJar,
    config: &TwoFactorConfig,
    resource: &R,
) -> bool {
    jar.get(&config.remember_cookie_name)
        .is_some_and(|cookie| cookie.value() == trusted_device_value(resource))
}
