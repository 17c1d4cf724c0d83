use axum::http::{HeaderMap, Method, StatusCode};
use axum_extra::extract::cookie::{CookieJar, SignedCookieJar};

use otpgate_auth::error::AuthServiceError;
use otpgate_auth_types::cookie::session_cookie_name;
use otpgate_auth_types::two_factor::TwoFactorConfig;
use otpgate_domain::scope::Scope;
use otpgate_testing::fixture::Fixture;

use crate::helpers::{
    MockUserRepo, db_returning, error_kind, integration_session, other_key,
    request, send,
};

// ── sign_in_with_2fa against the two-factor gate ─────────────────────────────

#[tokio::test]
async fn should_reach_gated_route_after_sign_in_with_2fa() {
    let bob = Fixture::user("bob");
    let mut session = integration_session(
        MockUserRepo::new(vec![bob.clone()]),
        TwoFactorConfig::default(),
    );

    session.sign_in_with_2fa(&bob, None).await.unwrap();

    let response = send(
        db_returning(&bob, 1),
        TwoFactorConfig::default(),
        request(Method::GET, "/users/me", session.headers(), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn should_challenge_gated_route_after_plain_sign_in() {
    let bob = Fixture::user("bob");
    let mut session = integration_session(
        MockUserRepo::new(vec![bob.clone()]),
        TwoFactorConfig::default(),
    );

    session.sign_in(&bob, None).await.unwrap();

    let response = send(
        db_returning(&bob, 1),
        TwoFactorConfig::default(),
        request(Method::GET, "/users/me", session.headers(), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_kind(response).await, "TWO_FACTOR_REQUIRED");
}

#[tokio::test]
async fn should_reject_session_without_cookies() {
    let response = send(
        db_returning(&Fixture::user("bob"), 0),
        TwoFactorConfig::default(),
        request(Method::GET, "/users/me", HeaderMap::new(), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_kind(response).await, "INVALID_SESSION");
}

// ── Trusted-device cookie ────────────────────────────────────────────────────

#[tokio::test]
async fn should_install_cookie_bound_to_second_factor_id() {
    let bob = Fixture::user("bob");
    let mut session = integration_session(
        MockUserRepo::new(vec![bob.clone()]),
        TwoFactorConfig::default(),
    );

    session.sign_in_with_2fa(&bob, None).await.unwrap();

    assert_eq!(
        session.verified_cookie_value("remember_tfa").as_deref(),
        Some("User-00000000-0000-0000-0000-000000000001")
    );
    // The raw value carries a signature in front of the plain value.
    let raw = session.cookie("remember_tfa").unwrap().value().to_owned();
    assert_ne!(raw, "User-00000000-0000-0000-0000-000000000001");
    assert!(raw.ends_with("User-00000000-0000-0000-0000-000000000001"));
}

#[tokio::test]
async fn should_not_verify_cookie_with_another_key() {
    let bob = Fixture::user("bob");
    let mut session = integration_session(
        MockUserRepo::new(vec![bob.clone()]),
        TwoFactorConfig::default(),
    );

    session.sign_in_with_2fa(&bob, None).await.unwrap();

    let foreign = SignedCookieJar::from_headers(&session.headers(), other_key());
    assert!(foreign.get("remember_tfa").is_none());
}

#[tokio::test]
async fn should_not_trust_cookie_bound_to_another_user() {
    let bob = Fixture::user("bob");
    let alice = Fixture::user("alice");
    let users = MockUserRepo::new(vec![bob.clone(), alice.clone()]);

    // Alice's trusted-device cookie, then a plain sign-in as Bob.
    let mut session = integration_session(users, TwoFactorConfig::default());
    session.sign_in_with_2fa(&alice, None).await.unwrap();
    session.sign_in(&bob, None).await.unwrap();

    let response = send(
        db_returning(&bob, 1),
        TwoFactorConfig::default(),
        request(Method::GET, "/users/me", session.headers(), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_kind(response).await, "TWO_FACTOR_REQUIRED");
}

#[tokio::test]
async fn should_use_configured_cookie_name() {
    let bob = Fixture::user("bob");
    let two_factor = TwoFactorConfig {
        remember_cookie_name: "device_ok".to_owned(),
        ..TwoFactorConfig::default()
    };
    let mut session =
        integration_session(MockUserRepo::new(vec![bob.clone()]), two_factor.clone());

    session.sign_in_with_2fa(&bob, None).await.unwrap();
    assert!(session.cookie("remember_tfa").is_none());
    assert!(session.verified_cookie_value("device_ok").is_some());

    let accepted = send(
        db_returning(&bob, 1),
        two_factor,
        request(Method::GET, "/users/me", session.headers(), None),
    )
    .await;
    assert_eq!(accepted.status(), StatusCode::OK);

    // An app reading the default name does not see the cookie.
    let challenged = send(
        db_returning(&bob, 1),
        TwoFactorConfig::default(),
        request(Method::GET, "/users/me", session.headers(), None),
    )
    .await;
    assert_eq!(error_kind(challenged).await, "TWO_FACTOR_REQUIRED");
}

// ── Side effects ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_only_record_sign_in_activity() {
    let bob = Fixture::user("bob");
    let users = MockUserRepo::new(vec![bob.clone()]);
    let mut session = integration_session(users.clone(), TwoFactorConfig::default());

    session.sign_in_with_2fa(&bob, None).await.unwrap();

    let stored = users.get(bob.id).unwrap();
    assert_eq!(stored.second_factor, bob.second_factor);
    assert_eq!(stored.activity.sign_in_count, bob.activity.sign_in_count + 1);
    assert!(stored.activity.current_sign_in_at.is_some());
    assert_eq!(stored.password, bob.password);
    assert_eq!(stored.recovery, bob.recovery);
}

#[tokio::test]
async fn should_count_every_sign_in_from_same_fixture() {
    let bob = Fixture::user("bob");
    let users = MockUserRepo::new(vec![bob.clone()]);
    let mut session = integration_session(users.clone(), TwoFactorConfig::default());

    session.sign_in_with_2fa(&bob, None).await.unwrap();
    let first = users.get(bob.id).unwrap().activity;
    session.sign_in_with_2fa(&bob, None).await.unwrap();
    let second = users.get(bob.id).unwrap().activity;

    assert_eq!(second.sign_in_count, 2);
    assert_eq!(second.last_sign_in_at, first.current_sign_in_at);
}

#[tokio::test]
async fn should_fail_for_unpersisted_user_and_keep_cookies() {
    let bob = Fixture::user("bob");
    let mut session = integration_session(MockUserRepo::empty(), TwoFactorConfig::default());

    let result = session.sign_in_with_2fa(&bob, None).await;

    assert!(
        matches!(result, Err(AuthServiceError::UserNotFound)),
        "expected UserNotFound, got {result:?}"
    );
    assert_eq!(session.jar().iter().count(), 0);
}

// ── Scopes ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_issue_session_for_default_scope() {
    let bob = Fixture::user("bob");
    let mut session = integration_session(
        MockUserRepo::new(vec![bob.clone()]),
        TwoFactorConfig::default(),
    );

    session.sign_in_with_2fa(&bob, None).await.unwrap();

    let user_scope = Scope::new("user").unwrap();
    assert!(session.cookie(&session_cookie_name(&user_scope)).is_some());
}

#[tokio::test]
async fn should_issue_session_for_explicit_scope() {
    let bob = Fixture::user("bob");
    let mut session = integration_session(
        MockUserRepo::new(vec![bob.clone()]),
        TwoFactorConfig::default(),
    );
    let admin = Scope::new("admin").unwrap();

    session.sign_in_with_2fa(&bob, Some(admin.clone())).await.unwrap();

    assert!(session.cookie(&session_cookie_name(&admin)).is_some());
    assert!(session.cookie("otpgate_user_session").is_none());

    // The user-scoped routes do not accept an admin session.
    let response = send(
        db_returning(&bob, 0),
        TwoFactorConfig::default(),
        request(Method::GET, "/users/me", session.headers(), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_kind(response).await, "INVALID_SESSION");
}

#[tokio::test]
async fn should_carry_previous_cookies_into_sign_in() {
    let bob = Fixture::user("bob");
    let mut session = integration_session(
        MockUserRepo::new(vec![bob.clone()]),
        TwoFactorConfig::default(),
    );
    session.store_set_cookies(&{
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::SET_COOKIE,
            "locale=en; Path=/".parse().unwrap(),
        );
        headers
    });

    session.sign_in_with_2fa(&bob, None).await.unwrap();

    let jar: &CookieJar = session.jar();
    assert_eq!(jar.get("locale").map(|c| c.value()), Some("en"));
}
