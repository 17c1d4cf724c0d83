use axum::http::{HeaderMap, Method, StatusCode};
use axum_extra::extract::cookie::{CookieJar, SignedCookieJar};

use otpgate_auth::error::AuthServiceError;
use otpgate_auth::usecase::two_factor::{SendCodeUseCase, VerifyCodeUseCase, current_code};
use otpgate_auth_types::session::{SignIn, read_session};
use otpgate_auth_types::token::SessionClaims;
use otpgate_auth_types::two_factor::TwoFactorConfig;
use otpgate_domain::scope::Scope;
use otpgate_domain::user::{DeliveryMethod, STUB_PHONE_NUMBER, User};
use otpgate_testing::fixture::Fixture;

use crate::helpers::{
    MockUserRepo, RecordingSms, TEST_COOKIE_DOMAIN, TEST_SESSION_SECRET, authenticator,
    db_returning, error_kind, integration_session, remembering, request, send, test_key,
};

fn verify_usecase(two_factor: TwoFactorConfig) -> VerifyCodeUseCase {
    VerifyCodeUseCase {
        session_secret: TEST_SESSION_SECRET.to_owned(),
        cookie_domain: TEST_COOKIE_DOMAIN.to_owned(),
        two_factor,
    }
}

async fn signed_in(user: &User) -> (CookieJar, SessionClaims) {
    let jar = authenticator(MockUserRepo::new(vec![user.clone()]))
        .sign_in(CookieJar::new(), user, None)
        .await
        .unwrap();
    let claims = read_session(&jar, &Scope::new("user").unwrap(), TEST_SESSION_SECRET).unwrap();
    (jar, claims)
}

fn json(value: serde_json::Value) -> String {
    value.to_string()
}

// ── SendCodeUseCase ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_text_current_code_to_stub_number() {
    let bob = Fixture::user("bob");
    let sms = RecordingSms::default();
    let usecase = SendCodeUseCase {
        sms: sms.clone(),
        otp_length: 6,
    };

    usecase.execute(&bob, DeliveryMethod::Sms).await.unwrap();
    usecase.execute(&bob, DeliveryMethod::Voice).await.unwrap();

    let sent = sms.sent.lock().unwrap();
    assert_eq!(sent.len(), 2);
    for (to, body) in sent.iter() {
        assert_eq!(to, STUB_PHONE_NUMBER);
        assert_eq!(body.len(), 6);
        assert!(body.chars().all(|c| c.is_ascii_digit()));
    }
}

// ── VerifyCodeUseCase ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_mark_session_verified_and_trust_device() {
    let bob = Fixture::user("bob");
    let (jar, claims) = signed_in(&bob).await;
    let code = current_code(&bob.second_factor, 6).unwrap();

    let (jar, trusted) = verify_usecase(remembering())
        .execute(jar, SignedCookieJar::new(test_key()), &bob, &claims, &code)
        .unwrap();

    let claims = read_session(&jar, &claims.scope, TEST_SESSION_SECRET).unwrap();
    assert!(claims.tfa);
    assert_eq!(
        trusted.get("remember_tfa").map(|c| c.value().to_owned()),
        Some(format!("User-{}", bob.id))
    );
}

#[tokio::test]
async fn should_not_trust_device_when_remembering_disabled() {
    let bob = Fixture::user("bob");
    let (jar, claims) = signed_in(&bob).await;
    let code = current_code(&bob.second_factor, 6).unwrap();

    let (_, trusted) = verify_usecase(TwoFactorConfig::default())
        .execute(jar, SignedCookieJar::new(test_key()), &bob, &claims, &code)
        .unwrap();

    assert!(trusted.get("remember_tfa").is_none());
}

#[tokio::test]
async fn should_reject_wrong_code() {
    let bob = Fixture::user("bob");
    let alice = Fixture::user("alice");
    let (jar, claims) = signed_in(&bob).await;
    let code = current_code(&alice.second_factor, 6).unwrap();

    let result = verify_usecase(remembering()).execute(
        jar,
        SignedCookieJar::new(test_key()),
        &bob,
        &claims,
        &code,
    );

    assert!(
        matches!(result, Err(AuthServiceError::InvalidOtp)),
        "expected InvalidOtp, got {result:?}"
    );
}

// ── HTTP ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_accept_code_request_for_signed_in_user() {
    let bob = Fixture::user("bob");
    let mut session = integration_session(MockUserRepo::new(vec![bob.clone()]), remembering());
    session.sign_in(&bob, None).await.unwrap();

    let response = send(
        db_returning(&bob, 1),
        remembering(),
        request(
            Method::POST,
            "/users/two_factor/code",
            session.headers(),
            Some(&json(serde_json::json!({ "delivery_method": "voice" }))),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

#[tokio::test]
async fn should_refuse_code_request_without_session() {
    let response = send(
        db_returning(&Fixture::user("bob"), 0),
        remembering(),
        request(
            Method::POST,
            "/users/two_factor/code",
            HeaderMap::new(),
            Some("{}"),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_kind(response).await, "INVALID_SESSION");
}

#[tokio::test]
async fn should_unlock_gated_route_after_verifying_code() {
    let bob = Fixture::user("bob");
    let mut session = integration_session(MockUserRepo::new(vec![bob.clone()]), remembering());
    session.sign_in(&bob, None).await.unwrap();
    let code = current_code(&bob.second_factor, 6).unwrap();

    let verified = send(
        db_returning(&bob, 1),
        remembering(),
        request(
            Method::PUT,
            "/users/two_factor",
            session.headers(),
            Some(&json(serde_json::json!({ "code": code }))),
        ),
    )
    .await;
    assert_eq!(verified.status(), StatusCode::NO_CONTENT);
    session.store_set_cookies(verified.headers());

    assert_eq!(
        session.verified_cookie_value("remember_tfa"),
        Some(format!("User-{}", bob.id))
    );

    let me = send(
        db_returning(&bob, 1),
        remembering(),
        request(Method::GET, "/users/me", session.headers(), None),
    )
    .await;
    assert_eq!(me.status(), StatusCode::OK);
}

#[tokio::test]
async fn should_report_invalid_code_over_http() {
    let bob = Fixture::user("bob");
    let mut session = integration_session(MockUserRepo::new(vec![bob.clone()]), remembering());
    session.sign_in(&bob, None).await.unwrap();
    let code = current_code(&Fixture::user("alice").second_factor, 6).unwrap();

    let response = send(
        db_returning(&bob, 1),
        remembering(),
        request(
            Method::PUT,
            "/users/two_factor",
            session.headers(),
            Some(&json(serde_json::json!({ "code": code }))),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_kind(response).await, "INVALID_OTP");
}
