use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};

use otpgate_auth::error::AuthServiceError;
use otpgate_auth::usecase::password::verify_password;
use otpgate_auth::usecase::recovery::{
    RequestPasswordResetUseCase, ResetPasswordInput, ResetPasswordUseCase, generate_reset_token,
    reset_token_digest,
};
use otpgate_auth_types::two_factor::TwoFactorConfig;
use otpgate_domain::credential::RecoveryToken;
use otpgate_domain::user::User;
use otpgate_domain::validation::ValidationError;
use otpgate_testing::fixture::Fixture;

use crate::helpers::{
    MockUserRepo, RecordingMailer, db_returning, empty_db, error_kind, request, send,
};

/// Bob with an outstanding reset token issued `age` ago. Returns the plain token.
fn bob_with_reset_token(age: Duration) -> (User, String) {
    let (token, digest) = generate_reset_token();
    let bob = User {
        recovery: RecoveryToken::issued(digest, Utc::now() - age),
        ..Fixture::user("bob")
    };
    (bob, token)
}

// ── RequestPasswordResetUseCase ──────────────────────────────────────────────

#[tokio::test]
async fn should_mail_token_and_store_its_digest() {
    let bob = Fixture::user("bob");
    let users = MockUserRepo::new(vec![bob.clone()]);
    let mailer = RecordingMailer::default();
    let usecase = RequestPasswordResetUseCase {
        users: users.clone(),
        mailer: mailer.clone(),
    };

    usecase.execute("Bob@Example.com").await.unwrap();

    let sent = mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    let (to, token) = &sent[0];
    assert_eq!(to, "bob@example.com");

    let stored = users.get(bob.id).unwrap().recovery;
    assert_eq!(stored.reset_password_token, Some(reset_token_digest(token)));
    assert!(stored.is_period_valid(Utc::now()));
}

#[tokio::test]
async fn should_ignore_unknown_email() {
    let mailer = RecordingMailer::default();
    let usecase = RequestPasswordResetUseCase {
        users: MockUserRepo::empty(),
        mailer: mailer.clone(),
    };

    usecase.execute("nobody@example.com").await.unwrap();

    assert!(mailer.sent.lock().unwrap().is_empty());
}

// ── ResetPasswordUseCase ─────────────────────────────────────────────────────

#[tokio::test]
async fn should_reset_password_and_consume_token() {
    let (bob, token) = bob_with_reset_token(Duration::minutes(5));
    let users = MockUserRepo::new(vec![bob.clone()]);
    let usecase = ResetPasswordUseCase {
        users: users.clone(),
    };

    usecase
        .execute(ResetPasswordInput {
            token: token.clone(),
            password: "brand-new-pass".to_owned(),
        })
        .await
        .unwrap();

    let stored = users.get(bob.id).unwrap();
    assert!(verify_password(&stored.password, "brand-new-pass").unwrap());
    assert_eq!(stored.recovery, RecoveryToken::default());

    let reused = usecase
        .execute(ResetPasswordInput {
            token,
            password: "another-pass".to_owned(),
        })
        .await;
    assert!(matches!(reused, Err(AuthServiceError::InvalidResetToken)));
}

#[tokio::test]
async fn should_reject_expired_token() {
    let (bob, token) = bob_with_reset_token(Duration::hours(7));
    let usecase = ResetPasswordUseCase {
        users: MockUserRepo::new(vec![bob]),
    };

    let result = usecase
        .execute(ResetPasswordInput {
            token,
            password: "brand-new-pass".to_owned(),
        })
        .await;

    assert!(
        matches!(result, Err(AuthServiceError::InvalidResetToken)),
        "expected InvalidResetToken, got {result:?}"
    );
}

#[tokio::test]
async fn should_keep_token_when_new_password_is_invalid() {
    let (bob, token) = bob_with_reset_token(Duration::minutes(5));
    let users = MockUserRepo::new(vec![bob.clone()]);
    let usecase = ResetPasswordUseCase {
        users: users.clone(),
    };

    let result = usecase
        .execute(ResetPasswordInput {
            token,
            password: "abc".to_owned(),
        })
        .await;

    assert!(matches!(
        result,
        Err(AuthServiceError::Validation(ValidationError::PasswordTooShort))
    ));
    assert_eq!(users.get(bob.id).unwrap().recovery, bob.recovery);
}

// ── HTTP ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_accept_reset_request_for_unknown_email() {
    let response = send(
        empty_db(1),
        TwoFactorConfig::default(),
        request(
            Method::POST,
            "/users/password",
            Default::default(),
            Some(r#"{"email":"nobody@example.com"}"#),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

#[tokio::test]
async fn should_reject_unknown_reset_token_over_http() {
    let response = send(
        empty_db(1),
        TwoFactorConfig::default(),
        request(
            Method::PUT,
            "/users/password",
            Default::default(),
            Some(r#"{"token":"bogus","password":"brand-new-pass"}"#),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_kind(response).await, "INVALID_RESET_TOKEN");
}

#[tokio::test]
async fn should_reject_expired_reset_token_over_http() {
    let (bob, token) = bob_with_reset_token(Duration::hours(7));
    let response = send(
        db_returning(&bob, 1),
        TwoFactorConfig::default(),
        request(
            Method::PUT,
            "/users/password",
            Default::default(),
            Some(&format!(r#"{{"token":"{token}","password":"brand-new-pass"}}"#)),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
