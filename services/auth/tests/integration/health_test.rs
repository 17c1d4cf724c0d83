use axum::http::{HeaderMap, Method, StatusCode};

use otpgate_auth_types::two_factor::TwoFactorConfig;

use crate::helpers::{empty_db, error_kind, request, send};

#[tokio::test]
async fn should_answer_liveness_check() {
    let response = send(
        empty_db(0),
        TwoFactorConfig::default(),
        request(Method::GET, "/healthz", HeaderMap::new(), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn should_return_not_found_for_unknown_route() {
    let response = send(
        empty_db(0),
        TwoFactorConfig::default(),
        request(Method::GET, "/users/nope/nope", HeaderMap::new(), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_kind(response).await, "NOT_FOUND");
}
