use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::recovery::{
    RequestPasswordResetUseCase, ResetPasswordInput, ResetPasswordUseCase,
};

// ── POST /users/password ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RequestResetRequest {
    pub email: String,
}

/// Always 202, whether or not the address belongs to an account.
pub async fn request_reset(
    State(state): State<AppState>,
    Json(body): Json<RequestResetRequest>,
) -> Result<StatusCode, AuthServiceError> {
    let usecase = RequestPasswordResetUseCase {
        users: state.user_repo(),
        mailer: state.mailer.clone(),
    };
    usecase.execute(&body.email).await?;
    Ok(StatusCode::ACCEPTED)
}

// ── PUT /users/password ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<StatusCode, AuthServiceError> {
    let usecase = ResetPasswordUseCase {
        users: state.user_repo(),
    };
    usecase
        .execute(ResetPasswordInput {
            token: body.token,
            password: body.password,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
