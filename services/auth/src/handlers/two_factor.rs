use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::{CookieJar, SignedCookieJar};
use serde::Deserialize;

use otpgate_domain::user::DeliveryMethod;

use crate::error::AuthServiceError;
use crate::extract::CurrentUser;
use crate::state::AppState;
use crate::usecase::two_factor::{SendCodeUseCase, VerifyCodeUseCase};

// ── POST /users/two_factor/code ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SendCodeRequest {
    #[serde(default)]
    pub delivery_method: DeliveryMethod,
}

pub async fn send_code(
    State(state): State<AppState>,
    CurrentUser { user, .. }: CurrentUser,
    Json(body): Json<SendCodeRequest>,
) -> Result<StatusCode, AuthServiceError> {
    let usecase = SendCodeUseCase {
        sms: state.sms.clone(),
        otp_length: state.two_factor.otp_length,
    };
    usecase.execute(&user, body.delivery_method).await?;
    Ok(StatusCode::ACCEPTED)
}

// ── PUT /users/two_factor ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyCodeRequest {
    pub code: String,
}

pub async fn verify_code(
    State(state): State<AppState>,
    CurrentUser { user, claims }: CurrentUser,
    jar: CookieJar,
    trusted: SignedCookieJar,
    Json(body): Json<VerifyCodeRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = VerifyCodeUseCase {
        session_secret: state.session_secret.clone(),
        cookie_domain: state.cookie_domain.clone(),
        two_factor: state.two_factor.clone(),
    };
    let (jar, trusted) = usecase.execute(jar, trusted, &user, &claims, &body.code)?;
    Ok((StatusCode::NO_CONTENT, jar, trusted))
}
