use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::{CookieJar, SignedCookieJar};
use serde::{Deserialize, Serialize};

use otpgate_auth_types::cookie::clear_session_cookie;
use otpgate_domain::user::{Authenticatable, User};

use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::session::{PasswordSignInInput, PasswordSignInUseCase};

// ── POST /users/sign_in ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

#[derive(Serialize)]
pub struct SignInResponse {
    pub two_factor_required: bool,
}

pub async fn sign_in(
    State(state): State<AppState>,
    jar: CookieJar,
    trusted: SignedCookieJar,
    Json(body): Json<SignInRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = PasswordSignInUseCase {
        authenticator: state.authenticator(body.remember_me),
        two_factor: state.two_factor.clone(),
    };

    let output = usecase
        .execute(
            jar,
            &trusted,
            PasswordSignInInput {
                email: body.email,
                password: body.password,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        output.jar,
        Json(SignInResponse {
            two_factor_required: output.two_factor_required,
        }),
    ))
}

// ── DELETE /users/sign_out ───────────────────────────────────────────────────

/// The trusted-device cookie outlives the session.
pub async fn sign_out(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let jar = clear_session_cookie(jar, &User::default_scope(), state.cookie_domain.clone());
    (StatusCode::NO_CONTENT, jar)
}
