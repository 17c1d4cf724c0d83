use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use otpgate_core::error::{ApiError, json_error_response};
use otpgate_domain::validation::ValidationError;

/// Auth service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("user not found")]
    UserNotFound,
    #[error("invalid email or password")]
    InvalidCredential,
    #[error("session expired")]
    InvalidSession,
    #[error("two-factor authentication required")]
    TwoFactorRequired,
    #[error("invalid one-time password")]
    InvalidOtp,
    #[error("invalid reset password token")]
    InvalidResetToken,
    #[error("email has already been taken")]
    EmailTaken,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError for AuthServiceError {
    fn kind(&self) -> &'static str {
        match self {
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::InvalidCredential => "INVALID_CREDENTIAL",
            Self::InvalidSession => "INVALID_SESSION",
            Self::TwoFactorRequired => "TWO_FACTOR_REQUIRED",
            Self::InvalidOtp => "INVALID_OTP",
            Self::InvalidResetToken => "INVALID_RESET_TOKEN",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::Validation(_) => "VALIDATION",
            Self::Internal(_) => "INTERNAL",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::InvalidCredential
            | Self::InvalidSession
            | Self::TwoFactorRequired
            | Self::InvalidOtp
            | Self::InvalidResetToken => StatusCode::UNAUTHORIZED,
            Self::EmailTaken => StatusCode::CONFLICT,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn internal_cause(&self) -> Option<&anyhow::Error> {
        match self {
            Self::Internal(e) => Some(e),
            _ => None,
        }
    }
}

impl IntoResponse for AuthServiceError {
    fn into_response(self) -> Response {
        json_error_response(&self)
    }
}
