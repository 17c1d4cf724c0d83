use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use otpgate_core::serde::{opt_to_rfc3339_ms, to_rfc3339_ms};
use otpgate_domain::id::UserId;
use otpgate_domain::user::User;

use crate::extract::TwoFactorVerified;

#[derive(Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub email: String,
    pub sign_in_count: i32,
    #[serde(serialize_with = "opt_to_rfc3339_ms")]
    pub current_sign_in_at: Option<DateTime<Utc>>,
    #[serde(serialize_with = "opt_to_rfc3339_ms")]
    pub last_sign_in_at: Option<DateTime<Utc>>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            sign_in_count: user.activity.sign_in_count,
            current_sign_in_at: user.activity.current_sign_in_at,
            last_sign_in_at: user.activity.last_sign_in_at,
            created_at: user.created_at,
        }
    }
}

// ── GET /users/me ────────────────────────────────────────────────────────────

pub async fn get_me(TwoFactorVerified(user): TwoFactorVerified) -> Json<UserResponse> {
    Json(UserResponse::from(&user))
}
