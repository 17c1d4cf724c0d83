use axum::{
    Router,
    routing::{delete, get, post, put},
};

use otpgate_core::error::not_found;
use otpgate_core::health::healthz;
use otpgate_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};

use crate::handlers::{
    health::readyz,
    password::{request_reset, reset_password},
    registration::register,
    session::{sign_in, sign_out},
    two_factor::{send_code, verify_code},
    users::get_me,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Registration
        .route("/users", post(register))
        // Session
        .route("/users/sign_in", post(sign_in))
        .route("/users/sign_out", delete(sign_out))
        // Second factor
        .route("/users/two_factor/code", post(send_code))
        .route("/users/two_factor", put(verify_code))
        // Recovery
        .route(
            "/users/password",
            post(request_reset).put(reset_password),
        )
        // Profile
        .route("/users/me", get(get_me))
        .fallback(not_found)
        .with_state(state)
        .layer(propagate_request_id_layer())
        .layer(trace_layer())
        .layer(request_id_layer())
}
