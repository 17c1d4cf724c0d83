use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// An error that renders as the shared `{"kind", "message"}` JSON body.
pub trait ApiError: std::fmt::Display {
    /// Machine-readable kind, e.g. `"NOT_FOUND"`.
    fn kind(&self) -> &'static str;

    fn status(&self) -> StatusCode;

    /// Cause to log for 5xx responses.
    fn internal_cause(&self) -> Option<&anyhow::Error> {
        None
    }
}

/// Render `err` as a JSON error response.
pub fn json_error_response<E: ApiError>(err: &E) -> Response {
    // Log 500s only; tower-http TraceLayer already records method/uri/status for all
    // requests. 4xx are expected client errors.
    if let Some(cause) = err.internal_cause() {
        tracing::error!(error = ?cause, kind = err.kind(), "internal error");
    }
    let body = serde_json::json!({
        "kind": err.kind(),
        "message": err.to_string(),
    });
    (err.status(), axum::Json(body)).into_response()
}

/// Errors not tied to a particular service.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("not found")]
    NotFound,
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError for AppError {
    fn kind(&self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::Internal(_) => "INTERNAL",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
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

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        json_error_response(&self)
    }
}

/// Router fallback for unknown paths.
pub async fn not_found() -> AppError {
    AppError::NotFound
}
