use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sea_orm::DatabaseConnection;

use otpgate_auth_types::two_factor::TwoFactorConfig;

use crate::infra::db::DbUserRepository;
use crate::infra::mailer::LogMailer;
use crate::infra::sms::LogSmsTransport;
use crate::usecase::session::SessionAuthenticator;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    /// HMAC secret for session tokens.
    pub session_secret: String,
    /// Signs the trusted-device cookie.
    pub cookie_key: Key,
    pub cookie_domain: String,
    pub two_factor: TwoFactorConfig,
    pub sms: LogSmsTransport,
    pub mailer: LogMailer,
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn authenticator(&self, remember_me: bool) -> SessionAuthenticator<DbUserRepository> {
        SessionAuthenticator {
            users: self.user_repo(),
            session_secret: self.session_secret.clone(),
            cookie_domain: self.cookie_domain.clone(),
            remember_me,
        }
    }
}
