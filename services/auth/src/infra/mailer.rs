use crate::domain::repository::Mailer;
use crate::error::AuthServiceError;

/// Development mailer: records the delivery instead of sending mail.
/// The reset token is a bearer credential and is never logged.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    async fn send_reset_password_instructions(
        &self,
        to: &str,
        _token: &str,
    ) -> Result<(), AuthServiceError> {
        tracing::info!(to, "reset password instructions delivered");
        Ok(())
    }
}
