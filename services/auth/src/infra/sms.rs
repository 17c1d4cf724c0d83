use std::convert::Infallible;

use otpgate_domain::sms::SmsTransport;

/// Development transport: records the delivery without contacting a carrier.
/// The message body carries a live one-time code and is never logged.
#[derive(Debug, Clone, Default)]
pub struct LogSmsTransport;

impl SmsTransport for LogSmsTransport {
    type Error = Infallible;

    async fn send_message(&self, to: &str, _body: &str) -> Result<(), Self::Error> {
        tracing::info!(to, "sms delivered");
        Ok(())
    }
}
