#![allow(async_fn_in_trait)]

//! SMS delivery port.

/// Outbound SMS transport.
///
/// Delivery confirmation semantics belong to the implementation; callers
/// receive its result unchanged.
pub trait SmsTransport: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn send_message(&self, to: &str, body: &str) -> Result<(), Self::Error>;
}
