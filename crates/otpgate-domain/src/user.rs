//! User domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::credential::{
    PasswordCredential, RecoveryToken, RememberMe, SecondFactorCredential, SignInActivity,
};
use crate::id::UserId;
use crate::scope::Scope;
use crate::sms::SmsTransport;

/// Phone number every user reports until numbers are persisted.
pub const STUB_PHONE_NUMBER: &str = "14159341234";

/// Identifies a resource for the trusted-device cookie.
///
/// The returned value is what the cookie is bound to, so it must be stable for
/// the lifetime of the resource.
pub trait SecondFactorIdentifiable {
    fn second_factor_resource_id(&self) -> String;
}

/// A resource that can be signed into a session.
pub trait Authenticatable: SecondFactorIdentifiable {
    /// Type name written into the trusted-device cookie.
    const RESOURCE_TYPE: &'static str;

    /// Value stored as the session token subject.
    fn session_subject(&self) -> String;

    /// Scope used when the caller does not name one.
    ///
    /// # Panics
    ///
    /// Panics if `RESOURCE_TYPE` does not yield a valid scope name (e.g. it is empty).
    fn default_scope() -> Scope {
        Scope::for_resource_type(Self::RESOURCE_TYPE)
            .expect("RESOURCE_TYPE must be a non-empty ASCII type name")
    }
}

/// Channel a caller asks the one-time code to be delivered through.
///
/// Wire format: `"sms"` / `"voice"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMethod {
    #[default]
    Sms,
    Voice,
}

/// A user account with its credential collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub password: PasswordCredential,
    pub second_factor: SecondFactorCredential,
    pub recovery: RecoveryToken,
    pub remember: RememberMe,
    pub activity: SignInActivity,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Fixed stub; numbers are not persisted yet.
    pub fn phone_number(&self) -> &str {
        STUB_PHONE_NUMBER
    }

    /// Forward a one-time code to the user's phone.
    ///
    /// Always delivered by SMS. `delivery_method` is accepted for API
    /// compatibility but does not select a channel.
    pub async fn send_two_factor_authentication_code<T: SmsTransport>(
        &self,
        transport: &T,
        code: &str,
        _delivery_method: DeliveryMethod,
    ) -> Result<(), T::Error> {
        transport.send_message(self.phone_number(), code).await
    }

    /// Every user is challenged for a second factor.
    pub fn need_two_factor_authentication(&self) -> bool {
        true
    }
}

impl SecondFactorIdentifiable for User {
    fn second_factor_resource_id(&self) -> String {
        self.id.to_string()
    }
}

impl Authenticatable for User {
    const RESOURCE_TYPE: &'static str = "User";

    fn session_subject(&self) -> String {
        self.id.to_string()
    }
}
