//! Authentication scopes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Named partition of the session, e.g. `user` or `admin`.
///
/// Each scope carries its own session cookie, so several kinds of resource can
/// be signed in side by side. Names are lowercase ASCII letters, digits and `_`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Scope(String);

/// Returned when a scope name contains anything but `[a-z0-9_]`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid scope name: {0:?}")]
pub struct InvalidScope(pub String);

impl Scope {
    pub fn new(name: impl Into<String>) -> Result<Self, InvalidScope> {
        let name = name.into();
        let valid = !name.is_empty()
            && name
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_');
        if valid {
            Ok(Self(name))
        } else {
            Err(InvalidScope(name))
        }
    }

    /// Default scope for a resource type name: `"AdminUser"` → `admin_user`,
    /// `"HTTPUser"` → `http_user`.
    pub fn for_resource_type(resource_type: &str) -> Result<Self, InvalidScope> {
        let chars: Vec<char> = resource_type.chars().collect();
        let mut name = String::with_capacity(chars.len() + 4);
        for (i, &c) in chars.iter().enumerate() {
            if c.is_ascii_uppercase() {
                let prev = i.checked_sub(1).map(|p| chars[p]);
                let next = chars.get(i + 1);
                let after_word = prev.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit());
                let ends_acronym = prev.is_some_and(|p| p.is_ascii_uppercase())
                    && next.is_some_and(|n| n.is_ascii_lowercase());
                if after_word || ends_acronym {
                    name.push('_');
                }
                name.push(c.to_ascii_lowercase());
            } else if c.is_ascii_alphanumeric() {
                name.push(c);
            } else {
                name.push('_');
            }
        }
        Self::new(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Scope {
    type Err = InvalidScope;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Scope {
    type Error = InvalidScope;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Scope> for String {
    fn from(scope: Scope) -> Self {
        scope.0
    }
}
