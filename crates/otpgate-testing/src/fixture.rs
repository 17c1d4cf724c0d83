//! Fixture loader.
//!
//! Loads JSON fixtures from the workspace `fixtures/` directory.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use otpgate_domain::credential::{
    PasswordCredential, RecoveryToken, RememberMe, SecondFactorCredential, SignInActivity,
};
use otpgate_domain::id::UserId;
use otpgate_domain::user::User;

/// Placeholder hash for fixtures that never sign in with a password.
pub const FIXTURE_PASSWORD_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$Zml4dHVyZXNhbHQ$fixture";

#[derive(Deserialize)]
struct UserFixture {
    id: Uuid,
    email: String,
    otp_secret_key: String,
    #[serde(default)]
    sign_in_count: i32,
}

/// Load fixtures relative to the workspace root.
///
/// # Example
/// ```no_run
/// use otpgate_testing::fixture::Fixture;
/// let bob = Fixture::user("bob");
/// assert_eq!(bob.email, "bob@example.com");
/// ```
pub struct Fixture;

impl Fixture {
    fn workspace_root() -> PathBuf {
        let start = std::env::var("CARGO_MANIFEST_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| std::env::current_dir().unwrap());
        start
            .ancestors()
            .find(|a| a.join("fixtures").is_dir())
            .map(Path::to_path_buf)
            .unwrap_or(start)
    }

    /// Load and parse a fixture JSON file at `workspace_root/path`.
    ///
    /// Panics if the file is missing or invalid JSON.
    pub fn load(relative_path: &str) -> Value {
        let full_path = Self::workspace_root().join(relative_path);
        let contents = std::fs::read_to_string(&full_path)
            .unwrap_or_else(|e| panic!("fixture not found at {}: {}", full_path.display(), e));
        serde_json::from_str(&contents)
            .unwrap_or_else(|e| panic!("invalid JSON in fixture {}: {}", relative_path, e))
    }

    /// Named user from `fixtures/users.json`, e.g. `Fixture::user("bob")`.
    ///
    /// Panics if the name is unknown.
    pub fn user(name: &str) -> User {
        let all = Self::load("fixtures/users.json");
        let entry = all
            .get(name)
            .cloned()
            .unwrap_or_else(|| panic!("no user fixture named {name:?}"));
        let fixture: UserFixture = serde_json::from_value(entry)
            .unwrap_or_else(|e| panic!("invalid user fixture {name:?}: {e}"));
        User {
            id: UserId(fixture.id),
            email: fixture.email,
            password: PasswordCredential::from_hash(FIXTURE_PASSWORD_HASH),
            second_factor: SecondFactorCredential::new(fixture.otp_secret_key),
            recovery: RecoveryToken::default(),
            remember: RememberMe::default(),
            activity: SignInActivity {
                sign_in_count: fixture.sign_in_count,
                ..SignInActivity::default()
            },
            created_at: Utc::now(),
        }
    }
}
