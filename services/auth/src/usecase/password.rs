//! Password hashing (argon2id, PHC strings).

use anyhow::anyhow;
use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

use otpgate_domain::credential::PasswordCredential;

use crate::error::AuthServiceError;

pub fn hash_password(plain: &str) -> Result<PasswordCredential, AuthServiceError> {
    let salt_bytes: [u8; 16] = rand::random();
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| anyhow!("failed to encode password salt: {e}"))?;
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| anyhow!("failed to hash password: {e}"))?;
    Ok(PasswordCredential::from_hash(hash.to_string()))
}

/// `Ok(false)` on mismatch; `Err` only if the stored hash is unparsable.
pub fn verify_password(
    credential: &PasswordCredential,
    plain: &str,
) -> Result<bool, AuthServiceError> {
    let parsed = PasswordHash::new(credential.as_str())
        .map_err(|e| anyhow!("invalid password hash: {e}"))?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}
