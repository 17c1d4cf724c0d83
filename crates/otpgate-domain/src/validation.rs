//! Field validation for user accounts.

/// Accepted password length in characters (inclusive).
pub const PASSWORD_LENGTH: std::ops::RangeInclusive<usize> = 6..=128;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("email can't be blank")]
    EmailBlank,
    #[error("email is invalid")]
    EmailInvalid,
    #[error("password can't be blank")]
    PasswordBlank,
    #[error("password is too short (minimum is 6 characters)")]
    PasswordTooShort,
    #[error("password is too long (maximum is 128 characters)")]
    PasswordTooLong,
}

/// Exactly one `@`, something on both sides, no whitespace.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::EmailBlank);
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationError::EmailInvalid);
    };
    let well_formed = !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace);
    if well_formed {
        Ok(())
    } else {
        Err(ValidationError::EmailInvalid)
    }
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let len = password.chars().count();
    if len == 0 {
        Err(ValidationError::PasswordBlank)
    } else if len < *PASSWORD_LENGTH.start() {
        Err(ValidationError::PasswordTooShort)
    } else if len > *PASSWORD_LENGTH.end() {
        Err(ValidationError::PasswordTooLong)
    } else {
        Ok(())
    }
}
