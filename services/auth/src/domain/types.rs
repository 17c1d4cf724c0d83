/// OTP time step in seconds.
pub const OTP_STEP_SECS: u64 = 30;

/// Accepted OTP steps either side of the current one.
pub const OTP_SKEW: u8 = 1;

/// Bytes of entropy in a new OTP secret.
pub const OTP_SECRET_BYTES: usize = 20;

/// Bytes of entropy in a password-reset token.
pub const RESET_TOKEN_BYTES: usize = 20;
