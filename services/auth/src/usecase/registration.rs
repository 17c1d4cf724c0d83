use chrono::Utc;

use otpgate_domain::credential::{RecoveryToken, RememberMe, SignInActivity};
use otpgate_domain::id::UserId;
use otpgate_domain::user::User;
use otpgate_domain::validation::{validate_email, validate_password};

use crate::domain::repository::UserRepository;
use crate::error::AuthServiceError;
use crate::usecase::password::hash_password;
use crate::usecase::session::normalize_email;
use crate::usecase::two_factor::generate_otp_secret;

pub struct RegisterInput {
    pub email: String,
    pub password: String,
}

pub struct RegisterUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> RegisterUseCase<U> {
    pub async fn execute(&self, input: RegisterInput) -> Result<User, AuthServiceError> {
        // 1. Validate input → 422
        let email = normalize_email(&input.email);
        validate_email(&email)?;
        validate_password(&input.password)?;

        // 2. Email must be unused → 409
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthServiceError::EmailTaken);
        }

        // 3. Hash password and provision the OTP secret
        let user = User {
            id: UserId::generate(),
            email,
            password: hash_password(&input.password)?,
            second_factor: generate_otp_secret()?,
            recovery: RecoveryToken::default(),
            remember: RememberMe::default(),
            activity: SignInActivity::default(),
            created_at: Utc::now(),
        };
        self.users.create(&user).await?;

        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }
}
