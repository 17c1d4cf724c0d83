use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    UpdateMany,
};

use otpgate_auth_schema::users;
use otpgate_domain::credential::{
    PasswordCredential, RecoveryToken, RememberMe, SecondFactorCredential, SignInActivity,
};
use otpgate_domain::id::UserId;
use otpgate_domain::user::User;

use crate::domain::repository::UserRepository;
use crate::error::AuthServiceError;

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, AuthServiceError> {
        let model = users::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_reset_token(&self, digest: &str) -> Result<Option<User>, AuthServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::ResetPasswordToken.eq(digest))
            .one(&self.db)
            .await
            .context("find user by reset token")?;
        Ok(model.map(user_from_model))
    }

    async fn create(&self, user: &User) -> Result<(), AuthServiceError> {
        users::ActiveModel {
            id: Set(user.id.0),
            email: Set(user.email.clone()),
            encrypted_password: Set(user.password.encrypted_password.clone()),
            otp_secret_key: Set(user.second_factor.otp_secret_key.clone()),
            reset_password_token: Set(user.recovery.reset_password_token.clone()),
            reset_password_sent_at: Set(user.recovery.reset_password_sent_at),
            remember_created_at: Set(user.remember.remember_created_at),
            sign_in_count: Set(user.activity.sign_in_count),
            current_sign_in_at: Set(user.activity.current_sign_in_at),
            last_sign_in_at: Set(user.activity.last_sign_in_at),
            created_at: Set(user.created_at),
        }
        .insert(&self.db)
        .await
        .context("insert user")?;
        Ok(())
    }

    async fn record_sign_in(
        &self,
        id: UserId,
        at: DateTime<Utc>,
        remember: bool,
    ) -> Result<bool, AuthServiceError> {
        let result = sign_in_update(id, at, remember)
            .exec(&self.db)
            .await
            .context("record sign-in")?;
        Ok(result.rows_affected > 0)
    }

    async fn set_recovery(
        &self,
        id: UserId,
        recovery: &RecoveryToken,
    ) -> Result<(), AuthServiceError> {
        users::Entity::update_many()
            .col_expr(
                users::Column::ResetPasswordToken,
                Expr::value(recovery.reset_password_token.clone()),
            )
            .col_expr(
                users::Column::ResetPasswordSentAt,
                Expr::value(recovery.reset_password_sent_at),
            )
            .filter(users::Column::Id.eq(id.0))
            .exec(&self.db)
            .await
            .context("set reset password token")?;
        Ok(())
    }

    async fn update_password(
        &self,
        id: UserId,
        password: &PasswordCredential,
    ) -> Result<(), AuthServiceError> {
        users::Entity::update_many()
            .col_expr(
                users::Column::EncryptedPassword,
                Expr::value(password.encrypted_password.clone()),
            )
            .col_expr(
                users::Column::ResetPasswordToken,
                Expr::value(Option::<String>::None),
            )
            .col_expr(
                users::Column::ResetPasswordSentAt,
                Expr::value(Option::<DateTime<Utc>>::None),
            )
            .filter(users::Column::Id.eq(id.0))
            .exec(&self.db)
            .await
            .context("update password")?;
        Ok(())
    }
}

/// Single-statement sign-in bookkeeping, so concurrent sign-ins each count.
fn sign_in_update(id: UserId, at: DateTime<Utc>, remember: bool) -> UpdateMany<users::Entity> {
    let update = users::Entity::update_many()
        .col_expr(
            users::Column::SignInCount,
            Expr::col(users::Column::SignInCount).add(1),
        )
        .col_expr(
            users::Column::LastSignInAt,
            Func::coalesce([Expr::col(users::Column::CurrentSignInAt).into(), Expr::value(at)])
                .into(),
        )
        .col_expr(users::Column::CurrentSignInAt, Expr::value(at));
    let update = if remember {
        update.col_expr(
            users::Column::RememberCreatedAt,
            Func::coalesce([Expr::col(users::Column::RememberCreatedAt).into(), Expr::value(at)])
                .into(),
        )
    } else {
        update
    };
    update.filter(users::Column::Id.eq(id.0))
}

pub fn user_from_model(model: users::Model) -> User {
    User {
        id: UserId(model.id),
        email: model.email,
        password: PasswordCredential::from_hash(model.encrypted_password),
        second_factor: SecondFactorCredential::new(model.otp_secret_key),
        recovery: RecoveryToken {
            reset_password_token: model.reset_password_token,
            reset_password_sent_at: model.reset_password_sent_at,
        },
        remember: RememberMe {
            remember_created_at: model.remember_created_at,
        },
        activity: SignInActivity {
            sign_in_count: model.sign_in_count,
            current_sign_in_at: model.current_sign_in_at,
            last_sign_in_at: model.last_sign_in_at,
        },
        created_at: model.created_at,
    }
}

/// Inverse of [`user_from_model`]; used to seed mock databases.
pub fn model_from_user(user: &User) -> users::Model {
    users::Model {
        id: user.id.0,
        email: user.email.clone(),
        encrypted_password: user.password.encrypted_password.clone(),
        otp_secret_key: user.second_factor.otp_secret_key.clone(),
        reset_password_token: user.recovery.reset_password_token.clone(),
        reset_password_sent_at: user.recovery.reset_password_sent_at,
        remember_created_at: user.remember.remember_created_at,
        sign_in_count: user.activity.sign_in_count,
        current_sign_in_at: user.activity.current_sign_in_at,
        last_sign_in_at: user.activity.last_sign_in_at,
        created_at: user.created_at,
    }
}
