use lazy_static::lazy_static;
use tracing::{info, instrument, warn};

use super::{
    dto::{AuthSession, LoginInput, RegisterInput},
    jwt::JwtKeys,
    password::{hash_password, verify_password},
    repo::UserRepository,
};
use crate::error::{AppError, AppResult, RepoError};

pub const INVALID_CREDENTIALS: &str = "Invalid email or password";
pub const EMAIL_TAKEN: &str = "User already exists with this email";

lazy_static! {
    // Verified against when the email is unknown so both failure paths cost the same.
    static ref DUMMY_HASH: Option<String> = hash_password("todo-api-timing-guard").ok();
}

#[instrument(skip(users, keys, input), fields(email = %input.email))]
pub async fn register(
    users: &dyn UserRepository,
    keys: &JwtKeys,
    input: RegisterInput,
) -> AppResult<AuthSession> {
    if users.find_by_email(&input.email).await?.is_some() {
        warn!("email already registered");
        return Err(AppError::Conflict(EMAIL_TAKEN));
    }

    let hash = hash_password(&input.password)?;

    let user = match users.create(&input.email, &hash, input.name.as_deref()).await {
        Ok(u) => u,
        Err(RepoError::Conflict) => {
            warn!("email registered concurrently");
            return Err(AppError::Conflict(EMAIL_TAKEN));
        }
        Err(e) => return Err(e.into()),
    };

    let token = keys.sign(user.id, &user.email)?;
    info!(user_id = %user.id, "user registered");
    Ok(AuthSession { user: user.into(), token })
}

#[instrument(skip(users, keys, input), fields(email = %input.email))]
pub async fn login(
    users: &dyn UserRepository,
    keys: &JwtKeys,
    input: LoginInput,
) -> AppResult<AuthSession> {
    let Some(user) = users.find_by_email(&input.email).await? else {
        if let Some(dummy) = DUMMY_HASH.as_deref() {
            let _ = verify_password(&input.password, dummy);
        }
        warn!("login unknown email");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS));
    };

    if !verify_password(&input.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS));
    }

    let token = keys.sign(user.id, &user.email)?;
    info!(user_id = %user.id, "user logged in");
    Ok(AuthSession { user: user.into(), token })
}
