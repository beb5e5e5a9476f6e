use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::{LoginRequest, SignupRequest, UpdatePasswordRequest},
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo::UserRepo,
        repo_types::User,
    },
    error::{AppError, AppResult},
};

const MISSING_FIELDS: &str = "Missing required fields";

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Treats an empty string the same as an absent field.
fn present(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.is_empty())
}

pub async fn signup(users: &dyn UserRepo, req: SignupRequest) -> AppResult<User> {
    let (Some(name), Some(email), Some(password)) = (
        present(req.name.map(|n| n.trim().to_string())),
        present(req.email.map(|e| normalize_email(&e))),
        present(req.password),
    ) else {
        return Err(AppError::Validation(MISSING_FIELDS.into()));
    };

    if users.find_by_name(&name).await?.is_some() {
        warn!(name = %name, "user already exists");
        return Err(AppError::Conflict("User already exists".into()));
    }

    let user = User {
        id: Uuid::new_v4(),
        name,
        email,
        password_hash: hash_password(&password)?,
    };

    match users.insert(&user).await {
        Ok(()) => {
            info!(user_id = %user.id, name = %user.name, "user created");
            Ok(user)
        }
        // lost a race against a concurrent signup with the same name
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            warn!(name = %user.name, "user already exists");
            Err(AppError::Conflict("User already exists".into()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Verifies the credentials and returns a freshly signed session token.
pub async fn login(users: &dyn UserRepo, keys: &JwtKeys, req: LoginRequest) -> AppResult<String> {
    let email = normalize_email(&req.email);

    let Some(user) = users.find_by_email(&email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(AppError::UserNotFound("Email not found".into()));
    };

    if !verify_password(&req.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::InvalidCredentials("Invalid credentials".into()));
    }

    let token = keys.sign(user.id)?;
    info!(user_id = %user.id, "user logged in");
    Ok(token)
}

pub async fn update_password(users: &dyn UserRepo, req: UpdatePasswordRequest) -> AppResult<()> {
    let (Some(email), Some(old_password), Some(new_password)) = (
        present(req.email.map(|e| normalize_email(&e))),
        present(req.old_password),
        present(req.new_password),
    ) else {
        return Err(AppError::Validation(MISSING_FIELDS.into()));
    };

    let Some(user) = users.find_by_email(&email).await? else {
        warn!(email = %email, "password update for unknown user");
        return Err(AppError::UserNotFound("User not found".into()));
    };

    if !verify_password(&old_password, &user.password_hash)? {
        warn!(user_id = %user.id, "password update with wrong current password");
        return Err(AppError::InvalidCredentials("Invalid current password".into()));
    }

    let hash = hash_password(&new_password)?;
    if users.update_password_hash(user.id, &hash).await? == 0 {
        return Err(AppError::UserNotFound("User not found".into()));
    }

    info!(user_id = %user.id, "password updated");
    Ok(())
}
