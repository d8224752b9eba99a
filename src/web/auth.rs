use crate::db;
use crate::domain::models::UserRole;
use crate::error::ApiError;
use crate::state::SharedState;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, SaltString},
    Argon2, PasswordVerifier,
};
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub role: UserRole,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .with_state(state)
}

async fn login(
    State(state): State<SharedState>,
    Json(payload): Json<Credentials>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = db::find_user_by_username(&state.pool, &payload.username)
        .await?
        .ok_or(ApiError::Unauthorized("Неверное имя пользователя или пароль"))?;

    let parsed_hash = PasswordHash::new(&user.hash)
        .map_err(|_| ApiError::Unauthorized("Неверное имя пользователя или пароль"))?;
    Argon2::default()
        .verify_password(payload.password.as_bytes(), &parsed_hash)
        .map_err(|_| ApiError::Unauthorized("Неверное имя пользователя или пароль"))?;

    Ok(Json(UserResponse {
        id: user.id,
        username: user.username,
        role: user.role,
    }))
}

async fn register(
    State(state): State<SharedState>,
    Json(payload): Json<Credentials>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation("Не указано имя пользователя или пароль"));
    }

    if db::find_user_by_username(&state.pool, &payload.username)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict(
            "Пользователь с таким именем уже существует",
        ));
    }

    let hash = hash_password(&payload.password)?;
    let user = db::insert_user(&state.pool, &payload.username, &hash, UserRole::User).await?;
    tracing::info!("Registered user {}", user.id);

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            id: user.id,
            username: user.username,
            role: user.role,
        }),
    ))
}

fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(rand_core::OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("hash error: {e}")))?;
    Ok(hash.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_verify_roundtrip() {
        let hash = hash_password("секрет123").unwrap();

        let parsed = PasswordHash::new(&hash).unwrap();
        assert!(Argon2::default()
            .verify_password("секрет123".as_bytes(), &parsed)
            .is_ok());
        assert!(Argon2::default()
            .verify_password("другой".as_bytes(), &parsed)
            .is_err());
    }
}
