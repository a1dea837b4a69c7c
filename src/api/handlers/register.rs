//! Account registration.
//!
//! Passwords are hashed with Argon2id before touching the database; the
//! clear-text password never leaves this handler.

use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{error, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema, Deserialize, Debug)]
pub struct NewUser {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema, Serialize, Debug, sqlx::FromRow)]
pub struct RegisteredUser {
    pub id: Uuid,
    pub email: String,
}

#[utoipa::path(
    post,
    path= "/register",
    request_body = NewUser,
    responses (
        (status = 201, description = "Account created", body = RegisteredUser),
        (status = 400, description = "Missing or invalid email/password"),
        (status = 409, description = "Email already registered")
    ),
    tag = "contas",
)]
#[instrument(skip(pool, payload))]
pub async fn register(
    Extension(pool): Extension<PgPool>,
    payload: Option<Json<NewUser>>,
) -> Response {
    let Some(Json(payload)) = payload else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    let email = payload.email.trim().to_lowercase();

    if email.is_empty() || !email.contains('@') || payload.password.is_empty() {
        return StatusCode::BAD_REQUEST.into_response();
    }

    let password_hash = match hash_password(&payload.password) {
        Ok(hash) => hash,
        Err(error) => {
            error!("Failed to hash password: {}", error);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let created = sqlx::query_as::<_, RegisteredUser>(
        "INSERT INTO users (email, password_hash) VALUES ($1, $2) RETURNING id, email",
    )
    .bind(&email)
    .bind(&password_hash)
    .fetch_one(&pool)
    .await;

    match created {
        Ok(user) => (StatusCode::CREATED, Json(user)).into_response(),
        Err(error) => {
            if super::is_unique_violation(&error) {
                return StatusCode::CONFLICT.into_response();
            }
            error!("Failed to create user: {}", error);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| anyhow::anyhow!("argon2: {err}"))?;

    Ok(hash.to_string())
}
