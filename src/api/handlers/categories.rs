//! Category handlers (`/categorias`).
//!
//! Every query is scoped by the session subject, so one user can never see
//! or collide with another user's categories.

use crate::{identity::Session, labels};
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

#[derive(ToSchema, Serialize, Debug, sqlx::FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
}

#[derive(ToSchema, Deserialize, Debug)]
pub struct NewCategory {
    pub name: String,
}

#[utoipa::path(
    get,
    path= "/categorias",
    responses (
        (status = 200, description = "Categories for the current user", body = [Category]),
        (status = 401, description = "Session subject unknown")
    ),
    tag = "categorias",
)]
#[instrument(skip(pool, session))]
pub async fn categories(
    Extension(pool): Extension<PgPool>,
    Extension(session): Extension<Session>,
) -> Response {
    let Some(user_id) = session.user_id else {
        return StatusCode::UNAUTHORIZED.into_response();
    };

    let rows = sqlx::query_as::<_, Category>(
        "SELECT id, name FROM categories WHERE user_id = $1 ORDER BY name",
    )
    .bind(user_id)
    .fetch_all(&pool)
    .await;

    match rows {
        Ok(rows) => Json(rows).into_response(),
        Err(error) => {
            error!("Failed to list categories: {}", error);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[utoipa::path(
    post,
    path= "/categorias",
    description = "Create a category. The name is stored title-cased \
                   (pt-BR connectives lowercased), so case-only variants \
                   of an existing name conflict.",
    request_body = NewCategory,
    responses (
        (status = 201, description = "Category created, name title-cased", body = Category),
        (status = 400, description = "Missing or empty name"),
        (status = 401, description = "Session subject unknown"),
        (status = 409, description = "Category name already exists for this user")
    ),
    tag = "categorias",
)]
#[instrument(skip(pool, session, payload))]
pub async fn create_category(
    Extension(pool): Extension<PgPool>,
    Extension(session): Extension<Session>,
    payload: Option<Json<NewCategory>>,
) -> Response {
    let Some(user_id) = session.user_id else {
        return StatusCode::UNAUTHORIZED.into_response();
    };

    let Some(Json(payload)) = payload else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    // Names are normalized for display so the per-user UNIQUE constraint
    // also catches case-only duplicates.
    let name = labels::title_case(payload.name.trim());
    if name.is_empty() {
        return StatusCode::BAD_REQUEST.into_response();
    }

    let created = sqlx::query_as::<_, Category>(
        "INSERT INTO categories (user_id, name) VALUES ($1, $2) RETURNING id, name",
    )
    .bind(user_id)
    .bind(&name)
    .fetch_one(&pool)
    .await;

    match created {
        Ok(category) => (StatusCode::CREATED, Json(category)).into_response(),
        Err(error) => {
            if super::is_unique_violation(&error) {
                return StatusCode::CONFLICT.into_response();
            }
            error!("Failed to create category: {}", error);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
