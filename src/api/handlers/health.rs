//! Health probe handlers for contas.
//!
//! Three probe endpoints:
//! - `/live`: process liveness only (no dependency checks)
//! - `/ready`: database-aware readiness for orchestrators
//! - `/health`: database-aware status with detailed JSON payload

use crate::GIT_COMMIT_HASH;
use axum::{
    body::Body,
    extract::Extension,
    http::{HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use sqlx::{Connection, PgPool};
use tokio::time::{Duration, timeout};
use tracing::{Instrument, debug, error, info_span, warn};
use utoipa::ToSchema;

const HEALTH_DB_TIMEOUT_SECONDS: u64 = 2;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Health {
    commit: String,
    name: String,
    version: String,
    database: String,
}

#[utoipa::path(
    get,
    path= "/live",
    responses (
        (status = 200, description = "Process is alive")
    ),
    tag = "health",
)]
/// Report process liveness without checking external dependencies.
pub async fn live() -> impl IntoResponse {
    StatusCode::OK
}

#[utoipa::path(
    get,
    path= "/ready",
    responses (
        (status = 200, description = "Service is ready to receive traffic"),
        (status = 503, description = "Service dependencies are not ready")
    ),
    tag = "health",
)]
/// Report readiness based on database connectivity.
pub async fn ready(pool: Extension<PgPool>) -> impl IntoResponse {
    if database_is_healthy(&pool.0).await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

#[utoipa::path(
    get,
    path= "/health",
    responses (
        (status = 200, description = "Database connection is healthy", body = Health),
        (status = 503, description = "Database connection is unhealthy", body = Health)
    ),
    tag = "health",
)]
/// Perform a detailed health check.
pub async fn health(method: Method, pool: Extension<PgPool>) -> impl IntoResponse {
    let db_healthy = database_is_healthy(&pool.0).await;

    let health = Health {
        commit: GIT_COMMIT_HASH.to_string(),
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: if db_healthy {
            "ok".to_string()
        } else {
            "error".to_string()
        },
    };

    let body = if method == Method::GET {
        Json(&health).into_response()
    } else {
        Body::empty().into_response()
    };

    let headers = app_headers(&health);

    if db_healthy {
        (StatusCode::OK, headers, body)
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, headers, body)
    }
}

/// `X-App: name:version:short-commit` for quick fleet identification.
fn app_headers(health: &Health) -> HeaderMap {
    let short_hash = if health.commit.len() > 7 {
        &health.commit[0..7]
    } else {
        ""
    };

    format!("{}:{}:{}", health.name, health.version, short_hash)
        .parse::<HeaderValue>()
        .map(|x_app_header_value| {
            debug!("X-App header: {:?}", x_app_header_value);

            let mut headers = HeaderMap::new();
            headers.insert("X-App", x_app_header_value);
            headers
        })
        .map_err(|err| {
            debug!("Failed to parse X-App header: {}", err);
        })
        .unwrap_or_else(|()| HeaderMap::new())
}

/// Probe database connectivity used by `/ready` and `/health`.
async fn database_is_healthy(pool: &PgPool) -> bool {
    let acquire_span = info_span!(
        "db.acquire",
        db.system = "postgresql",
        db.operation = "ACQUIRE"
    );

    let probe = timeout(Duration::from_secs(HEALTH_DB_TIMEOUT_SECONDS), async {
        match pool.acquire().instrument(acquire_span).await {
            Ok(mut conn) => {
                let ping_span =
                    info_span!("db.ping", db.system = "postgresql", db.operation = "PING");
                match conn.ping().instrument(ping_span).await {
                    Ok(()) => true,
                    Err(error) => {
                        error!("Failed to ping database: {}", error);
                        false
                    }
                }
            }

            Err(error) => {
                error!("Failed to acquire database connection: {}", error);
                false
            }
        }
    })
    .await;

    match probe {
        Ok(healthy) => {
            if healthy {
                debug!("Database connection is healthy");
            } else {
                debug!("Database connection is unhealthy");
            }
            healthy
        }
        Err(_) => {
            warn!("Database health check timed out");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_health(commit: &str) -> Health {
        Health {
            commit: commit.to_string(),
            name: "contas".to_string(),
            version: "0.1.0".to_string(),
            database: "ok".to_string(),
        }
    }

    #[test]
    fn app_header_uses_short_commit() {
        let headers = app_headers(&test_health("0123456789abcdef"));
        let value = headers.get("X-App").and_then(|v| v.to_str().ok());
        assert_eq!(value, Some("contas:0.1.0:0123456"));
    }

    #[test]
    fn app_header_short_commit_is_blank_for_unknown() {
        let headers = app_headers(&test_health("unknown"));
        let value = headers.get("X-App").and_then(|v| v.to_str().ok());
        assert_eq!(value, Some("contas:0.1.0:"));
    }

    #[tokio::test]
    async fn live_is_always_ok() {
        let response = live().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
