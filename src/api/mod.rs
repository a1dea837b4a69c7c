//! HTTP surface of contas.
//!
//! The router splits in two: a protected subtree (dashboard, ledger and
//! category routes) behind the session guard middleware, and public routes
//! (registration, probes, header echo) outside it.

use crate::{
    api::handlers::health,
    cli::actions::server,
    identity::{CookieIdentity, Identity, RemoteIdentity},
};
use anyhow::{Context, Result};
use axum::{
    Extension,
    body::Body,
    http::{HeaderName, HeaderValue, Method, Request},
    middleware,
    routing::options,
};
use crate::api::guard::RouteGuard;
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{Span, debug_span, info};
use ulid::Ulid;

pub mod guard;
mod handlers;
mod openapi;

pub use self::openapi::openapi;

/// Serve the API.
/// # Errors
/// Returns an error if the database connection or the server fails to start.
pub async fn new(args: server::Args) -> Result<()> {
    let pool = PgPoolOptions::new()
        .min_connections(1)
        .max_connections(5)
        .max_lifetime(Duration::from_secs(60 * 2))
        .test_before_acquire(true)
        .connect(&args.dsn)
        .await
        .context("Failed to connect to database")?;

    // Presence-based identity unless a verify endpoint was configured.
    let identity: Arc<dyn Identity> = match &args.identity_url {
        Some(url) => Arc::new(RemoteIdentity::new(url.clone())?),
        None => Arc::new(CookieIdentity),
    };

    let route_guard = Arc::new(RouteGuard::new(args.patterns, identity, args.login_path));

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_origin(Any);

    let (protected, _) = openapi::protected_router().split_for_parts();
    let protected = protected.layer(middleware::from_fn_with_state(route_guard, guard::enforce));

    let (public, _) = openapi::public_router().split_for_parts();

    let app = protected
        .merge(public)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(cors)
                .layer(Extension(pool.clone())),
        )
        .route("/health", options(health::health))
        .layer(Extension(pool));

    let listener = TcpListener::bind(format!("::0:{}", args.port)).await?;

    info!("Listening on [::]:{}", args.port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

// span
fn make_span(request: &Request<Body>) -> Span {
    let headers = request.headers();
    let path = request.uri().path();
    let request_id = headers
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");

    debug_span!("http-request", path, ?headers, request_id)
}
