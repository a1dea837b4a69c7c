//! Session identity integration.
//!
//! Session issuance, storage and login UI live outside this service. The
//! guard only needs two capabilities, kept behind the [`Identity`] trait so
//! implementations can be swapped without touching guard logic:
//!
//! - `resolve`: extract a session from request headers (`None` covers both
//!   an absent token and any resolution failure);
//! - `is_authorized`: the authorization predicate, by default token
//!   presence.
//!
//! [`CookieIdentity`] accepts any non-empty token, matching the original
//! gate behavior. [`RemoteIdentity`] additionally verifies the token against
//! an external provider and learns the subject from it.

use async_trait::async_trait;
use axum::http::{HeaderMap, header};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

/// Cookie carrying the opaque session token.
pub const SESSION_COOKIE: &str = "contas-session";

const VERIFY_TIMEOUT_SECONDS: u64 = 5;

/// Resolved session attached to allowed requests. The token stays opaque;
/// `user_id` is only present when the resolver could learn the subject.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user_id: Option<Uuid>,
}

#[async_trait]
pub trait Identity: Send + Sync {
    /// Resolve a session from request headers. Resolution failures are
    /// reported as `None`, never as an error: the guard treats both the
    /// same way.
    async fn resolve(&self, headers: &HeaderMap) -> Option<Session>;

    /// Authorization predicate over a resolved session.
    fn is_authorized(&self, session: &Session) -> bool {
        !session.token.is_empty()
    }
}

/// Extract the opaque token: session cookie first, `Authorization: Bearer`
/// as fallback for API clients.
#[must_use]
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(cookies) = headers.get(header::COOKIE).and_then(|v| v.to_str().ok())
        && let Some(token) = cookie_value(cookies, SESSION_COOKIE)
        && !token.is_empty()
    {
        return Some(token.to_string());
    }

    let auth = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = auth.strip_prefix("Bearer ")?.trim();

    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

fn cookie_value<'a>(cookie_header: &'a str, name: &str) -> Option<&'a str> {
    cookie_header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then_some(value)
    })
}

/// Presence-based identity: any non-empty token is an acceptable session.
/// Dev-format tokens that parse as a UUID carry the subject directly.
pub struct CookieIdentity;

#[async_trait]
impl Identity for CookieIdentity {
    async fn resolve(&self, headers: &HeaderMap) -> Option<Session> {
        let token = extract_token(headers)?;
        let user_id = Uuid::parse_str(&token).ok();

        Some(Session { token, user_id })
    }
}

/// Identity backed by an external provider: the resolved token is POSTed to
/// the verify endpoint, which owns validation (signature, expiry, session
/// store) and returns the subject.
pub struct RemoteIdentity {
    verify_url: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct VerifyRequest<'a> {
    token: &'a str,
}

#[derive(Deserialize)]
struct VerifyResponse {
    user_id: Uuid,
}

impl RemoteIdentity {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(verify_url: String) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .timeout(Duration::from_secs(VERIFY_TIMEOUT_SECONDS))
            .build()?;

        Ok(Self { verify_url, client })
    }

    /// `Ok(Some(_))` verified, `Ok(None)` rejected by the provider,
    /// `Err(_)` provider unreachable or misbehaving.
    async fn verify(&self, token: &str) -> anyhow::Result<Option<Uuid>> {
        let response = self
            .client
            .post(&self.verify_url)
            .json(&VerifyRequest { token })
            .send()
            .await?;

        if response.status().is_client_error() {
            return Ok(None);
        }

        let response = response.error_for_status()?;
        let body: VerifyResponse = response.json().await?;

        Ok(Some(body.user_id))
    }
}

#[async_trait]
impl Identity for RemoteIdentity {
    async fn resolve(&self, headers: &HeaderMap) -> Option<Session> {
        let token = extract_token(headers)?;

        match self.verify(&token).await {
            Ok(Some(user_id)) => Some(Session {
                token,
                user_id: Some(user_id),
            }),
            Ok(None) => {
                debug!("identity provider rejected session token");
                None
            }
            Err(err) => {
                warn!(error = %err, "identity provider unreachable, treating as no session");
                None
            }
        }
    }
}
