//! Session route guard.
//!
//! Decides, per request, whether a path under the protected patterns may
//! proceed. The guard holds no mutable state: configuration (pattern set,
//! identity integration, login path) is fixed at startup and requests are
//! evaluated independently, so concurrent evaluation needs no coordination.
//!
//! Token resolution and verification belong to the [`Identity`]
//! implementation; the guard only acts on its outcome. A resolution failure
//! is indistinguishable from an absent token and is denied.

pub mod pattern;

use crate::identity::{Identity, Session};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::debug;

/// Terminal outcome for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Path is not covered by any pattern; the guard stays out of the way.
    Unmatched,
    /// Path is protected and the session passed the authorization predicate.
    Allowed,
    /// Path is protected and no acceptable session was resolved.
    Denied,
}

pub struct RouteGuard {
    patterns: pattern::PatternSet,
    identity: Arc<dyn Identity>,
    login_path: String,
}

impl RouteGuard {
    #[must_use]
    pub fn new(
        patterns: pattern::PatternSet,
        identity: Arc<dyn Identity>,
        login_path: String,
    ) -> Self {
        Self {
            patterns,
            identity,
            login_path,
        }
    }

    #[must_use]
    pub fn protects(&self, path: &str) -> bool {
        self.patterns.matches(path)
    }

    /// Pure decision over an already-resolved session, so the allow/deny
    /// logic is testable without any I/O.
    #[must_use]
    pub fn decision(&self, path: &str, session: Option<&Session>) -> Decision {
        if !self.patterns.matches(path) {
            return Decision::Unmatched;
        }

        match session {
            Some(session) if self.identity.is_authorized(session) => Decision::Allowed,
            _ => Decision::Denied,
        }
    }
}

/// Middleware entry point. Unprotected paths skip identity resolution
/// entirely; allowed requests proceed unmodified with the session attached
/// to request extensions for handlers.
pub async fn enforce(
    State(guard): State<Arc<RouteGuard>>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();

    if !guard.protects(&path) {
        return next.run(request).await;
    }

    let session = guard.identity.resolve(request.headers()).await;

    match guard.decision(&path, session.as_ref()) {
        Decision::Unmatched | Decision::Allowed => {
            if let Some(session) = session {
                request.extensions_mut().insert(session);
            }
            next.run(request).await
        }
        Decision::Denied => {
            debug!(path, "no acceptable session, redirecting to login");
            Redirect::temporary(&guard.login_path).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::CookieIdentity;
    use anyhow::Result;

    fn guard() -> Result<RouteGuard> {
        let patterns = pattern::PatternSet::parse([
            "/dashboard/*",
            "/despesas/*",
            "/rendas/*",
            "/transacoes/*",
            "/categorias/*",
        ])?;
        Ok(RouteGuard::new(
            patterns,
            Arc::new(CookieIdentity),
            "/login".to_string(),
        ))
    }

    fn session(token: &str) -> Session {
        Session {
            token: token.to_string(),
            user_id: None,
        }
    }

    #[test]
    fn unmatched_path_is_ignored_regardless_of_session() -> Result<()> {
        let guard = guard()?;
        assert_eq!(guard.decision("/public/info", None), Decision::Unmatched);
        assert_eq!(
            guard.decision("/public/info", Some(&session("abc123"))),
            Decision::Unmatched
        );
        Ok(())
    }

    #[test]
    fn matched_path_without_session_is_denied() -> Result<()> {
        let guard = guard()?;
        assert_eq!(guard.decision("/dashboard/overview", None), Decision::Denied);
        Ok(())
    }

    #[test]
    fn matched_path_with_token_is_allowed() -> Result<()> {
        let guard = guard()?;
        assert_eq!(
            guard.decision("/dashboard/overview", Some(&session("abc123"))),
            Decision::Allowed
        );
        Ok(())
    }

    #[test]
    fn empty_token_is_denied() -> Result<()> {
        let guard = guard()?;
        assert_eq!(
            guard.decision("/transacoes", Some(&session(""))),
            Decision::Denied
        );
        Ok(())
    }

    #[test]
    fn sibling_prefix_is_not_protected() -> Result<()> {
        let guard = guard()?;
        assert_eq!(guard.decision("/dashboard2/x", None), Decision::Unmatched);
        Ok(())
    }
}
