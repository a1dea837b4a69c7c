use crate::api::handlers::{categories, dashboard, headers, health, register, transactions};
use utoipa::openapi::{Contact, Info, InfoBuilder, License, Tag};
use utoipa_axum::{router::OpenApiRouter, routes};

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    // Same wiring as the served router, only the generated spec is kept.
    let (_router, openapi) = tagged(protected_router().merge(public_router())).split_for_parts();
    openapi
}

/// Routes behind the session guard. Kept separate from [`public_router`] so
/// the guard middleware can be layered on exactly this subtree.
///
/// Add new endpoints via `.routes(routes!(...))` so they are both served and
/// included in the generated `OpenAPI` spec.
pub(crate) fn protected_router() -> OpenApiRouter {
    // `routes!` reads #[utoipa::path] to bind HTTP method + path.
    OpenApiRouter::new()
        .routes(routes!(dashboard::dashboard))
        .routes(routes!(transactions::despesas))
        .routes(routes!(transactions::rendas))
        .routes(routes!(
            transactions::transactions,
            transactions::create_transaction,
            transactions::update_transaction,
            transactions::delete_transaction
        ))
        .routes(routes!(categories::categories, categories::create_category))
}

/// Routes reachable without a session: registration, health probes and the
/// header echo. `OPTIONS /health` is added outside and not documented.
pub(crate) fn public_router() -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(register::register))
        .routes(routes!(headers::headers))
        .routes(routes!(health::health))
        .routes(routes!(health::live))
        .routes(routes!(health::ready))
}

pub(crate) fn tagged(mut router: OpenApiRouter) -> OpenApiRouter {
    let openapi = router.get_openapi_mut();
    openapi.info = cargo_info();

    let mut contas_tag = Tag::new("contas");
    contas_tag.description = Some("Personal finance dashboard API".to_string());
    openapi.tags = Some(vec![contas_tag]);

    router
}

fn cargo_info() -> Info {
    // Cargo.toml metadata instead of the crate info defaults.
    let mut info = InfoBuilder::new()
        .title(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .description(Some(env!("CARGO_PKG_DESCRIPTION")))
        .build();

    info.contact = cargo_contact();
    info.license = Some(License::new(env!("CARGO_PKG_LICENSE")));

    info
}

fn cargo_contact() -> Option<Contact> {
    // Single-author manifest, "Name <email>" format.
    let author = env!("CARGO_PKG_AUTHORS").split(';').next()?.trim();
    let (name, email) = match author.split_once('<') {
        Some((name, email)) => (name.trim(), email.trim_end_matches('>').trim()),
        None => (author, ""),
    };

    if name.is_empty() && email.is_empty() {
        return None;
    }

    let mut contact = Contact::new();
    if !name.is_empty() {
        contact.name = Some(name.to_string());
    }
    if !email.is_empty() {
        contact.email = Some(email.to_string());
    }
    Some(contact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_openapi_covers_all_routes() -> Result<()> {
        let spec = serde_json::to_value(openapi())?;
        let paths = spec
            .get("paths")
            .and_then(|p| p.as_object())
            .map(|p| p.keys().cloned().collect::<Vec<_>>())
            .unwrap_or_default();

        for path in [
            "/dashboard",
            "/despesas",
            "/rendas",
            "/transacoes",
            "/categorias",
            "/register",
            "/headers",
            "/health",
            "/live",
            "/ready",
        ] {
            assert!(paths.contains(&path.to_string()), "missing {path}");
        }
        Ok(())
    }

    #[test]
    fn test_openapi_info_from_manifest() -> Result<()> {
        let spec = serde_json::to_value(openapi())?;
        assert_eq!(
            spec.pointer("/info/title").and_then(|v| v.as_str()),
            Some("contas")
        );
        assert_eq!(
            spec.pointer("/info/contact/email").and_then(|v| v.as_str()),
            Some("team@contas.app")
        );
        Ok(())
    }

    #[test]
    fn test_create_category_documents_title_casing() -> Result<()> {
        let spec = serde_json::to_value(openapi())?;
        let description = spec
            .pointer("/paths/~1categorias/post/description")
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        assert!(description.contains("title-cased"));
        Ok(())
    }

    #[test]
    fn test_transacoes_has_all_methods() -> Result<()> {
        let spec = serde_json::to_value(openapi())?;
        for method in ["get", "post", "put", "delete"] {
            assert!(
                spec.pointer(&format!("/paths/~1transacoes/{method}"))
                    .is_some(),
                "missing {method} on /transacoes"
            );
        }
        Ok(())
    }
}
