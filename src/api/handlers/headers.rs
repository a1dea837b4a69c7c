//! Echo request headers, one per line. Useful when debugging proxies and
//! header propagation. Credential-bearing headers are redacted.

use axum::http::{HeaderMap, header};
use axum::response::IntoResponse;

const REDACTED: &str = "<redacted>";

#[utoipa::path(
    get,
    path= "/headers",
    responses (
        (status = 200, description = "Request headers, one per line", body = String)
    ),
    tag = "contas",
)]
pub async fn headers(headers: HeaderMap) -> impl IntoResponse {
    let mut lines = String::new();

    for (name, value) in &headers {
        let shown = if is_sensitive(name) {
            REDACTED
        } else {
            value.to_str().unwrap_or("<binary>")
        };

        lines.push_str(name.as_str());
        lines.push_str(": ");
        lines.push_str(shown);
        lines.push('\n');
    }

    lines
}

fn is_sensitive(name: &header::HeaderName) -> bool {
    name == header::AUTHORIZATION || name == header::COOKIE
}
