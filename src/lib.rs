//! # Contas (Personal Finance Dashboard API)
//!
//! `contas` is the HTTP backend of a personal-finance dashboard: categories,
//! transactions, expense/income views and a dashboard summary, all scoped to
//! the authenticated user.
//!
//! ## Route guard
//!
//! Protected routes (`/dashboard`, `/despesas`, `/rendas`, `/transacoes`,
//! `/categorias`) sit behind a session route guard. The guard matches the
//! request path against an ordered list of prefix/wildcard rules and, on a
//! match, asks the identity integration for a session. Session issuance and
//! verification stay external: the guard only decides pass-through vs.
//! redirect-to-login and never inspects token contents.
//!
//! ## Database
//!
//! State lives in `PostgreSQL` (users, categories, transactions). The schema
//! bootstrap is `db/sql/01_contas.sql`; the tests below keep the shipped SQL
//! aligned with what the handlers expect.

pub mod api;
pub mod cli;
pub mod identity;
pub mod labels;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[cfg(test)]
mod tests {
    use anyhow::{Context, Result, ensure};
    use std::fs;
    use std::path::{Path, PathBuf};

    // Normalize SQL to avoid brittle formatting checks in schema tests.
    fn canonicalize_sql(sql: &str) -> String {
        sql.chars()
            .filter(|ch| !ch.is_whitespace())
            .map(|ch| ch.to_ascii_lowercase())
            .collect()
    }

    fn canonical_schema() -> Result<(PathBuf, String)> {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("db/sql/01_contas.sql");
        let sql = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read SQL file at {}", path.display()))?;
        Ok((path, canonicalize_sql(&sql)))
    }

    fn assert_contains(path: &Path, canonical: &str, needle: &str) -> Result<()> {
        ensure!(
            canonical.contains(needle),
            "Expected {needle} is missing in {}",
            path.display()
        );
        Ok(())
    }

    #[test]
    fn schema_amount_is_double_precision() -> Result<()> {
        let (path, canonical) = canonical_schema()?;
        assert_contains(&path, &canonical, "amountdoubleprecisionnotnull")
    }

    #[test]
    fn schema_category_names_are_unique_per_user() -> Result<()> {
        let (path, canonical) = canonical_schema()?;
        assert_contains(&path, &canonical, "unique(user_id,name)")
    }

    #[test]
    fn schema_rows_cascade_on_user_delete() -> Result<()> {
        let (path, canonical) = canonical_schema()?;
        assert_contains(&path, &canonical, "referencesusers(id)ondeletecascade")
    }

    #[test]
    fn schema_has_user_date_index() -> Result<()> {
        let (path, canonical) = canonical_schema()?;
        assert_contains(&path, &canonical, "transactions_user_date_idx")
    }

    #[test]
    fn schema_emails_are_unique() -> Result<()> {
        let (path, canonical) = canonical_schema()?;
        assert_contains(&path, &canonical, "emailtextnotnullunique")
    }
}
