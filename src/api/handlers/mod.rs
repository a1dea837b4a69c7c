//! Route handlers and shared database-error mapping.

pub mod categories;
pub mod dashboard;
pub mod headers;
pub mod health;
pub mod register;
pub mod transactions;

/// `UNIQUE` constraint violation, mapped to `409 Conflict` by handlers.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// Row references a missing or foreign row (FK violation, or a scoped
/// subselect producing NULL). Mapped to `400 Bad Request` by handlers.
pub(crate) fn is_reference_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.is_foreign_key_violation()
            || matches!(db.kind(), sqlx::error::ErrorKind::NotNullViolation)
    )
}
