//! Dashboard summary (`/dashboard`): income, expense and balance totals
//! plus per-category totals, labeled for the pt-BR dashboard.

use crate::{identity::Session, labels};
use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{Datelike, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tracing::{error, instrument};
use utoipa::ToSchema;

#[derive(Debug, sqlx::FromRow)]
struct Totals {
    income: f64,
    expense: f64,
}

#[derive(ToSchema, Serialize, Debug, sqlx::FromRow)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

#[derive(ToSchema, Serialize, Debug)]
pub struct Summary {
    /// Current month name in pt-BR, e.g. "Agosto".
    pub month: String,
    pub income: f64,
    /// Absolute value of all negative amounts.
    pub expense: f64,
    pub balance: f64,
    pub categories: Vec<CategoryTotal>,
}

#[utoipa::path(
    get,
    path= "/dashboard",
    responses (
        (status = 200, description = "Totals for the current user", body = Summary),
        (status = 401, description = "Session subject unknown")
    ),
    tag = "contas",
)]
#[instrument(skip(pool, session))]
pub async fn dashboard(
    Extension(pool): Extension<PgPool>,
    Extension(session): Extension<Session>,
) -> Response {
    let Some(user_id) = session.user_id else {
        return StatusCode::UNAUTHORIZED.into_response();
    };

    let totals = sqlx::query_as::<_, Totals>(
        "SELECT \
           COALESCE(SUM(amount) FILTER (WHERE amount >= 0), 0) AS income, \
           COALESCE(SUM(amount) FILTER (WHERE amount < 0), 0) AS expense \
         FROM transactions WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_one(&pool)
    .await;

    let totals = match totals {
        Ok(totals) => totals,
        Err(error) => {
            error!("Failed to aggregate totals: {}", error);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let categories = sqlx::query_as::<_, CategoryTotal>(
        "SELECT c.name AS category, COALESCE(SUM(t.amount), 0) AS total \
         FROM categories c \
         LEFT JOIN transactions t ON t.category_id = c.id AND t.user_id = $1 \
         WHERE c.user_id = $1 \
         GROUP BY c.name ORDER BY c.name",
    )
    .bind(user_id)
    .fetch_all(&pool)
    .await;

    let categories = match categories {
        Ok(categories) => categories,
        Err(error) => {
            error!("Failed to aggregate category totals: {}", error);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    Json(summarize(totals, categories)).into_response()
}

fn summarize(totals: Totals, categories: Vec<CategoryTotal>) -> Summary {
    Summary {
        month: labels::month_label(Utc::now().month())
            .unwrap_or_default()
            .to_string(),
        income: totals.income,
        expense: totals.expense.abs(),
        balance: totals.income + totals.expense,
        categories,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_balances() {
        let summary = summarize(
            Totals {
                income: 4200.0,
                expense: -1500.0,
            },
            vec![],
        );

        assert!((summary.income - 4200.0).abs() < f64::EPSILON);
        assert!((summary.expense - 1500.0).abs() < f64::EPSILON);
        assert!((summary.balance - 2700.0).abs() < f64::EPSILON);
        assert!(!summary.month.is_empty());
    }

    #[test]
    fn test_summarize_empty_ledger() {
        let summary = summarize(
            Totals {
                income: 0.0,
                expense: 0.0,
            },
            vec![],
        );

        assert!(summary.balance.abs() < f64::EPSILON);
        assert!(summary.categories.is_empty());
    }
}
