//! Transaction handlers (`/transacoes`), plus the `/despesas` and
//! `/rendas` sign-filtered views over the same ledger.
//!
//! Amounts are signed: negative is an expense (despesa), zero or positive
//! is income (renda). Every statement is scoped by the session subject.

use crate::{identity::Session, labels};
use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{error, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    id: Uuid,
    description: String,
    amount: f64,
    date: DateTime<Utc>,
    category_id: Uuid,
    category: String,
}

#[derive(ToSchema, Serialize, Debug)]
pub struct Transaction {
    pub id: Uuid,
    pub description: String,
    pub amount: f64,
    /// Display label derived from the amount sign: "Despesa" or "Renda".
    pub kind: String,
    pub date: DateTime<Utc>,
    pub category_id: Uuid,
    pub category: String,
}

impl From<TransactionRow> for Transaction {
    fn from(row: TransactionRow) -> Self {
        Self {
            id: row.id,
            description: row.description,
            amount: row.amount,
            kind: labels::kind_label(row.amount).to_string(),
            date: row.date,
            category_id: row.category_id,
            category: row.category,
        }
    }
}

#[derive(ToSchema, Deserialize, Debug)]
pub struct NewTransaction {
    pub description: String,
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub category_id: Uuid,
}

#[derive(ToSchema, Deserialize, Debug)]
pub struct UpdateTransaction {
    pub id: Uuid,
    pub description: String,
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub category_id: Uuid,
}

#[derive(ToSchema, Deserialize, Debug)]
pub struct DeleteTransaction {
    pub id: Uuid,
}

#[derive(Debug, Clone, Copy)]
enum AmountFilter {
    All,
    Negative,
    NonNegative,
}

impl AmountFilter {
    const fn sql_condition(self) -> &'static str {
        match self {
            Self::All => "",
            Self::Negative => " AND t.amount < 0",
            Self::NonNegative => " AND t.amount >= 0",
        }
    }
}

async fn list(
    pool: &PgPool,
    user_id: Uuid,
    filter: AmountFilter,
) -> Result<Vec<Transaction>, sqlx::Error> {
    let query = format!(
        "SELECT t.id, t.description, t.amount, t.date, t.category_id, c.name AS category \
         FROM transactions t \
         JOIN categories c ON c.id = t.category_id \
         WHERE t.user_id = $1{} \
         ORDER BY t.date DESC",
        filter.sql_condition()
    );

    let rows = sqlx::query_as::<_, TransactionRow>(&query)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(Transaction::from).collect())
}

fn list_response(result: Result<Vec<Transaction>, sqlx::Error>) -> Response {
    match result {
        Ok(rows) => Json(rows).into_response(),
        Err(error) => {
            error!("Failed to list transactions: {}", error);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[utoipa::path(
    get,
    path= "/transacoes",
    responses (
        (status = 200, description = "Transactions for the current user, newest first", body = [Transaction]),
        (status = 401, description = "Session subject unknown")
    ),
    tag = "transacoes",
)]
#[instrument(skip(pool, session))]
pub async fn transactions(
    Extension(pool): Extension<PgPool>,
    Extension(session): Extension<Session>,
) -> Response {
    let Some(user_id) = session.user_id else {
        return StatusCode::UNAUTHORIZED.into_response();
    };

    list_response(list(&pool, user_id, AmountFilter::All).await)
}

#[utoipa::path(
    get,
    path= "/despesas",
    responses (
        (status = 200, description = "Expenses (negative amounts), newest first", body = [Transaction]),
        (status = 401, description = "Session subject unknown")
    ),
    tag = "transacoes",
)]
#[instrument(skip(pool, session))]
pub async fn despesas(
    Extension(pool): Extension<PgPool>,
    Extension(session): Extension<Session>,
) -> Response {
    let Some(user_id) = session.user_id else {
        return StatusCode::UNAUTHORIZED.into_response();
    };

    list_response(list(&pool, user_id, AmountFilter::Negative).await)
}

#[utoipa::path(
    get,
    path= "/rendas",
    responses (
        (status = 200, description = "Income (non-negative amounts), newest first", body = [Transaction]),
        (status = 401, description = "Session subject unknown")
    ),
    tag = "transacoes",
)]
#[instrument(skip(pool, session))]
pub async fn rendas(
    Extension(pool): Extension<PgPool>,
    Extension(session): Extension<Session>,
) -> Response {
    let Some(user_id) = session.user_id else {
        return StatusCode::UNAUTHORIZED.into_response();
    };

    list_response(list(&pool, user_id, AmountFilter::NonNegative).await)
}

#[utoipa::path(
    post,
    path= "/transacoes",
    request_body = NewTransaction,
    responses (
        (status = 201, description = "Transaction created", body = Transaction),
        (status = 400, description = "Missing fields or unknown category"),
        (status = 401, description = "Session subject unknown")
    ),
    tag = "transacoes",
)]
#[instrument(skip(pool, session, payload))]
pub async fn create_transaction(
    Extension(pool): Extension<PgPool>,
    Extension(session): Extension<Session>,
    payload: Option<Json<NewTransaction>>,
) -> Response {
    let Some(user_id) = session.user_id else {
        return StatusCode::UNAUTHORIZED.into_response();
    };

    let Some(Json(payload)) = payload else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    let description = payload.description.trim();
    if description.is_empty() {
        return StatusCode::BAD_REQUEST.into_response();
    }

    // INSERT ... SELECT keeps the category check and the insert in one
    // statement: a category belonging to another user inserts zero rows.
    let created = sqlx::query_as::<_, TransactionRow>(
        "INSERT INTO transactions (user_id, category_id, description, amount, date) \
         SELECT $1, c.id, $2, $3, $4 FROM categories c WHERE c.id = $5 AND c.user_id = $1 \
         RETURNING id, description, amount, date, category_id, \
           (SELECT name FROM categories WHERE id = category_id) AS category",
    )
    .bind(user_id)
    .bind(description)
    .bind(payload.amount)
    .bind(payload.date)
    .bind(payload.category_id)
    .fetch_optional(&pool)
    .await;

    match created {
        Ok(Some(row)) => (StatusCode::CREATED, Json(Transaction::from(row))).into_response(),
        Ok(None) => StatusCode::BAD_REQUEST.into_response(),
        Err(error) => {
            error!("Failed to create transaction: {}", error);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[utoipa::path(
    put,
    path= "/transacoes",
    request_body = UpdateTransaction,
    responses (
        (status = 204, description = "Transaction updated"),
        (status = 400, description = "Missing fields or unknown category"),
        (status = 401, description = "Session subject unknown"),
        (status = 404, description = "Transaction not found for this user")
    ),
    tag = "transacoes",
)]
#[instrument(skip(pool, session, payload))]
pub async fn update_transaction(
    Extension(pool): Extension<PgPool>,
    Extension(session): Extension<Session>,
    payload: Option<Json<UpdateTransaction>>,
) -> Response {
    let Some(user_id) = session.user_id else {
        return StatusCode::UNAUTHORIZED.into_response();
    };

    let Some(Json(payload)) = payload else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    let description = payload.description.trim();
    if description.is_empty() {
        return StatusCode::BAD_REQUEST.into_response();
    }

    // The scoped subselect yields NULL for a category the user does not
    // own, which trips the NOT NULL constraint and maps to 400.
    let updated = sqlx::query(
        "UPDATE transactions SET description = $3, amount = $4, date = $5, \
           category_id = (SELECT id FROM categories WHERE id = $6 AND user_id = $1) \
         WHERE id = $2 AND user_id = $1",
    )
    .bind(user_id)
    .bind(payload.id)
    .bind(description)
    .bind(payload.amount)
    .bind(payload.date)
    .bind(payload.category_id)
    .execute(&pool)
    .await;

    match updated {
        Ok(result) if result.rows_affected() == 0 => StatusCode::NOT_FOUND.into_response(),
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => {
            if super::is_reference_violation(&error) {
                return StatusCode::BAD_REQUEST.into_response();
            }
            error!("Failed to update transaction: {}", error);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[utoipa::path(
    delete,
    path= "/transacoes",
    request_body = DeleteTransaction,
    responses (
        (status = 204, description = "Transaction deleted"),
        (status = 400, description = "Missing id"),
        (status = 401, description = "Session subject unknown"),
        (status = 404, description = "Transaction not found for this user")
    ),
    tag = "transacoes",
)]
#[instrument(skip(pool, session, payload))]
pub async fn delete_transaction(
    Extension(pool): Extension<PgPool>,
    Extension(session): Extension<Session>,
    payload: Option<Json<DeleteTransaction>>,
) -> Response {
    let Some(user_id) = session.user_id else {
        return StatusCode::UNAUTHORIZED.into_response();
    };

    let Some(Json(payload)) = payload else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    let deleted = sqlx::query("DELETE FROM transactions WHERE id = $2 AND user_id = $1")
        .bind(user_id)
        .bind(payload.id)
        .execute(&pool)
        .await;

    match deleted {
        Ok(result) if result.rows_affected() == 0 => StatusCode::NOT_FOUND.into_response(),
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => {
            error!("Failed to delete transaction: {}", error);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
