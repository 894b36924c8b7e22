//! Query execution shared by the services: bind a [`QueryBuf`] and map rows.

use crate::error::AppError;
use crate::sql::QueryBuf;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgConnection, PgPool};

pub(crate) async fn fetch_all<T>(pool: &PgPool, q: &QueryBuf) -> Result<Vec<T>, AppError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let mut query = sqlx::query_as::<_, T>(&q.sql);
    for p in &q.params {
        query = query.bind(p.clone());
    }
    Ok(query.fetch_all(pool).await?)
}

pub(crate) async fn fetch_optional<T>(pool: &PgPool, q: &QueryBuf) -> Result<Option<T>, AppError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let mut query = sqlx::query_as::<_, T>(&q.sql);
    for p in &q.params {
        query = query.bind(p.clone());
    }
    Ok(query.fetch_optional(pool).await?)
}

pub(crate) async fn fetch_one_tx<T>(conn: &mut PgConnection, q: &QueryBuf) -> Result<T, AppError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    tracing::debug!(sql = %q.sql, params = ?q.params, "query (tx)");
    let mut query = sqlx::query_as::<_, T>(&q.sql);
    for p in &q.params {
        query = query.bind(p.clone());
    }
    Ok(query.fetch_one(&mut *conn).await?)
}

/// Run a statement and return the number of affected rows.
pub(crate) async fn execute(pool: &PgPool, q: &QueryBuf) -> Result<u64, AppError> {
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let mut query = sqlx::query(&q.sql);
    for p in &q.params {
        query = query.bind(p.clone());
    }
    Ok(query.execute(pool).await?.rows_affected())
}

/// Run a `SELECT COUNT(*)` and report whether any row matched.
pub(crate) async fn count_positive(pool: &PgPool, q: &QueryBuf) -> Result<bool, AppError> {
    tracing::debug!(sql = %q.sql, params = ?q.params, "count");
    let mut query = sqlx::query_scalar::<_, i64>(&q.sql);
    for p in &q.params {
        query = query.bind(p.clone());
    }
    Ok(query.fetch_one(pool).await? > 0)
}
