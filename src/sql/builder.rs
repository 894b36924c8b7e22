//! Builds parameterized INSERT, SELECT, UPDATE, DELETE and COUNT from table descriptors.

use crate::schema::{Column, Table};
use crate::sql::PgBindValue;

/// Quote identifier for PostgreSQL (safe: only from descriptors).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<PgBindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    /// Push a value and return its placeholder, cast to `pg_type`.
    fn push_param(&mut self, v: PgBindValue, pg_type: &str) -> String {
        self.params.push(v);
        format!("${}::{}", self.params.len(), pg_type)
    }
}

fn column_list(names: &[&str]) -> String {
    names.iter().map(|n| quoted(n)).collect::<Vec<_>>().join(", ")
}

/// SELECT all rows ordered by primary key.
pub fn select_all(table: &Table) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT {} FROM {} ORDER BY {}",
        column_list(table.returning),
        quoted(table.name),
        quoted(table.pk)
    );
    q
}

/// SELECT by primary key.
pub fn select_by_id(table: &Table, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.push_param(id.into(), "bigint");
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = {}",
        column_list(table.returning),
        quoted(table.name),
        quoted(table.pk),
        ph
    );
    q
}

/// SELECT rows where every `(column, value)` pair matches.
pub fn select_where(table: &Table, filters: &[(&Column, PgBindValue)]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut where_parts = Vec::with_capacity(filters.len());
    for (c, v) in filters {
        let ph = q.push_param(v.clone(), c.pg_type);
        where_parts.push(format!("{} = {}", quoted(c.name), ph));
    }
    let where_clause = if where_parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", where_parts.join(" AND "))
    };
    q.sql = format!(
        "SELECT {} FROM {}{} ORDER BY {}",
        column_list(table.returning),
        quoted(table.name),
        where_clause,
        quoted(table.pk)
    );
    q
}

/// SELECT COUNT(*) FROM table WHERE column = $1. Used by the existence pre-checks.
pub fn count_where(table: &str, column: &str, pg_type: &str, value: PgBindValue) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.push_param(value, pg_type);
    q.sql = format!(
        "SELECT COUNT(*) FROM {} WHERE {} = {}",
        quoted(table),
        quoted(column),
        ph
    );
    q
}

/// INSERT the given fields; columns not present keep their database default.
pub fn insert(table: &Table, fields: &[(&Column, PgBindValue)]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::with_capacity(fields.len());
    let mut placeholders = Vec::with_capacity(fields.len());
    for (c, v) in fields {
        cols.push(quoted(c.name));
        placeholders.push(q.push_param(v.clone(), c.pg_type));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(table.name),
        cols.join(", "),
        placeholders.join(", "),
        column_list(table.returning)
    );
    q
}

/// UPDATE by id: SET only the given fields. With nothing to set, reads the row instead.
pub fn update_by_id(table: &Table, id: i64, fields: &[(&Column, PgBindValue)]) -> QueryBuf {
    if fields.is_empty() {
        return select_by_id(table, id);
    }
    let mut q = QueryBuf::new();
    let mut sets = Vec::with_capacity(fields.len());
    for (c, v) in fields {
        let ph = q.push_param(v.clone(), c.pg_type);
        sets.push(format!("{} = {}", quoted(c.name), ph));
    }
    let id_ph = q.push_param(id.into(), "bigint");
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = {} RETURNING {}",
        quoted(table.name),
        sets.join(", "),
        quoted(table.pk),
        id_ph,
        column_list(table.returning)
    );
    q
}

/// DELETE by id.
pub fn delete_by_id(table: &Table, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.push_param(id.into(), "bigint");
    q.sql = format!("DELETE FROM {} WHERE {} = {}", quoted(table.name), quoted(table.pk), ph);
    q
}
