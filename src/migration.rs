//! Schema DDL: the `os_type` enum, the five tables, and the supported technologies.
//! Every statement is idempotent, so this runs on each startup.

use crate::error::AppError;
use crate::schema::SUPPORTED_TECHNOLOGIES;
use sqlx::PgPool;

/// Statements in dependency order.
const DDL: &[&str] = &[
    r#"
    DO $$
    BEGIN
        CREATE TYPE os_type AS ENUM ('Windows', 'Linux', 'MacOS');
    EXCEPTION
        WHEN duplicate_object THEN NULL;
    END
    $$
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS developers (
        id BIGSERIAL PRIMARY KEY,
        name VARCHAR(50) NOT NULL,
        email VARCHAR(50) NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS developer_infos (
        id BIGSERIAL PRIMARY KEY,
        developer_since DATE NOT NULL,
        preferred_os os_type NOT NULL,
        developer_id BIGINT NOT NULL UNIQUE REFERENCES developers (id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS projects (
        id BIGSERIAL PRIMARY KEY,
        name VARCHAR(50) NOT NULL,
        description TEXT NOT NULL,
        estimated_time VARCHAR(20) NOT NULL,
        repository VARCHAR(120) NOT NULL,
        start_date DATE NOT NULL,
        end_date DATE,
        developer_id BIGINT NOT NULL REFERENCES developers (id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS technologies (
        id BIGSERIAL PRIMARY KEY,
        name VARCHAR(30) NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS projects_technologies (
        id BIGSERIAL PRIMARY KEY,
        added_in DATE NOT NULL DEFAULT CURRENT_DATE,
        project_id BIGINT NOT NULL REFERENCES projects (id) ON DELETE CASCADE,
        technology_id BIGINT NOT NULL REFERENCES technologies (id) ON DELETE CASCADE,
        UNIQUE (project_id, technology_id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS projects_developer_id_idx ON projects (developer_id)",
];

/// Advisory lock key held while migrating, so concurrent starts apply the DDL one at a time.
const MIGRATION_LOCK: i64 = 0x6465_7670_726f_6a;

const SEED_TECHNOLOGY: &str = "INSERT INTO technologies (name) VALUES ($1) ON CONFLICT (name) DO NOTHING";

/// Create the schema if missing and seed the technology list, in one transaction.
pub async fn apply_migrations(pool: &PgPool) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(MIGRATION_LOCK)
        .execute(&mut *tx)
        .await?;
    for stmt in DDL {
        sqlx::query(*stmt).execute(&mut *tx).await?;
    }
    let mut seeded = 0;
    for name in SUPPORTED_TECHNOLOGIES {
        seeded += sqlx::query(SEED_TECHNOLOGY)
            .bind(*name)
            .execute(&mut *tx)
            .await?
            .rows_affected();
    }
    tx.commit().await?;
    tracing::info!(statements = DDL.len(), technologies_seeded = seeded, "migrations applied");
    Ok(())
}
