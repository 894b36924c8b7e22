//! Developer and developer info persistence.

use crate::error::AppError;
use crate::models::{Developer, DeveloperDetail, DeveloperInfo, ProjectTechnologyRow};
use crate::schema::{DEVELOPERS, DEVELOPER_INFOS, DEVELOPER_INFO_OWNER};
use crate::service::executor::{count_positive, execute, fetch_all, fetch_optional};
use crate::service::Payload;
use crate::sql::{count_where, delete_by_id, insert, select_all, update_by_id, PgBindValue, QueryBuf};
use sqlx::PgPool;

const RETRIEVE_DEVELOPER: &str = r#"
    SELECT
        dev.id AS developer_id,
        dev.name AS developer_name,
        dev.email AS developer_email,
        devi.developer_since AS developer_info_developer_since,
        devi.preferred_os AS developer_info_preferred_os
    FROM
        developers dev
    LEFT JOIN
        developer_infos devi ON devi.developer_id = dev.id
    WHERE
        dev.id = $1::bigint"#;

const DEVELOPER_PROJECTS: &str = r#"
    SELECT
        pj.id AS project_id,
        pj.name AS project_name,
        pj.description AS project_description,
        pj.estimated_time AS project_estimated_time,
        pj.repository AS project_repository,
        pj.start_date AS project_start_date,
        pj.end_date AS project_end_date,
        pj.developer_id AS project_developer_id,
        t.id AS technology_id,
        t.name AS technology_name
    FROM
        projects pj
    LEFT JOIN
        projects_technologies pt ON pt.project_id = pj.id
    LEFT JOIN
        technologies t ON t.id = pt.technology_id
    WHERE
        pj.developer_id = $1::bigint
    ORDER BY
        pj.id, t.id"#;

fn by_id(sql: &str, id: i64) -> QueryBuf {
    QueryBuf {
        sql: sql.to_string(),
        params: vec![PgBindValue::I64(id)],
    }
}

pub struct DeveloperService;

impl DeveloperService {
    pub async fn list(pool: &PgPool) -> Result<Vec<Developer>, AppError> {
        fetch_all(pool, &select_all(&DEVELOPERS)).await
    }

    pub async fn create(pool: &PgPool, payload: &Payload) -> Result<Developer, AppError> {
        let q = insert(&DEVELOPERS, payload.fields());
        fetch_optional(pool, &q)
            .await?
            .ok_or(AppError::Db(sqlx::Error::RowNotFound))
    }

    /// Developer with its info columns (null when no info row exists).
    pub async fn retrieve(pool: &PgPool, id: i64) -> Result<Option<DeveloperDetail>, AppError> {
        fetch_optional(pool, &by_id(RETRIEVE_DEVELOPER, id)).await
    }

    pub async fn update(pool: &PgPool, id: i64, payload: &Payload) -> Result<Option<Developer>, AppError> {
        fetch_optional(pool, &update_by_id(&DEVELOPERS, id, payload.fields())).await
    }

    /// Delete a developer; info, projects and project links cascade. Returns false if nothing was deleted.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, AppError> {
        Ok(execute(pool, &delete_by_id(&DEVELOPERS, id)).await? > 0)
    }

    pub async fn exists(pool: &PgPool, id: i64) -> Result<bool, AppError> {
        count_positive(pool, &count_where(DEVELOPERS.name, DEVELOPERS.pk, "bigint", id.into())).await
    }

    pub async fn email_taken(pool: &PgPool, email: &str) -> Result<bool, AppError> {
        count_positive(pool, &count_where(DEVELOPERS.name, "email", "varchar", email.into())).await
    }

    pub async fn info_exists(pool: &PgPool, developer_id: i64) -> Result<bool, AppError> {
        let q = count_where(
            DEVELOPER_INFOS.name,
            DEVELOPER_INFO_OWNER.name,
            DEVELOPER_INFO_OWNER.pg_type,
            developer_id.into(),
        );
        count_positive(pool, &q).await
    }

    /// Insert the info row for `developer_id`; the owner comes from the path, not the body.
    pub async fn create_info(
        pool: &PgPool,
        developer_id: i64,
        mut payload: Payload,
    ) -> Result<DeveloperInfo, AppError> {
        payload.push(&DEVELOPER_INFO_OWNER, developer_id.into());
        let q = insert(&DEVELOPER_INFOS, payload.fields());
        fetch_optional(pool, &q)
            .await?
            .ok_or(AppError::Db(sqlx::Error::RowNotFound))
    }

    /// Every project the developer owns, one row per linked technology.
    pub async fn projects(pool: &PgPool, developer_id: i64) -> Result<Vec<ProjectTechnologyRow>, AppError> {
        fetch_all(pool, &by_id(DEVELOPER_PROJECTS, developer_id)).await
    }
}
