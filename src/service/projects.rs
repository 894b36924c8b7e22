//! Project persistence and the project/technology join table.

use crate::error::AppError;
use crate::models::{LinkedTechnology, Project, ProjectTechnologyRow, Technology};
use crate::schema::{PROJECTS, TECHNOLOGIES};
use crate::service::executor::{count_positive, execute, fetch_all, fetch_one_tx, fetch_optional};
use crate::service::Payload;
use crate::sql::{count_where, delete_by_id, insert, select_all, select_where, update_by_id, PgBindValue, QueryBuf};
use sqlx::PgPool;

const RETRIEVE_PROJECT: &str = r#"
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
        pj.id = $1::bigint
    ORDER BY
        t.id"#;

const LINK_TECHNOLOGY: &str = r#"
    INSERT INTO
        projects_technologies (project_id, technology_id)
    VALUES
        ($1::bigint, $2::bigint)"#;

const LINKED_TECHNOLOGY: &str = r#"
    SELECT
        t.id AS technology_id,
        t.name AS technology_name,
        pj.id AS project_id,
        pj.name AS project_name,
        pj.description AS project_description,
        pj.estimated_time AS project_estimated_time,
        pj.repository AS project_repository,
        pj.start_date AS project_start_date,
        pj.end_date AS project_end_date
    FROM
        projects pj
    JOIN
        projects_technologies pt ON pt.project_id = pj.id
    JOIN
        technologies t ON t.id = pt.technology_id
    WHERE
        pj.id = $1::bigint AND t.id = $2::bigint"#;

const LINK_COUNT: &str = r#"
    SELECT COUNT(*) FROM projects_technologies
    WHERE project_id = $1::bigint AND technology_id = $2::bigint"#;

const UNLINK_TECHNOLOGY: &str = r#"
    DELETE FROM projects_technologies
    WHERE project_id = $1::bigint AND technology_id = $2::bigint"#;

fn pair(sql: &str, project_id: i64, technology_id: i64) -> QueryBuf {
    QueryBuf {
        sql: sql.to_string(),
        params: vec![PgBindValue::I64(project_id), PgBindValue::I64(technology_id)],
    }
}

pub struct ProjectService;

impl ProjectService {
    pub async fn list(pool: &PgPool) -> Result<Vec<Project>, AppError> {
        fetch_all(pool, &select_all(&PROJECTS)).await
    }

    pub async fn create(pool: &PgPool, payload: &Payload) -> Result<Project, AppError> {
        fetch_optional(pool, &insert(&PROJECTS, payload.fields()))
            .await?
            .ok_or(AppError::Db(sqlx::Error::RowNotFound))
    }

    /// One row per linked technology, or a single row with null technology fields.
    pub async fn retrieve(pool: &PgPool, id: i64) -> Result<Vec<ProjectTechnologyRow>, AppError> {
        let q = QueryBuf {
            sql: RETRIEVE_PROJECT.to_string(),
            params: vec![PgBindValue::I64(id)],
        };
        fetch_all(pool, &q).await
    }

    pub async fn update(pool: &PgPool, id: i64, payload: &Payload) -> Result<Option<Project>, AppError> {
        fetch_optional(pool, &update_by_id(&PROJECTS, id, payload.fields())).await
    }

    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, AppError> {
        Ok(execute(pool, &delete_by_id(&PROJECTS, id)).await? > 0)
    }

    pub async fn exists(pool: &PgPool, id: i64) -> Result<bool, AppError> {
        count_positive(pool, &count_where(PROJECTS.name, PROJECTS.pk, "bigint", id.into())).await
    }

    pub async fn technology_by_name(pool: &PgPool, name: &str) -> Result<Option<Technology>, AppError> {
        let Some(column) = TECHNOLOGIES.column_by_key("name") else {
            return Ok(None);
        };
        fetch_optional(pool, &select_where(&TECHNOLOGIES, &[(column, name.into())])).await
    }

    pub async fn is_linked(pool: &PgPool, project_id: i64, technology_id: i64) -> Result<bool, AppError> {
        count_positive(pool, &pair(LINK_COUNT, project_id, technology_id)).await
    }

    /// Link a technology to a project and return the joined project/technology row.
    pub async fn link_technology(
        pool: &PgPool,
        project_id: i64,
        technology: &Technology,
    ) -> Result<LinkedTechnology, AppError> {
        let mut tx = pool.begin().await?;
        let link = pair(LINK_TECHNOLOGY, project_id, technology.id);
        tracing::debug!(sql = %link.sql, params = ?link.params, "query (tx)");
        let mut query = sqlx::query(&link.sql);
        for p in &link.params {
            query = query.bind(p.clone());
        }
        query.execute(&mut *tx).await?;
        let row = fetch_one_tx(&mut *tx, &pair(LINKED_TECHNOLOGY, project_id, technology.id)).await?;
        tx.commit().await?;
        Ok(row)
    }

    /// Remove the link; returns false when the project did not use that technology.
    pub async fn unlink_technology(pool: &PgPool, project_id: i64, technology_id: i64) -> Result<bool, AppError> {
        Ok(execute(pool, &pair(UNLINK_TECHNOLOGY, project_id, technology_id)).await? > 0)
    }
}
