use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Clone, Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub estimated_time: String,
    pub repository: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub developer_id: i64,
}

#[derive(Clone, Debug, Serialize, FromRow)]
pub struct Technology {
    pub id: i64,
    pub name: String,
}

/// One project joined with one of its technologies; technology fields are null when it has none.
#[derive(Clone, Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTechnologyRow {
    pub project_id: i64,
    pub project_name: String,
    pub project_description: String,
    pub project_estimated_time: String,
    pub project_repository: String,
    pub project_start_date: NaiveDate,
    pub project_end_date: Option<NaiveDate>,
    pub project_developer_id: i64,
    pub technology_id: Option<i64>,
    pub technology_name: Option<String>,
}

/// Response of linking a technology to a project.
#[derive(Clone, Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LinkedTechnology {
    pub technology_id: i64,
    pub technology_name: String,
    pub project_id: i64,
    pub project_name: String,
    pub project_description: String,
    pub project_estimated_time: String,
    pub project_repository: String,
    pub project_start_date: NaiveDate,
    pub project_end_date: Option<NaiveDate>,
}
