//! Developer and project routes. Pre-checks are attached per route so they run in the
//! same order as the checks they stand for: existence first, then body lookups.

use crate::handlers::developers::{
    create_developer, create_developer_info, delete_developer, list_developer_projects, list_developers,
    retrieve_developer, update_developer,
};
use crate::handlers::projects::{
    add_technology, create_project, delete_project, list_projects, remove_technology, retrieve_project,
    update_project,
};
use crate::middleware::{
    ensure_body_developer_exists, ensure_developer_exists, ensure_email_available, ensure_project_exists,
};
use crate::state::AppState;
use axum::{
    handler::Handler,
    middleware::from_fn_with_state,
    routing::{delete, get, post},
    Router,
};

pub fn developer_routes(state: AppState) -> Router {
    let developer_exists = from_fn_with_state(state.clone(), ensure_developer_exists);
    let email_available = from_fn_with_state(state.clone(), ensure_email_available);

    Router::new()
        .route(
            "/developers",
            get(list_developers).post(create_developer.layer(email_available.clone())),
        )
        .route(
            "/developers/:id",
            get(retrieve_developer)
                .patch(update_developer.layer(email_available))
                .delete(delete_developer)
                .route_layer(developer_exists.clone()),
        )
        .route(
            "/developers/:id/infos",
            post(create_developer_info).route_layer(developer_exists.clone()),
        )
        .route(
            "/developers/:id/projects",
            get(list_developer_projects).route_layer(developer_exists),
        )
        .with_state(state)
}

pub fn project_routes(state: AppState) -> Router {
    let project_exists = from_fn_with_state(state.clone(), ensure_project_exists);
    let body_developer_exists = from_fn_with_state(state.clone(), ensure_body_developer_exists);

    Router::new()
        .route("/projects", get(list_projects).post(create_project))
        .route(
            "/projects/:id",
            get(retrieve_project)
                .patch(update_project.layer(body_developer_exists))
                .delete(delete_project)
                .route_layer(project_exists.clone()),
        )
        .route(
            "/projects/:id/technologies",
            post(add_technology).route_layer(project_exists.clone()),
        )
        .route(
            "/projects/:id/technologies/:name",
            delete(remove_technology).route_layer(project_exists),
        )
        .with_state(state)
}
