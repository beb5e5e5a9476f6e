use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, put},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::AuthUser,
    error::{json_body, AppResult},
    state::AppState,
    tasks::{
        dto::{PlaceholderTasks, UpdateTaskRequest},
        repo_types::Task,
        services,
    },
};

pub fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_tasks))
        .route("/tasks/:id", put(update_task).delete(delete_task))
}

/// Routes that need no session: the banner and the `/api/tasks` stub.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(banner))
        .route("/api/tasks", get(placeholder_tasks))
}

#[instrument(skip(state))]
pub async fn list_tasks(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<Task>>> {
    let tasks = services::list(state.tasks.as_ref(), user_id).await?;
    Ok(Json(tasks))
}

#[instrument(skip(state, body))]
pub async fn update_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    body: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> AppResult<&'static str> {
    let payload = json_body(body)?;
    services::update(state.tasks.as_ref(), user_id, &id, payload).await?;
    Ok("Task updated successfully")
}

#[instrument(skip(state))]
pub async fn delete_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> AppResult<&'static str> {
    services::delete(state.tasks.as_ref(), user_id, &id).await?;
    Ok("Task deleted successfully")
}

pub async fn banner() -> &'static str {
    "Welcome to backend todo project!"
}

pub async fn placeholder_tasks() -> Json<PlaceholderTasks> {
    Json(PlaceholderTasks::default())
}
