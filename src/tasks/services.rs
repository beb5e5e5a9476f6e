use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    tasks::{
        dto::UpdateTaskRequest,
        repo::TaskRepo,
        repo_types::{Task, TaskChanges, TaskStatus},
    },
};

pub async fn list(tasks: &dyn TaskRepo, owner: Uuid) -> AppResult<Vec<Task>> {
    Ok(tasks.list_by_owner(owner).await?)
}

/// Checks the request shape before touching the store. A bad status never
/// reaches a write.
fn validate(req: UpdateTaskRequest) -> AppResult<TaskChanges> {
    let status = req
        .status
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(|s| s.parse::<TaskStatus>().ok())
        .ok_or_else(|| AppError::Validation("Invalid status value".into()))?;

    let (Some(title), Some(description)) = (req.title, req.description) else {
        return Err(AppError::Validation("Missing required fields".into()));
    };

    Ok(TaskChanges {
        title,
        description,
        status,
    })
}

pub async fn update(
    tasks: &dyn TaskRepo,
    owner: Uuid,
    task_id: &str,
    req: UpdateTaskRequest,
) -> AppResult<()> {
    let changes = validate(req)?;

    if tasks.find_owned(owner, task_id).await?.is_none() {
        warn!(%owner, %task_id, "task not found for owner");
        return Err(AppError::TaskNotFound);
    }

    // the row can vanish between the check and the write
    if tasks.update_owned(owner, task_id, &changes).await? == 0 {
        warn!(%owner, %task_id, "task disappeared before update");
        return Err(AppError::TaskNotFound);
    }

    info!(%owner, %task_id, status = %changes.status, "task updated");
    Ok(())
}

pub async fn delete(tasks: &dyn TaskRepo, owner: Uuid, task_id: &str) -> AppResult<()> {
    if tasks.delete_owned(owner, task_id).await? == 0 {
        warn!(%owner, %task_id, "delete of missing or foreign task");
        return Err(AppError::TaskNotFound);
    }
    info!(%owner, %task_id, "task deleted");
    Ok(())
}
