use serde::{Deserialize, Serialize};

/// Body of `PUT /tasks/:id`. Kept loose so that a bad status or a missing
/// field is reported as a validation failure instead of a body rejection.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Left untyped so a non-string status is reported as an invalid status.
    pub status: Option<serde_json::Value>,
}

/// Payload of the unauthenticated `/api/tasks` placeholder.
#[derive(Debug, Default, Serialize)]
pub struct PlaceholderTasks {
    pub tasks: Vec<serde_json::Value>,
}
