use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

/// Lifecycle of a task. `InProgress` is spelled `in progress` on the wire and
/// in the database; `in_progress` is accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "in progress", alias = "in_progress")]
    InProgress,
    #[serde(rename = "done")]
    Done,
    #[serde(rename = "completed")]
    Completed,
}

#[derive(Debug, Error)]
#[error("invalid task status: {0:?}")]
pub struct InvalidStatus(pub String);

/// A stored row that cannot be turned into a [`Task`].
#[derive(Debug, Error)]
pub enum BadTaskRow {
    #[error(transparent)]
    Status(#[from] InvalidStatus),
    #[error("invalid owner id {0:?}")]
    Owner(String),
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in progress",
            TaskStatus::Done => "done",
            TaskStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "in progress" | "in_progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(InvalidStatus(other.to_string())),
        }
    }
}

/// Raw row as stored in `tasks`. Ids are kept as text; task ids are opaque and
/// need not be UUIDs.
#[derive(Debug, FromRow)]
pub struct TaskRow {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub id: String,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
}

impl TryFrom<TaskRow> for Task {
    type Error = BadTaskRow;

    fn try_from(r: TaskRow) -> Result<Self, Self::Error> {
        let user_id = r.user_id.parse().map_err(|_| BadTaskRow::Owner(r.user_id))?;
        Ok(Self {
            id: r.id,
            user_id,
            title: r.title,
            description: r.description,
            status: r.status.parse()?,
        })
    }
}

/// The mutable fields of a task; an update overwrites all of them.
#[derive(Debug, Clone)]
pub struct TaskChanges {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
}
