use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::tasks::repo_types::{Task, TaskChanges, TaskRow};

/// Task store. Every read and write carries the owner in its predicate, so a
/// task owned by someone else is indistinguishable from a missing one.
#[async_trait]
pub trait TaskRepo: Send + Sync {
    async fn list_by_owner(&self, owner: Uuid) -> sqlx::Result<Vec<Task>>;
    async fn find_owned(&self, owner: Uuid, task_id: &str) -> sqlx::Result<Option<Task>>;
    /// Returns the number of rows touched.
    async fn update_owned(
        &self,
        owner: Uuid,
        task_id: &str,
        changes: &TaskChanges,
    ) -> sqlx::Result<u64>;
    /// Returns the number of rows touched.
    async fn delete_owned(&self, owner: Uuid, task_id: &str) -> sqlx::Result<u64>;
    /// Tasks are seeded out-of-band; the HTTP surface has no create route.
    async fn insert(&self, task: &Task) -> sqlx::Result<()>;
}

#[derive(Clone)]
pub struct SqliteTaskRepo {
    db: SqlitePool,
}

impl SqliteTaskRepo {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

fn into_task(row: TaskRow) -> sqlx::Result<Task> {
    Task::try_from(row).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

#[async_trait]
impl TaskRepo for SqliteTaskRepo {
    async fn list_by_owner(&self, owner: Uuid) -> sqlx::Result<Vec<Task>> {
        let rows = sqlx::query_as::<_, TaskRow>(
            r#"
            SELECT id, user_id, title, description, status
            FROM tasks
            WHERE user_id = ?
            ORDER BY rowid
            "#,
        )
        .bind(owner.to_string())
        .fetch_all(&self.db)
        .await?;
        rows.into_iter().map(into_task).collect()
    }

    async fn find_owned(&self, owner: Uuid, task_id: &str) -> sqlx::Result<Option<Task>> {
        let row = sqlx::query_as::<_, TaskRow>(
            r#"
            SELECT id, user_id, title, description, status
            FROM tasks
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(task_id)
        .bind(owner.to_string())
        .fetch_optional(&self.db)
        .await?;
        row.map(into_task).transpose()
    }

    async fn update_owned(
        &self,
        owner: Uuid,
        task_id: &str,
        changes: &TaskChanges,
    ) -> sqlx::Result<u64> {
        let res = sqlx::query(
            r#"
            UPDATE tasks
            SET title = ?, description = ?, status = ?
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(changes.status.as_str())
        .bind(task_id)
        .bind(owner.to_string())
        .execute(&self.db)
        .await?;
        Ok(res.rows_affected())
    }

    async fn delete_owned(&self, owner: Uuid, task_id: &str) -> sqlx::Result<u64> {
        let res = sqlx::query("DELETE FROM tasks WHERE id = ? AND user_id = ?")
            .bind(task_id)
            .bind(owner.to_string())
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected())
    }

    async fn insert(&self, task: &Task) -> sqlx::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO tasks (id, user_id, title, description, status)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&task.id)
        .bind(task.user_id.to_string())
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .execute(&self.db)
        .await?;
        Ok(())
    }
}
