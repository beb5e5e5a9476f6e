use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::auth::repo_types::{User, UserRow};

/// Credential store. Every call is a single parameterized statement.
#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn find_by_name(&self, name: &str) -> sqlx::Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> sqlx::Result<Option<User>>;
    async fn insert(&self, user: &User) -> sqlx::Result<()>;
    /// Returns the number of rows touched.
    async fn update_password_hash(&self, user_id: Uuid, password_hash: &str) -> sqlx::Result<u64>;
}

#[derive(Clone)]
pub struct SqliteUserRepo {
    db: SqlitePool,
}

impl SqliteUserRepo {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

fn into_user(row: UserRow) -> sqlx::Result<User> {
    User::try_from(row).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

#[async_trait]
impl UserRepo for SqliteUserRepo {
    async fn find_by_name(&self, name: &str) -> sqlx::Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, password_hash
            FROM users
            WHERE name = ?
            "#,
        )
        .bind(name)
        .fetch_optional(&self.db)
        .await?;
        row.map(into_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> sqlx::Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, password_hash
            FROM users
            WHERE email = ?
            ORDER BY rowid
            LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        row.map(into_user).transpose()
    }

    async fn insert(&self, user: &User) -> sqlx::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(user.id.to_string())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn update_password_hash(&self, user_id: Uuid, password_hash: &str) -> sqlx::Result<u64> {
        let res = sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
            .bind(password_hash)
            .bind(user_id.to_string())
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    async fn repo() -> SqliteUserRepo {
        SqliteUserRepo::new(db::connect("sqlite::memory:").await.expect("connect"))
    }

    fn user(name: &str, email: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            password_hash: "hash".into(),
        }
    }

    #[tokio::test]
    async fn insert_then_lookup_by_name_and_email() {
        let repo = repo().await;
        let alice = user("alice", "alice@example.com");
        repo.insert(&alice).await.unwrap();

        let by_name = repo.find_by_name("alice").await.unwrap().unwrap();
        assert_eq!(by_name.id, alice.id);
        let by_email = repo.find_by_email("alice@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.name, "alice");
        assert!(repo.find_by_name("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn ids_are_stored_as_text() {
        let repo = repo().await;
        let alice = user("alice", "alice@example.com");
        repo.insert(&alice).await.unwrap();

        let (kind, id): (String, String) = sqlx::query_as("SELECT typeof(id), id FROM users")
            .fetch_one(&repo.db)
            .await
            .unwrap();
        assert_eq!(kind, "text");
        assert_eq!(id, alice.id.to_string());
    }

    #[tokio::test]
    async fn duplicate_name_violates_unique_constraint() {
        let repo = repo().await;
        repo.insert(&user("alice", "a@example.com")).await.unwrap();
        let err = repo.insert(&user("alice", "b@example.com")).await.unwrap_err();
        match err {
            sqlx::Error::Database(db_err) => assert!(db_err.is_unique_violation()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn update_password_hash_touches_one_row() {
        let repo = repo().await;
        let alice = user("alice", "alice@example.com");
        repo.insert(&alice).await.unwrap();

        assert_eq!(repo.update_password_hash(alice.id, "new-hash").await.unwrap(), 1);
        let stored = repo.find_by_name("alice").await.unwrap().unwrap();
        assert_eq!(stored.password_hash, "new-hash");
        assert_eq!(repo.update_password_hash(Uuid::new_v4(), "x").await.unwrap(), 0);
    }
}
