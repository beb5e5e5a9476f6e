use crate::auth::{
    jwt::JwtKeys,
    repo::{SqliteUserRepo, UserRepo},
};
use crate::config::AppConfig;
use crate::db;
use crate::tasks::repo::{SqliteTaskRepo, TaskRepo};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Everything a handler needs, passed explicitly through axum state.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub jwt: JwtKeys,
    pub users: Arc<dyn UserRepo>,
    pub tasks: Arc<dyn TaskRepo>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let db = db::connect(&config.database_url).await?;
        Ok(Self::from_pool(db, Arc::new(config)))
    }

    pub fn from_pool(db: SqlitePool, config: Arc<AppConfig>) -> Self {
        let users = Arc::new(SqliteUserRepo::new(db.clone())) as Arc<dyn UserRepo>;
        let tasks = Arc::new(SqliteTaskRepo::new(db.clone())) as Arc<dyn TaskRepo>;
        Self::from_parts(db, config, users, tasks)
    }

    pub fn from_parts(
        db: SqlitePool,
        config: Arc<AppConfig>,
        users: Arc<dyn UserRepo>,
        tasks: Arc<dyn TaskRepo>,
    ) -> Self {
        let jwt = JwtKeys::from_config(&config.jwt);
        Self {
            db,
            config,
            jwt,
            users,
            tasks,
        }
    }
}

/// In-memory stand-ins for the stores, used by unit tests.
#[cfg(test)]
pub(crate) mod fakes {
    use std::sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Mutex,
    };

    use async_trait::async_trait;
    use uuid::Uuid;

    use crate::auth::{repo::UserRepo, repo_types::User};
    use crate::tasks::{
        repo::TaskRepo,
        repo_types::{Task, TaskChanges},
    };

    #[derive(Default)]
    pub struct FakeUserRepo {
        pub users: Mutex<Vec<User>>,
    }

    #[async_trait]
    impl UserRepo for FakeUserRepo {
        async fn find_by_name(&self, name: &str) -> sqlx::Result<Option<User>> {
            Ok(self.users.lock().unwrap().iter().find(|u| u.name == name).cloned())
        }

        async fn find_by_email(&self, email: &str) -> sqlx::Result<Option<User>> {
            Ok(self.users.lock().unwrap().iter().find(|u| u.email == email).cloned())
        }

        async fn insert(&self, user: &User) -> sqlx::Result<()> {
            self.users.lock().unwrap().push(user.clone());
            Ok(())
        }

        async fn update_password_hash(&self, user_id: Uuid, hash: &str) -> sqlx::Result<u64> {
            let mut users = self.users.lock().unwrap();
            match users.iter_mut().find(|u| u.id == user_id) {
                Some(u) => {
                    u.password_hash = hash.to_string();
                    Ok(1)
                }
                None => Ok(0),
            }
        }
    }

    #[derive(Default)]
    pub struct FakeTaskRepo {
        pub tasks: Mutex<Vec<Task>>,
        calls: AtomicUsize,
        vanish_on_update: AtomicBool,
    }

    impl FakeTaskRepo {
        /// Number of store calls made so far.
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        /// Makes the next update find nothing, as if a concurrent delete won.
        pub fn vanish_on_update(&self) {
            self.vanish_on_update.store(true, Ordering::SeqCst);
        }

        fn touch(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl TaskRepo for FakeTaskRepo {
        async fn list_by_owner(&self, owner: Uuid) -> sqlx::Result<Vec<Task>> {
            self.touch();
            Ok(self
                .tasks
                .lock()
                .unwrap()
                .iter()
                .filter(|t| t.user_id == owner)
                .cloned()
                .collect())
        }

        async fn find_owned(&self, owner: Uuid, task_id: &str) -> sqlx::Result<Option<Task>> {
            self.touch();
            Ok(self
                .tasks
                .lock()
                .unwrap()
                .iter()
                .find(|t| t.id == task_id && t.user_id == owner)
                .cloned())
        }

        async fn update_owned(
            &self,
            owner: Uuid,
            task_id: &str,
            changes: &TaskChanges,
        ) -> sqlx::Result<u64> {
            self.touch();
            if self.vanish_on_update.swap(false, Ordering::SeqCst) {
                return Ok(0);
            }
            let mut tasks = self.tasks.lock().unwrap();
            match tasks
                .iter_mut()
                .find(|t| t.id == task_id && t.user_id == owner)
            {
                Some(t) => {
                    t.title = changes.title.clone();
                    t.description = changes.description.clone();
                    t.status = changes.status;
                    Ok(1)
                }
                None => Ok(0),
            }
        }

        async fn delete_owned(&self, owner: Uuid, task_id: &str) -> sqlx::Result<u64> {
            self.touch();
            let mut tasks = self.tasks.lock().unwrap();
            let before = tasks.len();
            tasks.retain(|t| !(t.id == task_id && t.user_id == owner));
            Ok((before - tasks.len()) as u64)
        }

        async fn insert(&self, task: &Task) -> sqlx::Result<()> {
            self.touch();
            self.tasks.lock().unwrap().push(task.clone());
            Ok(())
        }
    }
}
