/// PostgreSQL storage engine
///
/// Thin adapter from the storage traits to the query methods on
/// [`User`] and [`Task`]. Each call is a single statement on a pooled
/// connection and commits on its own.

use async_trait::async_trait;
use sqlx::PgPool;

use super::{Storage, StoreError, TaskStore, UserStore};
use crate::db::pool;
use crate::models::{Category, CreateTask, CreateUser, Task, TaskId, User, UserId};

/// Storage engine backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wraps an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, data: CreateUser) -> Result<User, StoreError> {
        Ok(User::create(&self.pool, data).await?)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_username(&self.pool, username).await?)
    }

    async fn find_user_by_id(&self, user_id: UserId) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_id(&self.pool, user_id).await?)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn insert_task(&self, data: CreateTask) -> Result<Task, StoreError> {
        Ok(Task::create(&self.pool, data).await?)
    }

    async fn find_task(&self, id: TaskId) -> Result<Option<Task>, StoreError> {
        Ok(Task::find_by_id(&self.pool, id).await?)
    }

    async fn update_category(
        &self,
        id: TaskId,
        category: Category,
    ) -> Result<Option<Task>, StoreError> {
        Ok(Task::update_category(&self.pool, id, category).await?)
    }

    async fn delete_task(&self, id: TaskId) -> Result<bool, StoreError> {
        Ok(Task::delete(&self.pool, id).await?)
    }

    async fn list_tasks(&self, owner: UserId, category: Category) -> Result<Vec<Task>, StoreError> {
        Ok(Task::list_by_owner_and_category(&self.pool, owner, category).await?)
    }
}

#[async_trait]
impl Storage for PgStore {
    fn engine(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(pool::health_check(&self.pool).await?)
    }
}
