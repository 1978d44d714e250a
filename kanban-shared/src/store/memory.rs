/// In-memory storage engine
///
/// Keeps users and tasks in ordered maps behind a single `RwLock`. It honours
/// the same relational rules as the PostgreSQL schema: usernames are unique
/// and every task's owner must exist. Nothing survives a restart.
///
/// # Example
///
/// ```
/// use kanban_shared::models::{Category, CreateTask, CreateUser};
/// use kanban_shared::store::{MemoryStore, TaskStore, UserStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::new();
/// let user = store.insert_user(CreateUser {
///     name: "John Doe".to_string(),
///     username: "johndoe".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// }).await?;
///
/// store.insert_task(CreateTask {
///     title: "t".to_string(),
///     description: "d".to_string(),
///     category: Category::ToDo,
///     owner: user.user_id,
/// }).await?;
///
/// assert_eq!(store.list_tasks(user.user_id, Category::ToDo).await?.len(), 1);
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::{Storage, StoreError, TaskStore, UserStore};
use crate::models::task::OWNER_CONSTRAINT;
use crate::models::user::USERNAME_CONSTRAINT;
use crate::models::{Category, CreateTask, CreateUser, Task, TaskId, User, UserId};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    tasks: BTreeMap<TaskId, Task>,
    last_user_id: UserId,
    last_task_id: TaskId,
}

/// Storage engine backed by process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, data: CreateUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|u| u.username == data.username) {
            return Err(StoreError::UniqueViolation {
                constraint: USERNAME_CONSTRAINT.to_string(),
            });
        }

        tables.last_user_id += 1;
        let user = User {
            user_id: tables.last_user_id,
            name: data.name,
            username: data.username,
            password_hash: data.password_hash,
            created_at: Utc::now(),
        };
        tables.users.insert(user.user_id, user.clone());

        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn find_user_by_id(&self, user_id: UserId) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&user_id).cloned())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn insert_task(&self, data: CreateTask) -> Result<Task, StoreError> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&data.owner) {
            return Err(StoreError::ForeignKeyViolation {
                constraint: OWNER_CONSTRAINT.to_string(),
            });
        }

        tables.last_task_id += 1;
        let task = Task {
            id: tables.last_task_id,
            title: data.title,
            description: data.description,
            category: data.category,
            owner: data.owner,
            created_at: Utc::now(),
        };
        tables.tasks.insert(task.id, task.clone());

        Ok(task)
    }

    async fn find_task(&self, id: TaskId) -> Result<Option<Task>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.tasks.get(&id).cloned())
    }

    async fn update_category(
        &self,
        id: TaskId,
        category: Category,
    ) -> Result<Option<Task>, StoreError> {
        let mut tables = self.tables.write().await;

        Ok(tables.tasks.get_mut(&id).map(|task| {
            task.category = category;
            task.clone()
        }))
    }

    async fn delete_task(&self, id: TaskId) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        Ok(tables.tasks.remove(&id).is_some())
    }

    async fn list_tasks(&self, owner: UserId, category: Category) -> Result<Vec<Task>, StoreError> {
        let tables = self.tables.read().await;

        // BTreeMap iterates in ascending id, which is insertion order
        Ok(tables
            .tasks
            .values()
            .filter(|t| t.owner == owner && t.category == category)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl Storage for MemoryStore {
    fn engine(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
