/// Storage contracts for users and tasks
///
/// The board never talks to a database engine directly. Services hold
/// `Arc<dyn UserStore>` / `Arc<dyn TaskStore>` and any engine implementing
/// [`Storage`] can be plugged in.
///
/// # Engines
///
/// - [`postgres::PgStore`]: PostgreSQL via sqlx, the production engine
/// - [`memory::MemoryStore`]: process-local maps, for development and tests
///
/// # Errors
///
/// Engines report failures as a structured [`StoreError`]. Constraint
/// violations are distinguished from every other fault so callers can turn a
/// duplicate username into a business outcome without masking real outages.

use async_trait::async_trait;

use crate::models::{Category, CreateTask, CreateUser, Task, TaskId, User, UserId};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Error type for storage operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write
    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    /// A foreign key constraint rejected the write
    #[error("Foreign key constraint violated: {constraint}")]
    ForeignKeyViolation { constraint: String },

    /// Any other storage failure (connection loss, malformed query, ...)
    #[error("Database error: {0}")]
    Database(String),
}

impl StoreError {
    /// True if this is a unique violation on the named constraint
    pub fn is_unique_violation_on(&self, name: &str) -> bool {
        matches!(self, StoreError::UniqueViolation { constraint } if constraint == name)
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or_default().to_string();

            if db_err.is_unique_violation() {
                return StoreError::UniqueViolation { constraint };
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::ForeignKeyViolation { constraint };
            }
        }

        StoreError::Database(err.to_string())
    }
}

/// User persistence
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user; a taken username yields [`StoreError::UniqueViolation`]
    async fn insert_user(&self, data: CreateUser) -> Result<User, StoreError>;

    /// Looks a user up by exact username
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Looks a user up by ID
    async fn find_user_by_id(&self, user_id: UserId) -> Result<Option<User>, StoreError>;
}

/// Task persistence
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Inserts a task; an unknown owner yields [`StoreError::ForeignKeyViolation`]
    async fn insert_task(&self, data: CreateTask) -> Result<Task, StoreError>;

    /// Looks a task up by ID
    async fn find_task(&self, id: TaskId) -> Result<Option<Task>, StoreError>;

    /// Overwrites a task's lane, returning the updated task if it exists
    async fn update_category(
        &self,
        id: TaskId,
        category: Category,
    ) -> Result<Option<Task>, StoreError>;

    /// Removes a task, returning whether it existed
    async fn delete_task(&self, id: TaskId) -> Result<bool, StoreError>;

    /// Lists one owner's tasks in one lane, in insertion order
    async fn list_tasks(&self, owner: UserId, category: Category) -> Result<Vec<Task>, StoreError>;
}

/// A complete storage engine
#[async_trait]
pub trait Storage: UserStore + TaskStore {
    /// Short engine name for logs and health output
    fn engine(&self) -> &'static str;

    /// Checks the engine is reachable
    async fn ping(&self) -> Result<(), StoreError>;
}
