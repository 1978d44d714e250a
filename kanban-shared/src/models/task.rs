/// Task model and database operations
///
/// A task is a card on one user's board. It is created into whatever lane the
/// caller supplies, moved between lanes in place, and deleted permanently.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     title TEXT NOT NULL,
///     description TEXT NOT NULL,
///     category task_category NOT NULL,
///     owner BIGINT NOT NULL REFERENCES users(user_id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// There is no `ON DELETE CASCADE`: users are never deleted by the board.
///
/// # Example
///
/// ```no_run
/// use kanban_shared::models::category::Category;
/// use kanban_shared::models::task::{CreateTask, Task};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let task = Task::create(&pool, CreateTask {
///     title: "Write report".to_string(),
///     description: "Quarterly numbers".to_string(),
///     category: Category::ToDo,
///     owner: 1,
/// }).await?;
///
/// Task::update_category(&pool, task.id, task.category.forward()).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::category::Category;
use super::user::UserId;

/// Server-generated task identifier
pub type TaskId = i64;

/// Name of the foreign key from `tasks.owner` to `users.user_id`
pub const OWNER_CONSTRAINT: &str = "tasks_owner_fkey";

/// Task card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: TaskId,

    /// Short title
    pub title: String,

    /// Free text
    pub description: String,

    /// Lane the task currently sits in
    pub category: Category,

    /// User who owns the task
    pub owner: UserId,

    /// When the task was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Task title
    pub title: String,

    /// Task description
    pub description: String,

    /// Initial lane, taken as supplied (not forced to `ToDo`)
    pub category: Category,

    /// Owning user
    pub owner: UserId,
}

impl Task {
    /// Inserts a new task
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, category, owner)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, description, category, owner, created_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.category)
        .bind(data.owner)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: TaskId) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, category, owner, created_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Sets the task's lane
    ///
    /// Returns `None` if the task does not exist. The new lane is computed by
    /// the caller; no version check is made, so the last commit wins.
    pub async fn update_category(
        pool: &PgPool,
        id: TaskId,
        category: Category,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET category = $2
            WHERE id = $1
            RETURNING id, title, description, category, owner, created_at
            "#,
        )
        .bind(id)
        .bind(category)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists one user's tasks in one lane, in insertion order
    pub async fn list_by_owner_and_category(
        pool: &PgPool,
        owner: UserId,
        category: Category,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, category, owner, created_at
            FROM tasks
            WHERE owner = $1 AND category = $2
            ORDER BY id ASC
            "#,
        )
        .bind(owner)
        .bind(category)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Deletes a task
    ///
    /// Returns true if a row was removed.
    pub async fn delete(pool: &PgPool, id: TaskId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
