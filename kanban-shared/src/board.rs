/// Task board: task lifecycle and lane transitions
///
/// [`TaskBoard`] is the task-side service over a [`TaskStore`]. It creates
/// tasks, moves them between lanes with the cyclic rules on
/// [`Category`], deletes them, and assembles a user's [`Board`].
///
/// Moves are read-then-write: the current lane is read, the next lane is
/// computed here, and the result is written back. There is no version check,
/// so two concurrent moves of the same task resolve as last-commit-wins.
///
/// # Example
///
/// ```
/// use kanban_shared::board::TaskBoard;
/// use kanban_shared::models::{Category, CreateUser};
/// use kanban_shared::store::{MemoryStore, UserStore};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = Arc::new(MemoryStore::new());
/// let owner = store.insert_user(CreateUser {
///     name: "John Doe".to_string(),
///     username: "johndoe".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// }).await?;
///
/// let board = TaskBoard::new(store);
/// let task = board.create("t", "d", Category::ToDo, owner.user_id).await?;
/// let moved = board.move_forward(task.id).await?;
/// assert_eq!(moved.category, Category::InProgress);
/// # Ok(())
/// # }
/// ```

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::models::{Category, CreateTask, Task, TaskId, UserId};
use crate::store::{StoreError, TaskStore};

/// Error type for task operations
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    /// No task with this ID (or not visible to the caller)
    #[error("Task not found: {0}")]
    NotFound(TaskId),

    /// Storage fault
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TaskError {
    /// True for expected outcomes that are answered without a server error
    pub fn is_business_outcome(&self) -> bool {
        matches!(self, TaskError::NotFound(_))
    }
}

/// One user's tasks partitioned by lane
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Board {
    /// Tasks in `ToDo`
    pub todo: Vec<Task>,

    /// Tasks in `InProgress`
    pub in_progress: Vec<Task>,

    /// Tasks in `Done`
    pub done: Vec<Task>,
}

impl Board {
    /// Board with three empty lanes
    pub fn empty() -> Self {
        Self::default()
    }

    /// Tasks in one lane
    pub fn lane(&self, category: Category) -> &[Task] {
        match category {
            Category::ToDo => &self.todo,
            Category::InProgress => &self.in_progress,
            Category::Done => &self.done,
        }
    }

    /// Total number of tasks on the board
    pub fn len(&self) -> usize {
        self.todo.len() + self.in_progress.len() + self.done.len()
    }

    /// True when every lane is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Task operations over a [`TaskStore`]
#[derive(Clone)]
pub struct TaskBoard {
    tasks: Arc<dyn TaskStore>,
}

impl TaskBoard {
    /// Creates a board service over the given store
    pub fn new(tasks: Arc<dyn TaskStore>) -> Self {
        Self { tasks }
    }

    /// Creates a task in the supplied lane
    ///
    /// The lane is taken as given; tasks may be created straight into
    /// `InProgress` or `Done`.
    pub async fn create(
        &self,
        title: &str,
        description: &str,
        category: Category,
        owner: UserId,
    ) -> Result<Task, TaskError> {
        let task = self
            .tasks
            .insert_task(CreateTask {
                title: title.to_string(),
                description: description.to_string(),
                category,
                owner,
            })
            .await?;

        info!(task_id = task.id, owner, category = %category, "Task created");
        Ok(task)
    }

    /// Looks a task up by ID
    pub async fn find(&self, id: TaskId) -> Result<Task, TaskError> {
        self.tasks
            .find_task(id)
            .await?
            .ok_or(TaskError::NotFound(id))
    }

    /// Looks a task up by ID, hiding tasks that belong to someone else
    pub async fn find_owned(&self, owner: UserId, id: TaskId) -> Result<Task, TaskError> {
        match self.find(id).await {
            Ok(task) if task.owner == owner => Ok(task),
            Ok(task) => {
                debug!(task_id = id, owner, actual_owner = task.owner, "Task belongs to another user");
                Err(TaskError::NotFound(id))
            }
            Err(e) => Err(e),
        }
    }

    /// Moves a task one lane to the right (`Done` wraps to `ToDo`)
    pub async fn move_forward(&self, id: TaskId) -> Result<Task, TaskError> {
        self.transition(id, Category::forward).await
    }

    /// Moves a task one lane to the left (`ToDo` wraps to `Done`)
    pub async fn move_backward(&self, id: TaskId) -> Result<Task, TaskError> {
        self.transition(id, Category::backward).await
    }

    /// Deletes a task permanently
    pub async fn delete(&self, id: TaskId) -> Result<(), TaskError> {
        if !self.tasks.delete_task(id).await? {
            return Err(TaskError::NotFound(id));
        }

        info!(task_id = id, "Task deleted");
        Ok(())
    }

    /// Lists one user's tasks in one lane, in insertion order
    ///
    /// Every call is a fresh read.
    pub async fn list_by_owner_and_category(
        &self,
        owner: UserId,
        category: Category,
    ) -> Result<Vec<Task>, TaskError> {
        Ok(self.tasks.list_tasks(owner, category).await?)
    }

    /// Reads all three lanes of a user's board
    pub async fn board_for(&self, owner: UserId) -> Result<Board, TaskError> {
        Ok(Board {
            todo: self.list_by_owner_and_category(owner, Category::ToDo).await?,
            in_progress: self
                .list_by_owner_and_category(owner, Category::InProgress)
                .await?,
            done: self.list_by_owner_and_category(owner, Category::Done).await?,
        })
    }

    async fn transition(
        &self,
        id: TaskId,
        step: fn(Category) -> Category,
    ) -> Result<Task, TaskError> {
        let current = self.find(id).await?;
        let next = step(current.category);

        // The row can vanish between the read and the write
        let task = self
            .tasks
            .update_category(id, next)
            .await?
            .ok_or(TaskError::NotFound(id))?;

        info!(task_id = id, from = %current.category, to = %next, "Task moved");
        Ok(task)
    }
}
