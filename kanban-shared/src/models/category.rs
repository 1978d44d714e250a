/// Task category (board lane) and its transition rules
///
/// A task always sits in exactly one of three lanes. The two move operations
/// form a 3-cycle and are mutual inverses:
///
/// ```text
/// forward:  ToDo → InProgress → Done → ToDo
/// backward: ToDo → Done → InProgress → ToDo
/// ```
///
/// Neither operation has an illegal or terminal state, so both are total.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_category AS ENUM ('to_do', 'in_progress', 'done');
/// ```
///
/// # Example
///
/// ```
/// use kanban_shared::models::category::Category;
///
/// let c = Category::ToDo;
/// assert_eq!(c.forward(), Category::InProgress);
/// assert_eq!(c.forward().backward(), c);
/// ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Board lane a task occupies
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "task_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Not started
    ToDo,

    /// Being worked on
    InProgress,

    /// Finished
    Done,
}

impl Category {
    /// All categories in board order
    pub const ALL: [Category; 3] = [Category::ToDo, Category::InProgress, Category::Done];

    /// Next lane to the right, wrapping from `Done` back to `ToDo`
    pub fn forward(self) -> Self {
        match self {
            Category::ToDo => Category::InProgress,
            Category::InProgress => Category::Done,
            Category::Done => Category::ToDo,
        }
    }

    /// Next lane to the left, wrapping from `ToDo` back to `Done`
    pub fn backward(self) -> Self {
        match self {
            Category::ToDo => Category::Done,
            Category::InProgress => Category::ToDo,
            Category::Done => Category::InProgress,
        }
    }

    /// Stable machine name, matching the database enum label
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::ToDo => "to_do",
            Category::InProgress => "in_progress",
            Category::Done => "done",
        }
    }

    /// Human-readable lane title
    pub fn label(&self) -> &'static str {
        match self {
            Category::ToDo => "To Do",
            Category::InProgress => "In Progress",
            Category::Done => "Done",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a category string is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown task category: {0:?}")]
pub struct ParseCategoryError(pub String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    /// Accepts machine names, lane titles and the legacy short names
    /// (`todo`, `progress`, `Completed`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(&[' ', '-'][..], "_");

        match normalized.as_str() {
            "to_do" | "todo" => Ok(Category::ToDo),
            "in_progress" | "progress" => Ok(Category::InProgress),
            "done" | "completed" => Ok(Category::Done),
            _ => Err(ParseCategoryError(s.to_string())),
        }
    }
}
