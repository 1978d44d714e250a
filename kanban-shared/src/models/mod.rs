/// Database models for the board
///
/// # Models
///
/// - `category`: The three board lanes and their transition rules
/// - `user`: User accounts
/// - `task`: Task cards owned by users
///
/// The `impl` blocks on `User` and `Task` hold the PostgreSQL queries; the
/// storage traits in [`crate::store`] wrap them behind an engine-neutral seam.

pub mod category;
pub mod task;
pub mod user;

pub use category::Category;
pub use task::{CreateTask, Task, TaskId};
pub use user::{CreateUser, User, UserId};
