pub mod category;
pub mod task;
pub mod user;

pub use category::{Category, CategoryInput};
pub use task::{DueDateOrder, Task, TaskFilter, TaskInput, TaskQuery, TaskStatus};
pub use user::User;
