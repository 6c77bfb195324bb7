//! Persistence seam.
//!
//! Handlers talk to a [`Store`] through `web::Data<dyn Store>`. Two
//! implementations exist: [`PgStore`] over an `sqlx` Postgres pool and
//! [`MemoryStore`], used by the test-suite and when no `DATABASE_URL` is set.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Category, Task, TaskFilter, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// The three document collections (users, categories, tasks).
///
/// Lookups by id return `Ok(None)` when nothing matches; ownership is the
/// caller's concern. Updates and deletes of a missing id are silent no-ops:
/// a record deleted between a handler's ownership check and its write is
/// not recreated, and the handler still reports success (last write wins).
#[async_trait]
pub trait Store: Send + Sync {
    async fn list_users(&self) -> Result<Vec<User>, AppError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    /// Fails with `AppError::Conflict` when the email is already taken.
    async fn insert_user(&self, user: &User) -> Result<(), AppError>;

    async fn list_categories(&self, user_id: Uuid) -> Result<Vec<Category>, AppError>;
    async fn find_category(&self, id: Uuid) -> Result<Option<Category>, AppError>;
    async fn insert_category(&self, category: &Category) -> Result<(), AppError>;
    async fn update_category(&self, category: &Category) -> Result<(), AppError>;
    /// Removes only the category; tasks referencing it are left untouched.
    async fn delete_category(&self, id: Uuid) -> Result<(), AppError>;

    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, AppError>;
    async fn filter_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, AppError>;
    async fn insert_task(&self, task: &Task) -> Result<(), AppError>;
    async fn update_task(&self, task: &Task) -> Result<(), AppError>;
    async fn delete_task(&self, id: Uuid) -> Result<(), AppError>;
}
