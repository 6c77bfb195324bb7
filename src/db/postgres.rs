use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use uuid::Uuid;

use crate::db::Store;
use crate::error::AppError;
use crate::models::{Category, DueDateOrder, Task, TaskFilter, User};

const MAX_CONNECTIONS: u32 = 10;

/// Statements run at start-up so that a fresh database is usable. Each one is
/// idempotent; there is no schema versioning.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        username TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS categories (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT,
        user_id UUID NOT NULL
    )",
    "DO $$ BEGIN
        CREATE TYPE task_status AS ENUM ('pendiente', 'en progreso', 'completada');
    EXCEPTION
        WHEN duplicate_object THEN NULL;
    END $$",
    // No foreign key on category_id: deleting a category leaves its tasks alone.
    "CREATE TABLE IF NOT EXISTS tasks (
        id UUID PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT,
        status task_status NOT NULL DEFAULT 'pendiente',
        due_date TIMESTAMPTZ,
        user_id UUID NOT NULL,
        category_id UUID NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS categories_user_id_idx ON categories (user_id)",
    "CREATE INDEX IF NOT EXISTS tasks_user_id_idx ON tasks (user_id)",
];

const TASK_COLUMNS: &str = "id, title, description, status, due_date, user_id, category_id";

/// [`Store`] backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects and makes sure the tables exist.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(database_url)
            .await?;
        let store = Self::new(pool);
        store.init_schema().await?;
        Ok(store)
    }

    pub async fn init_schema(&self) -> Result<(), AppError> {
        for statement in SCHEMA {
            sqlx::query(*statement).execute(&self.pool).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, created_at, updated_at
             FROM users ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, created_at, updated_at
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO users (id, username, email, password_hash, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_categories(&self, user_id: Uuid) -> Result<Vec<Category>, AppError> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, description, user_id FROM categories WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    async fn find_category(&self, id: Uuid) -> Result<Option<Category>, AppError> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, description, user_id FROM categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(category)
    }

    async fn insert_category(&self, category: &Category) -> Result<(), AppError> {
        sqlx::query("INSERT INTO categories (id, name, description, user_id) VALUES ($1, $2, $3, $4)")
            .bind(category.id)
            .bind(&category.name)
            .bind(&category.description)
            .bind(category.user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_category(&self, category: &Category) -> Result<(), AppError> {
        sqlx::query("UPDATE categories SET name = $1, description = $2 WHERE id = $3")
            .bind(&category.name)
            .bind(&category.description)
            .bind(category.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_category(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, AppError> {
        let sql = format!("SELECT {} FROM tasks WHERE id = $1", TASK_COLUMNS);
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn filter_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, AppError> {
        let sql = filter_sql(filter);

        let mut query_builder = sqlx::query_as::<_, Task>(&sql).bind(filter.user_id);
        if let Some(category_id) = filter.category_id {
            query_builder = query_builder.bind(category_id);
        }
        if let Some(status) = filter.status {
            query_builder = query_builder.bind(status);
        }

        let tasks = query_builder.fetch_all(&self.pool).await?;
        Ok(tasks)
    }

    async fn insert_task(&self, task: &Task) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO tasks (id, title, description, status, due_date, user_id, category_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status)
        .bind(task.due_date)
        .bind(task.user_id)
        .bind(task.category_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_task(&self, task: &Task) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE tasks
             SET title = $1, description = $2, status = $3, due_date = $4, category_id = $5
             WHERE id = $6",
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status)
        .bind(task.due_date)
        .bind(task.category_id)
        .bind(task.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_task(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// Builds the SELECT for a [`TaskFilter`]. Placeholders are numbered in the
/// order the values are bound: owner, then category, then status.
fn filter_sql(filter: &TaskFilter) -> String {
    let mut sql = format!("SELECT {} FROM tasks WHERE user_id = $1", TASK_COLUMNS);
    let mut param_count = 2;

    if filter.category_id.is_some() {
        sql.push_str(&format!(" AND category_id = ${}", param_count));
        param_count += 1;
    }
    if filter.status.is_some() {
        sql.push_str(&format!(" AND status = ${}", param_count));
    }

    match filter.order {
        Some(DueDateOrder::Nearest) => sql.push_str(" ORDER BY due_date ASC NULLS FIRST"),
        Some(DueDateOrder::Farthest) => sql.push_str(" ORDER BY due_date DESC NULLS LAST"),
        None => {}
    }

    sql
}
