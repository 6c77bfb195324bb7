use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::Store;
use crate::error::AppError;
use crate::models::{Category, Task, TaskFilter, User};

/// In-memory [`Store`], one lock per collection.
///
/// Contents live as long as the process; intended for tests and local runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    categories: RwLock<HashMap<Uuid, Category>>,
    tasks: RwLock<HashMap<Uuid, Task>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by_key(|user| user.created_at);
        Ok(users)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        let mut users = self.users.write().await;
        if users.values().any(|existing| existing.email == user.email) {
            return Err(AppError::Conflict("User already registered".into()));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn list_categories(&self, user_id: Uuid) -> Result<Vec<Category>, AppError> {
        Ok(self
            .categories
            .read()
            .await
            .values()
            .filter(|category| category.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_category(&self, id: Uuid) -> Result<Option<Category>, AppError> {
        Ok(self.categories.read().await.get(&id).cloned())
    }

    async fn insert_category(&self, category: &Category) -> Result<(), AppError> {
        self.categories
            .write()
            .await
            .insert(category.id, category.clone());
        Ok(())
    }

    async fn update_category(&self, category: &Category) -> Result<(), AppError> {
        if let Some(stored) = self.categories.write().await.get_mut(&category.id) {
            *stored = category.clone();
        }
        Ok(())
    }

    async fn delete_category(&self, id: Uuid) -> Result<(), AppError> {
        self.categories.write().await.remove(&id);
        Ok(())
    }

    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, AppError> {
        Ok(self.tasks.read().await.get(&id).cloned())
    }

    async fn filter_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, AppError> {
        let mut tasks: Vec<Task> = self
            .tasks
            .read()
            .await
            .values()
            .filter(|task| filter.matches(task))
            .cloned()
            .collect();
        filter.sort(&mut tasks);
        Ok(tasks)
    }

    async fn insert_task(&self, task: &Task) -> Result<(), AppError> {
        self.tasks.write().await.insert(task.id, task.clone());
        Ok(())
    }

    async fn update_task(&self, task: &Task) -> Result<(), AppError> {
        if let Some(stored) = self.tasks.write().await.get_mut(&task.id) {
            *stored = task.clone();
        }
        Ok(())
    }

    async fn delete_task(&self, id: Uuid) -> Result<(), AppError> {
        self.tasks.write().await.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryInput, TaskStatus};

    fn category(owner: Uuid, name: &str) -> Category {
        Category::new(
            CategoryInput {
                name: name.to_string(),
                description: None,
            },
            owner,
        )
    }

    fn task(owner: Uuid, category_id: Uuid) -> Task {
        Task {
            id: Uuid::new_v4(),
            title: "task".to_string(),
            description: None,
            status: TaskStatus::Pending,
            due_date: None,
            user_id: owner,
            category_id,
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_is_a_conflict() {
        let store = MemoryStore::new();
        let first = User::new("a".into(), "same@x.com".into(), "hash".into());
        let second = User::new("b".into(), "same@x.com".into(), "hash".into());

        store.insert_user(&first).await.unwrap();
        let err = store.insert_user(&second).await.unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_categories_are_listed_per_owner() {
        let store = MemoryStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        store.insert_category(&category(alice, "Work")).await.unwrap();
        store.insert_category(&category(bob, "Home")).await.unwrap();

        let listed = store.list_categories(alice).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Work");
    }

    #[tokio::test]
    async fn test_deleting_category_keeps_its_tasks() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let work = category(owner, "Work");
        let orphan = task(owner, work.id);
        store.insert_category(&work).await.unwrap();
        store.insert_task(&orphan).await.unwrap();

        store.delete_category(work.id).await.unwrap();

        assert!(store.find_category(work.id).await.unwrap().is_none());
        assert_eq!(store.find_task(orphan.id).await.unwrap(), Some(orphan));
    }

    #[tokio::test]
    async fn test_update_after_delete_is_a_no_op() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let work = category(owner, "Work");
        let ghost = task(owner, work.id);
        store.insert_category(&work).await.unwrap();
        store.insert_task(&ghost).await.unwrap();

        store.delete_task(ghost.id).await.unwrap();
        store.delete_category(work.id).await.unwrap();
        store.update_task(&ghost).await.unwrap();
        store.update_category(&work).await.unwrap();

        assert!(store.find_task(ghost.id).await.unwrap().is_none());
        assert!(store.find_category(work.id).await.unwrap().is_none());
    }
}
