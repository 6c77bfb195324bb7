use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A user-owned grouping of tasks.
///
/// On the wire the name and description keep their `category_` prefix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: Uuid,
    #[serde(rename = "category_name")]
    pub name: String,
    #[serde(rename = "category_description")]
    pub description: Option<String>,
    pub user_id: Uuid,
}

/// Body of `POST /category` and `PUT /category/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct CategoryInput {
    #[serde(rename = "category_name")]
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(rename = "category_description", default)]
    pub description: Option<String>,
}

impl Category {
    pub fn new(input: CategoryInput, user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            description: input.description,
            user_id,
        }
    }

    /// Overwrites both editable fields; an absent description clears it.
    pub fn replace(&mut self, input: CategoryInput) {
        self.name = input.name;
        self.description = input.description;
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}
