use crate::{
    auth::AuthenticatedUserId,
    db::Store,
    error::AppError,
    models::{Category, DueDateOrder, Task, TaskFilter},
};
use actix_web::{get, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    /// Ordered by due date, nearest first.
    pub user_tasks: Vec<Task>,
    pub user_categories: Vec<Category>,
}

/// Everything the caller owns, in one response.
#[get("")]
pub async fn dashboard(
    store: web::Data<dyn Store>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let filter = TaskFilter::owned_by(user.0).ordered(DueDateOrder::Nearest);
    let user_tasks = store.filter_tasks(&filter).await?;
    let user_categories = store.list_categories(user.0).await?;

    Ok(HttpResponse::Ok().json(Dashboard {
        user_tasks,
        user_categories,
    }))
}
