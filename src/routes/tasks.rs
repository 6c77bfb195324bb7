use crate::{
    auth::AuthenticatedUserId,
    db::Store,
    error::AppError,
    models::{Task, TaskFilter, TaskInput, TaskQuery},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

/// Loads a task for modification by `user_id`.
///
/// Ownership is resolved through the task's *current* category, not through the
/// task's own `user_id`: a missing category, or one owned by someone else, is a 403.
async fn task_editable_by(store: &dyn Store, id: Uuid, user_id: Uuid) -> Result<Task, AppError> {
    let task = store
        .find_task(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    let category = store.find_category(task.category_id).await?;
    match category {
        Some(category) if category.is_owned_by(user_id) => Ok(task),
        _ => {
            log::warn!("user {} denied modification of task {}", user_id, id);
            Err(AppError::Forbidden(
                "You do not have permission to modify this task".into(),
            ))
        }
    }
}

/// Retrieves a task by its ID.
///
/// Checks the task's own owner field.
///
/// ## Responses:
/// - `200 OK`: the full task.
/// - `403 Forbidden`: the task belongs to another user.
/// - `404 Not Found`: no task with that id.
#[get("/{id}")]
pub async fn get_task(
    store: web::Data<dyn Store>,
    task_id: web::Path<Uuid>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let task_id = task_id.into_inner();
    let task = store
        .find_task(task_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    if task.user_id != user.0 {
        log::warn!("user {} denied access to task {}", user.0, task_id);
        return Err(AppError::Forbidden(
            "You do not have access to this task".into(),
        ));
    }

    Ok(HttpResponse::Ok().json(task))
}

/// Filters and sorts the caller's tasks.
///
/// ## Request Body:
/// - `categoryId`: a category id, or `"all"`.
/// - `status`: a task status, or `"all"`.
/// - `sortBy`: `"nearest"` (due date ascending) or `"farthest"` (descending);
///   anything else leaves the order unspecified.
#[post("/filters")]
pub async fn filter_tasks(
    store: web::Data<dyn Store>,
    query: web::Json<TaskQuery>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let tasks = match TaskFilter::from_query(user.0, &query) {
        Some(filter) => store.filter_tasks(&filter).await?,
        None => Vec::new(),
    };
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a task owned by the caller.
///
/// The referenced category is not checked for existence or ownership.
///
/// ## Responses:
/// - `201 Created`: `{message, id}`.
/// - `422 Unprocessable Entity`: title or description out of bounds.
#[post("")]
pub async fn create_task(
    store: web::Data<dyn Store>,
    task_data: web::Json<TaskInput>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = Task::new(task_data.into_inner(), user.0);
    store.insert_task(&task).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Task created successfully",
        "id": task.id
    })))
}

/// Updates an existing task.
///
/// Every editable field is overwritten, including `category_id`.
#[put("/{id}")]
pub async fn update_task(
    store: web::Data<dyn Store>,
    task_id: web::Path<Uuid>,
    task_data: web::Json<TaskInput>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let mut task = task_editable_by(store.get_ref(), task_id.into_inner(), user.0).await?;
    task_data.validate()?;

    task.replace(task_data.into_inner());
    store.update_task(&task).await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Task updated successfully" })))
}

/// Deletes a task by its ID.
#[delete("/{id}")]
pub async fn delete_task(
    store: web::Data<dyn Store>,
    task_id: web::Path<Uuid>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let task = task_editable_by(store.get_ref(), task_id.into_inner(), user.0).await?;
    store.delete_task(task.id).await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Task deleted successfully" })))
}
