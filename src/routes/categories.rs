use crate::{
    auth::AuthenticatedUserId,
    db::Store,
    error::AppError,
    models::{Category, CategoryInput},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

/// Loads a category and checks that `user_id` owns it.
///
/// 404 when it does not exist, 403 when it belongs to someone else.
async fn owned_category(
    store: &dyn Store,
    id: Uuid,
    user_id: Uuid,
) -> Result<Category, AppError> {
    let category = store
        .find_category(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".into()))?;

    if !category.is_owned_by(user_id) {
        log::warn!("user {} denied access to category {}", user_id, id);
        return Err(AppError::Forbidden(
            "You do not have access to this category".into(),
        ));
    }
    Ok(category)
}

/// Lists the caller's categories.
#[get("")]
pub async fn list_categories(
    store: web::Data<dyn Store>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let categories = store.list_categories(user.0).await?;
    Ok(HttpResponse::Ok().json(categories))
}

/// Returns the name of one of the caller's categories as `{category_name}`.
#[get("/{id}")]
pub async fn get_category(
    store: web::Data<dyn Store>,
    category_id: web::Path<Uuid>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let category = owned_category(store.get_ref(), category_id.into_inner(), user.0).await?;
    Ok(HttpResponse::Ok().json(json!({ "category_name": category.name })))
}

/// Creates a category owned by the caller.
///
/// ## Responses:
/// - `201 Created`: `{message, id}`.
/// - `422 Unprocessable Entity`: empty or overlong name.
#[post("")]
pub async fn create_category(
    store: web::Data<dyn Store>,
    category_data: web::Json<CategoryInput>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    category_data.validate()?;

    let category = Category::new(category_data.into_inner(), user.0);
    store.insert_category(&category).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Category created successfully",
        "id": category.id
    })))
}

/// Replaces the name and description of one of the caller's categories.
///
/// Both fields are overwritten; leaving out the description clears it.
#[put("/{id}")]
pub async fn update_category(
    store: web::Data<dyn Store>,
    category_id: web::Path<Uuid>,
    category_data: web::Json<CategoryInput>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let mut category =
        owned_category(store.get_ref(), category_id.into_inner(), user.0).await?;
    category_data.validate()?;
    category.replace(category_data.into_inner());
    store.update_category(&category).await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Category updated successfully" })))
}

/// Deletes one of the caller's categories. Its tasks are not touched.
#[delete("/{id}")]
pub async fn delete_category(
    store: web::Data<dyn Store>,
    category_id: web::Path<Uuid>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let category = owned_category(store.get_ref(), category_id.into_inner(), user.0).await?;
    store.delete_category(category.id).await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Category deleted successfully" })))
}
