pub mod categories;
pub mod dashboard;
pub mod tasks;
pub mod users;

use actix_web::web;

use crate::auth::AuthMiddleware;
use crate::error::AppError;

/// Registers every route.
///
/// Expects `web::Data<dyn Store>` and `web::Data<AuthSettings>` on the app.
/// `/`, `/users/register` and `/users/login` are public; the dashboard,
/// category and task scopes sit behind `AuthMiddleware`.
///
/// Body and path extraction failures are rendered through [`AppError`] so they
/// carry the same `{"error": ...}` body as handler failures.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::NotFound(format!("Invalid id: {}", err)).into()),
    )
    .service(users::list_users)
        .service(
            web::scope("/users")
                .service(users::register)
                .service(users::login),
        )
        .service(
            web::scope("/dashboard")
                .wrap(AuthMiddleware)
                .service(dashboard::dashboard),
        )
        .service(
            web::scope("/category")
                .wrap(AuthMiddleware)
                .service(categories::list_categories)
                .service(categories::create_category)
                .service(categories::get_category)
                .service(categories::update_category)
                .service(categories::delete_category),
        )
        .service(
            web::scope("/task")
                .wrap(AuthMiddleware)
                .service(tasks::filter_tasks)
                .service(tasks::create_task)
                .service(tasks::get_task)
                .service(tasks::update_task)
                .service(tasks::delete_task),
        );
}
