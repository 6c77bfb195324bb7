#![allow(dead_code)]

use std::sync::Arc;

use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    http::StatusCode,
    test,
};
use serde_json::{json, Value};
use taskboard::{
    auth::{AuthResponse, AuthSettings, JwtKeys},
    db::{MemoryStore, Store},
};
use uuid::Uuid;

pub const TEST_SECRET: &[u8] = b"integration-test-secret";

/// Builds the full application over a fresh in-memory store.
macro_rules! init_app {
    () => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::from(common::memory_store()))
                .app_data(actix_web::web::Data::new(common::auth_settings()))
                .configure(taskboard::routes::config),
        )
        .await
    };
}

pub fn memory_store() -> Arc<dyn Store> {
    Arc::new(MemoryStore::new())
}

/// Minimum bcrypt cost keeps registration fast in tests.
pub fn auth_settings() -> AuthSettings {
    AuthSettings::new(JwtKeys::from_secret(TEST_SECRET), 4)
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

/// Sends a request and returns the status with the JSON body (`Value::Null` when empty).
pub async fn send(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    req: test::TestRequest,
) -> (StatusCode, Value) {
    let resp = test::call_service(app, req.to_request()).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or_else(|_| Value::String(
            String::from_utf8_lossy(&body).into_owned(),
        ))
    };
    (status, json)
}

/// Registers a user and returns the issued token.
pub async fn register(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    email: &str,
    password: &str,
) -> String {
    let req = test::TestRequest::post()
        .uri("/users/register")
        .set_json(json!({
            "username": email.split('@').next().unwrap_or("user"),
            "email": email,
            "password": password
        }));
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::OK, "register {} failed: {}", email, body);

    let auth: AuthResponse = serde_json::from_value(body).expect("auth response");
    auth.token
}

/// Creates a category as `token` and returns its id.
pub async fn create_category(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    token: &str,
    name: &str,
) -> Uuid {
    let req = test::TestRequest::post()
        .uri("/category")
        .insert_header(bearer(token))
        .set_json(json!({ "category_name": name }));
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::CREATED, "create category failed: {}", body);
    serde_json::from_value(body["id"].clone()).expect("category id")
}

/// Creates a task from `payload` as `token` and returns its id.
pub async fn create_task(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    token: &str,
    payload: Value,
) -> Uuid {
    let req = test::TestRequest::post()
        .uri("/task")
        .insert_header(bearer(token))
        .set_json(payload);
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::CREATED, "create task failed: {}", body);
    serde_json::from_value(body["id"].clone()).expect("task id")
}
