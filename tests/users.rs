use std::net::TcpListener;

use actix_web::{http::StatusCode, rt, test, web, App, HttpServer};
use pretty_assertions::assert_eq;
use serde_json::json;
use taskboard::routes;

#[macro_use]
mod common;

use common::{bearer, register, send};

#[actix_rt::test]
async fn test_register_and_login_flow() {
    let app = init_app!();

    let register_payload = json!({
        "username": "integration_user",
        "email": "integration@example.com",
        "password": "Password123!"
    });
    let req = test::TestRequest::post()
        .uri("/users/register")
        .set_json(&register_payload);
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK, "Registration failed. Body: {}", body);
    assert_eq!(body["message"], "User registered successfully");
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));

    // Same email again
    let req = test::TestRequest::post()
        .uri("/users/register")
        .set_json(&register_payload);
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::CONFLICT, "Body: {}", body);

    let req = test::TestRequest::post().uri("/users/login").set_json(json!({
        "email": "integration@example.com",
        "password": "Password123!"
    }));
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK, "Login failed. Body: {}", body);
    assert_eq!(body["message"], "Login successful");

    let token = body["token"].as_str().expect("token").to_string();
    let req = test::TestRequest::get()
        .uri("/dashboard")
        .insert_header(bearer(&token));
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK, "Body: {}", body);
    assert_eq!(body, json!({ "userTasks": [], "userCategories": [] }));
}

#[actix_rt::test]
async fn test_login_failures() {
    let app = init_app!();
    register(&app, "u1@x.com", "pw1").await;

    let test_cases = vec![
        (
            json!({ "email": "u1@x.com", "password": "pw2" }),
            StatusCode::UNAUTHORIZED,
            "incorrect password",
        ),
        (
            json!({ "email": "u1@x.com", "password": "" }),
            StatusCode::UNAUTHORIZED,
            "empty password",
        ),
        (
            json!({ "email": "nobody@x.com", "password": "pw1" }),
            StatusCode::NOT_FOUND,
            "unknown email",
        ),
        (
            json!({ "email": "not-an-email", "password": "pw1" }),
            StatusCode::NOT_FOUND,
            "malformed unknown email",
        ),
        (
            json!({ "email": "u1@x.com" }),
            StatusCode::BAD_REQUEST,
            "missing password",
        ),
    ];

    for (payload, expected_status, description) in test_cases {
        let req = test::TestRequest::post()
            .uri("/users/login")
            .set_json(&payload);
        let (status, body) = send(&app, req).await;
        assert_eq!(
            status, expected_status,
            "Test case failed: {}. Body: {}",
            description, body
        );
        assert!(body["error"].is_string(), "{}: {}", description, body);
    }
}

#[actix_rt::test]
async fn test_invalid_registration_inputs() {
    let app = init_app!();

    let test_cases = vec![
        (
            json!({ "email": "test@example.com", "password": "pw" }),
            StatusCode::BAD_REQUEST,
            "missing username",
        ),
        (
            json!({ "username": "testuser", "password": "pw" }),
            StatusCode::BAD_REQUEST,
            "missing email",
        ),
        (
            json!({ "username": "testuser", "email": "invalid-email", "password": "pw" }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "invalid email format",
        ),
        (
            json!({ "username": "", "email": "test@example.com", "password": "pw" }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "empty username",
        ),
        (
            json!({ "username": "testuser", "email": "test@example.com", "password": "" }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "empty password",
        ),
    ];

    for (payload, expected_status, description) in test_cases {
        let req = test::TestRequest::post()
            .uri("/users/register")
            .set_json(&payload);
        let (status, body) = send(&app, req).await;
        assert_eq!(
            status, expected_status,
            "Test case failed: {}. Body: {}",
            description, body
        );
        assert!(body["error"].is_string(), "{}: {}", description, body);
    }
}

#[actix_rt::test]
async fn test_list_users_is_public_and_hides_hashes() {
    let app = init_app!();
    register(&app, "first@x.com", "pw1").await;
    register(&app, "second@x.com", "pw2").await;

    let (status, body) = send(&app, test::TestRequest::get().uri("/")).await;
    assert_eq!(status, StatusCode::OK);

    let users = body.as_array().expect("array of users");
    assert_eq!(users.len(), 2);
    for user in users {
        assert!(user.get("password_hash").is_none(), "leaked hash: {}", user);
        assert!(user["email"].as_str().is_some_and(|e| e.ends_with("@x.com")));
    }
}

#[actix_rt::test]
async fn test_protected_routes_reject_missing_token_over_http() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let store = web::Data::from(common::memory_store());
    let settings = web::Data::new(common::auth_settings());
    let server = HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
            .app_data(settings.clone())
            .configure(routes::config)
    })
    .workers(1)
    .listen(listener)
    .expect("Failed to listen")
    .run();
    let handle = server.handle();
    rt::spawn(server);

    let client = reqwest::Client::new();
    let base = format!("http://127.0.0.1:{}", port);

    let resp = client
        .post(format!("{}/task", base))
        .json(&json!({ "title": "Unauthorized Task", "category_id": uuid::Uuid::new_v4() }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Unauthorized access");

    let resp = client
        .get(format!("{}/category", base))
        .header("Authorization", "Bearer forged.token.value")
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);

    let resp = client
        .get(format!("{}/", base))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), reqwest::StatusCode::OK);

    handle.stop(false).await;
}
