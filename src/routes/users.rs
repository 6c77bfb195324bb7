use crate::{
    auth::{
        generate_token,
        password::{hash_password_blocking, verify_password_blocking},
        AuthResponse, AuthSettings, LoginRequest, RegisterRequest,
    },
    db::Store,
    error::AppError,
    models::User,
};
use actix_web::{get, post, web, HttpResponse, Responder};
use validator::Validate;

/// Lists every registered user.
///
/// Public, like the rest of the user surface. Password hashes are never serialized.
#[get("/")]
pub async fn list_users(store: web::Data<dyn Store>) -> Result<impl Responder, AppError> {
    let users = store.list_users().await?;
    Ok(HttpResponse::Ok().json(users))
}

/// Register a new user
///
/// Hashes the password, stores the account and returns a token for it.
///
/// ## Responses:
/// - `200 OK`: `{message, token}`.
/// - `409 Conflict`: the email is already registered.
/// - `422 Unprocessable Entity`: invalid email, empty username or password.
#[post("/register")]
pub async fn register(
    store: web::Data<dyn Store>,
    settings: web::Data<AuthSettings>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;
    let RegisterRequest {
        username,
        email,
        password,
    } = register_data.into_inner();

    if store.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("User already registered".into()));
    }

    let password_hash = hash_password_blocking(password, settings.bcrypt_cost).await?;
    let user = User::new(username, email, password_hash);
    store.insert_user(&user).await?;

    let token = generate_token(&settings.keys, user.id)?;
    log::info!("registered user {}", user.id);

    Ok(HttpResponse::Ok().json(AuthResponse {
        message: "User registered successfully".into(),
        token,
    }))
}

/// Login user
///
/// ## Responses:
/// - `200 OK`: `{message, token}`.
/// - `404 Not Found`: no user with that email.
/// - `401 Unauthorized`: wrong password.
#[post("/login")]
pub async fn login(
    store: web::Data<dyn Store>,
    settings: web::Data<AuthSettings>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let LoginRequest { email, password } = login_data.into_inner();

    let user = store
        .find_user_by_email(&email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    if !verify_password_blocking(password, user.password_hash.clone()).await? {
        log::warn!("failed login for user {}", user.id);
        return Err(AppError::Unauthorized("Incorrect password".into()));
    }

    let token = generate_token(&settings.keys, user.id)?;
    log::info!("user {} logged in", user.id);

    Ok(HttpResponse::Ok().json(AuthResponse {
        message: "Login successful".into(),
        token,
    }))
}
