/// User endpoints
///
/// # Endpoints
///
/// - `GET /users` - List users with their roles
/// - `POST /users/crear-usuarios` - Create user and assign roles by id
/// - `DELETE /users/:id` - Delete user by id (cascades to dependents)
/// - `POST /users/login` - Email/password login, returns a bearer token

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use metrica_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, User, UserWithRoles},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Create user request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Plaintext password (hashed before storage)
    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,

    /// Optional display name
    pub name: Option<String>,

    /// Role ids to assign
    #[serde(default)]
    pub roles: Vec<i32>,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Session token (60 minute expiry)
    pub access_token: String,

    /// Token type, always "bearer"
    pub token_type: String,
}

/// Delete confirmation response
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// Human-readable confirmation
    pub message: String,
}

/// Lists all users with roles eagerly resolved, in insertion order
///
/// # Endpoint
///
/// ```text
/// GET /users
/// ```
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserWithRoles>>> {
    let users = User::list_with_roles(&state.db).await?;
    Ok(Json(users))
}

/// Creates a user and assigns the supplied roles atomically
///
/// # Endpoint
///
/// ```text
/// POST /users/crear-usuarios
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "password": "secret",
///   "name": "Ana",
///   "roles": [1, 2]
/// }
/// ```
///
/// # Errors
///
/// - `409 Conflict`: email already registered
/// - `422 Unprocessable Entity`: invalid body, or a role id with no
///   matching role (the whole operation is rolled back)
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserWithRoles>)> {
    req.validate()?;

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create_with_roles(
        &state.db,
        CreateUser {
            email: req.email,
            password_hash,
            name: req.name,
            role_ids: req.roles,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Deletes a user by id
///
/// Dependent productivity, sales, report, task-log, and role association
/// rows are removed by cascade.
///
/// # Endpoint
///
/// ```text
/// DELETE /users/42
/// ```
///
/// # Errors
///
/// - `404 Not Found`: no user with that id
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> ApiResult<Json<DeleteResponse>> {
    let user = User::delete(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let display = user.name.unwrap_or(user.email);

    Ok(Json(DeleteResponse {
        message: format!("User {} deleted", display),
    }))
}

/// Login endpoint
///
/// Verifies credentials and issues a session token whose subject is the
/// user's email, expiring 60 minutes after issuance.
///
/// An unknown email and a wrong password produce the same error; the
/// response never reveals which part failed.
///
/// # Endpoint
///
/// ```text
/// POST /users/login
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "password": "secret"
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: invalid credentials
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate()?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let claims = jwt::Claims::new(&user.email);
    let access_token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok(Json(LoginResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}
