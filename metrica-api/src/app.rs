/// Application state and router builder
///
/// This module defines the shared application state and provides a
/// function to build the Axum router with all routes and middleware.
///
/// # Routes
///
/// ```text
/// /
/// ├── GET  /health                  # Health check
/// ├── /users
/// │   ├── GET    /                  # List users with roles
/// │   ├── POST   /crear-usuarios    # Create user and assign roles
/// │   ├── POST   /login             # Email/password login → bearer token
/// │   └── DELETE /:id               # Delete user (cascades)
/// ├── /data
/// │   ├── GET /productivity         # Unfiltered listings
/// │   ├── GET /sales
/// │   └── GET /reports
/// └── /tasks                        # Bulk CSV ingestion (multipart)
///     ├── POST /tasks
///     ├── POST /role-tasks
///     ├── POST /task-logs
///     ├── POST /productivity
///     ├── POST /sales
///     └── POST /reports
/// ```

use crate::config::Config;
use axum::{
    routing::{delete, get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let user_routes = Router::new()
        .route("/users", get(routes::users::list_users))
        .route("/users/crear-usuarios", post(routes::users::create_user))
        .route("/users/login", post(routes::users::login))
        .route("/users/:id", delete(routes::users::delete_user));

    let data_routes = Router::new()
        .route("/productivity", get(routes::data::get_productivity))
        .route("/sales", get(routes::data::get_sales))
        .route("/reports", get(routes::data::get_reports));

    let ingest_routes = Router::new()
        .route("/tasks", post(routes::ingest::upload_tasks))
        .route("/role-tasks", post(routes::ingest::upload_role_tasks))
        .route("/task-logs", post(routes::ingest::upload_task_logs))
        .route("/productivity", post(routes::ingest::upload_productivity))
        .route("/sales", post(routes::ingest::upload_sales))
        .route("/reports", post(routes::ingest::upload_reports));

    Router::new()
        .route("/health", get(routes::health::health_check))
        .merge(user_routes)
        .nest("/data", data_routes)
        .nest("/tasks", ingest_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
