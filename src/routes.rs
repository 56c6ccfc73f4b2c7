use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::handlers;
use crate::middleware::require_auth;
use crate::state::AppState;

/// Build the full application router over the given stores.
pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_public_routes())
        // Protected API
        .merge(auth_routes(state.clone()))
        .merge(task_routes(state.clone()))
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
}

fn auth_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/whoami", get(handlers::auth::whoami))
        .layer(from_fn_with_state(state, require_auth))
}

fn task_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/tasks", get(handlers::tasks::list).post(handlers::tasks::create))
        .route(
            "/api/v1/tasks/:id",
            get(handlers::tasks::get)
                .put(handlers::tasks::update)
                .delete(handlers::tasks::delete),
        )
        .layer(from_fn_with_state(state, require_auth))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "status": 200,
        "name": "Tasker API",
        "version": version,
        "description": "Task management REST API with per-user task ownership",
        "endpoints": {
            "register": "POST /auth/register (public)",
            "login": "POST /auth/login (public)",
            "logout": "POST /auth/logout (protected)",
            "whoami": "GET /auth/whoami (protected)",
            "tasks": "GET|POST /api/v1/tasks (protected)",
            "task": "GET|PUT|DELETE /api/v1/tasks/:id (protected)",
        }
    }))
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    // Probe the task store with a lookup that never matches a real row
    match state.tasks.find(Uuid::nil()).await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": 200,
                "health": "ok",
                "timestamp": now,
                "store": "ok"
            })),
        ),
        Err(e) => {
            tracing::error!("health probe failed: {}", e);
            (
                axum::http::StatusCode::SERVICE_UNAVAILABLE,
                axum::response::Json(json!({
                    "status": 503,
                    "health": "degraded",
                    "timestamp": now,
                    "store": "unavailable"
                })),
            )
        }
    }
}
