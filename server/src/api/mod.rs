//! API Router and Application State
//!
//! Central routing configuration and shared state.

pub mod openapi;
pub mod patch;

use axum::{extract::State, middleware::from_fn_with_state, routing::get, Json, Router};
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth, availabilities, config::Config, constraints, db, groups, lecturers, modules,
    offerings, programs, rooms, schedule, specializations,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,
    /// Server configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Every resource route requires a bearer token
    let protected_routes = Router::new()
        .nest("/api/study-programs", programs::router())
        .nest("/api/lecturers", lecturers::router())
        .nest("/api/modules", modules::router())
        .nest("/api/specializations", specializations::router())
        .nest("/api/groups", groups::router())
        .nest("/api/rooms", rooms::router())
        .nest("/api/availabilities", availabilities::router())
        .nest("/api/constraint-types", constraints::types_router())
        .nest("/api/scheduler-constraints", constraints::router())
        .nest("/api/offered-modules", offerings::router())
        .nest("/api/schedule", schedule::router())
        .layer(from_fn_with_state(state.clone(), auth::require_auth));

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Auth routes (pass state for middleware)
        .nest("/auth", auth::router(state.clone()))
        .merge(protected_routes)
        // API documentation
        .merge(api_docs())
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        // State
        .with_state(state)
}

/// Health check response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    /// Service status
    status: &'static str,
    /// Whether the database answered a ping
    database: bool,
}

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, body = HealthResponse))
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        database: db::ping(&state.db).await,
    })
}

/// API documentation routes.
fn api_docs() -> Router<AppState> {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", openapi::ApiDoc::openapi())
        .into()
}
