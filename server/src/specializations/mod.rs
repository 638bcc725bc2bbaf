//! Specializations

pub mod handlers;
pub mod types;

use axum::routing::{get, put};
use axum::Router;

use crate::api::AppState;

pub use types::Specialization;

/// Create the specialization router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_specializations).post(handlers::create_specialization),
        )
        .route(
            "/{id}",
            put(handlers::update_specialization).delete(handlers::delete_specialization),
        )
}
