//! Lecturers
//!
//! Lecturer records plus the self-service profile endpoints.

pub mod handlers;
pub mod queries;
pub mod types;

use axum::routing::{get, put};
use axum::Router;

use crate::api::AppState;

pub use types::Lecturer;

/// Create the lecturer router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_lecturers).post(handlers::create_lecturer),
        )
        .route(
            "/me",
            get(handlers::get_my_profile).patch(handlers::update_my_profile),
        )
        .route(
            "/{id}",
            put(handlers::update_lecturer).delete(handlers::delete_lecturer),
        )
}
