//! Offered Modules
//!
//! Which module runs in which semester, and who teaches it.

pub mod handlers;
pub mod queries;
pub mod types;

use axum::routing::{delete, get};
use axum::Router;

use crate::api::AppState;

pub use types::OfferedModuleView;

/// Create the offered module router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_offerings).post(handlers::create_offering),
        )
        .route("/{id}", delete(handlers::delete_offering))
}
