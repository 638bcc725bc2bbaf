//! Lecturer Availabilities

pub mod handlers;
pub mod types;

use axum::routing::{delete, get, post};
use axum::Router;

use crate::api::AppState;

pub use types::LecturerAvailability;

/// Create the availability router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_availabilities))
        .route("/update", post(handlers::upsert_availability))
        .route("/lecturer/{lecturer_id}", delete(handlers::delete_availability))
}
