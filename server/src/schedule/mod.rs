//! Calendar
//!
//! Weekly slots of offered modules, per semester.

pub mod handlers;
pub mod types;

use axum::routing::{delete, get};
use axum::Router;

use crate::api::AppState;

pub use types::ScheduleEntryView;

/// Create the calendar router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_schedule).post(handlers::create_schedule_entry),
        )
        .route("/{id}", delete(handlers::delete_schedule_entry))
}
