//! Student Groups

pub mod handlers;
pub mod types;

use axum::routing::{get, put};
use axum::Router;

use crate::api::AppState;

pub use types::Group;

/// Create the group router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_groups).post(handlers::create_group))
        .route(
            "/{id}",
            put(handlers::update_group).delete(handlers::delete_group),
        )
}
