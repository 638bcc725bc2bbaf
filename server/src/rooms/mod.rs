//! Rooms

pub mod handlers;
pub mod types;

use axum::routing::{get, put};
use axum::Router;

use crate::api::AppState;

pub use types::Room;

/// Create the room router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_rooms).post(handlers::create_room))
        .route("/{id}", put(handlers::update_room).delete(handlers::delete_room))
}
