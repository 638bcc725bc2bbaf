//! Study Programs

pub mod handlers;
pub mod types;

use axum::routing::{get, put};
use axum::Router;

use crate::api::AppState;

pub use types::{StudyProgram, StudyProgramResponse};

/// Create the study program router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_programs).post(handlers::create_program),
        )
        .route(
            "/{id}",
            put(handlers::update_program).delete(handlers::delete_program),
        )
}
