//! Scheduler Constraints
//!
//! Constraint type catalog and the constraints configured against it.

pub mod handlers;
pub mod types;

use axum::routing::{get, put};
use axum::Router;

use crate::api::AppState;

pub use types::{ConstraintType, Hardness, SchedulerConstraint};

/// Router for `/api/constraint-types`.
pub fn types_router() -> Router<AppState> {
    Router::new().route("/", get(handlers::list_constraint_types))
}

/// Router for `/api/scheduler-constraints`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_constraints).post(handlers::create_constraint),
        )
        .route(
            "/{id}",
            put(handlers::update_constraint).delete(handlers::delete_constraint),
        )
}
