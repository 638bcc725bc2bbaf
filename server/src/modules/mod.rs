//! Modules
//!
//! Course modules keyed by module code, with specialization links and an
//! assessment breakdown.

pub mod handlers;
pub mod queries;
pub mod types;

use axum::routing::get;
use axum::Router;

use crate::api::AppState;

pub use types::{ModuleResponse, ModuleRow};

/// Create the module router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_modules).post(handlers::create_module))
        .route(
            "/{module_code}",
            get(handlers::get_module)
                .put(handlers::update_module)
                .delete(handlers::delete_module),
        )
}
