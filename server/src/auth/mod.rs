//! Authentication Service
//!
//! Email/password login, access tokens and the auth middleware.

mod error;
pub(crate) mod handlers;
pub mod jwt;
mod middleware;
mod password;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};

use crate::api::AppState;

pub use error::{AuthError, AuthResult, ErrorResponse};
pub use middleware::{require_auth, AuthUser};
pub use password::{hash_password, verify_password};

/// Create authentication router.
///
/// Public routes:
/// - POST /login - Login with email/password
///
/// Protected routes:
/// - GET /me - Current user
pub fn router(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .route("/me", get(handlers::me))
        .layer(axum_middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/login", post(handlers::login))
        .merge(protected_routes)
}
