//! Authentication HTTP Handlers

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::error::{AuthError, AuthResult};
use super::jwt::generate_access_token;
use super::middleware::AuthUser;
use super::password::verify_password;
use crate::api::AppState;
use crate::db::find_user_by_email;
use crate::permissions::Role;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Login request.
#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 254))]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Issued access token.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    /// Always "bearer".
    pub token_type: String,
    /// Access token expiry in seconds.
    pub expires_in: i64,
    pub role: Role,
    pub lecturer_id: Option<Uuid>,
}

/// Current user.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct MeResponse {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub lecturer_id: Option<Uuid>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Log in with email and password.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, body = LoginResponse),
        (status = 401, description = "Incorrect email or password"),
    )
)]
#[tracing::instrument(skip(state, body))]
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AuthResult<Json<LoginResponse>> {
    body.validate()
        .map_err(|e| AuthError::Validation(e.to_string()))?;

    let Some(user) = find_user_by_email(&state.db, &body.email).await? else {
        tracing::info!(email = %body.email, "Login failed: unknown email");
        return Err(AuthError::InvalidCredentials);
    };

    if !verify_password(&body.password, &user.password_hash)? {
        tracing::info!(user_id = %user.id, "Login failed: wrong password");
        return Err(AuthError::InvalidCredentials);
    }

    let token = generate_access_token(
        user.id,
        user.role,
        &state.config.jwt_private_key,
        state.config.jwt_access_expiry,
    )?;

    tracing::info!(user_id = %user.id, role = %user.role, "User logged in");

    Ok(Json(LoginResponse {
        access_token: token.token,
        token_type: "bearer".to_string(),
        expires_in: token.expires_in,
        role: user.role,
        lecturer_id: user.lecturer_id,
    }))
}

/// Get the authenticated user.
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    responses((status = 200, body = MeResponse)),
    security(("bearer_auth" = []))
)]
pub async fn me(auth: AuthUser) -> Json<MeResponse> {
    Json(MeResponse {
        id: auth.id,
        email: auth.email,
        role: auth.role,
        lecturer_id: auth.lecturer_id,
    })
}
