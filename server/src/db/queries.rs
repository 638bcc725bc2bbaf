//! Database Queries
//!
//! Runtime queries (no compile-time `DATABASE_URL` required).

use sqlx::PgPool;
use uuid::Uuid;

use super::db_error;
use super::models::User;
use crate::permissions::Role;

const USER_COLUMNS: &str = "id, email, password_hash, role, lecturer_id, created_at";

/// Find user by ID.
pub async fn find_user_by_id(pool: &PgPool, id: Uuid) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(db_error!("find_user_by_id", user_id = %id))
}

/// Find user by email (case-insensitive).
pub async fn find_user_by_email(pool: &PgPool, email: &str) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE lower(email) = lower($1)"
    ))
    .bind(email.trim())
    .fetch_optional(pool)
    .await
    .map_err(db_error!("find_user_by_email"))
}

/// Create a new user account.
pub async fn create_user(
    pool: &PgPool,
    email: &str,
    password_hash: &str,
    role: Role,
    lecturer_id: Option<Uuid>,
) -> sqlx::Result<User> {
    sqlx::query_as::<_, User>(&format!(
        r"
        INSERT INTO users (id, email, password_hash, role, lecturer_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {USER_COLUMNS}
        "
    ))
    .bind(Uuid::now_v7())
    .bind(email.trim())
    .bind(password_hash)
    .bind(role)
    .bind(lecturer_id)
    .fetch_one(pool)
    .await
    .map_err(db_error!("create_user", role = %role))
}
