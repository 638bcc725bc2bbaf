//! Database Models

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::permissions::Role;

/// User account.
///
/// `lecturer_id` links `HoSP` and lecturer accounts to their lecturer profile.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub lecturer_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}
