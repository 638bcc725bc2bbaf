//! Lecturer queries shared with other routers.

use sqlx::{PgConnection, PgExecutor};
use uuid::Uuid;

use super::types::{Lecturer, LECTURER_COLUMNS};
use crate::db::db_error;

/// Load lecturers by id, in no particular order. Unknown ids are skipped.
pub async fn find_lecturers_by_ids<'e, E>(executor: E, ids: &[Uuid]) -> sqlx::Result<Vec<Lecturer>>
where
    E: PgExecutor<'e>,
{
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    sqlx::query_as::<_, Lecturer>(&format!(
        "SELECT {LECTURER_COLUMNS} FROM lecturers WHERE id = ANY($1)"
    ))
    .bind(ids)
    .fetch_all(executor)
    .await
    .map_err(db_error!("find_lecturers_by_ids", count = ids.len()))
}

pub async fn find_lecturer<'e, E>(executor: E, id: Uuid) -> sqlx::Result<Option<Lecturer>>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Lecturer>(&format!(
        "SELECT {LECTURER_COLUMNS} FROM lecturers WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await
    .map_err(db_error!("find_lecturer", lecturer_id = %id))
}

/// Lock a lecturer row for the rest of the transaction.
pub(crate) async fn lock_lecturer(conn: &mut PgConnection, id: Uuid) -> sqlx::Result<Option<Lecturer>> {
    sqlx::query_as::<_, Lecturer>(&format!(
        "SELECT {LECTURER_COLUMNS} FROM lecturers WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await
    .map_err(db_error!("lock_lecturer", lecturer_id = %id))
}

/// Write every column of `lecturer` back.
pub(crate) async fn save_lecturer(conn: &mut PgConnection, lecturer: &Lecturer) -> sqlx::Result<Lecturer> {
    sqlx::query_as::<_, Lecturer>(&format!(
        r"
        UPDATE lecturers
        SET first_name = $2, last_name = $3, title = $4, employment_type = $5,
            personal_email = $6, mdh_email = $7, phone = $8, location = $9,
            teaching_load = $10, updated_at = NOW()
        WHERE id = $1
        RETURNING {LECTURER_COLUMNS}
        "
    ))
    .bind(lecturer.id)
    .bind(&lecturer.first_name)
    .bind(&lecturer.last_name)
    .bind(&lecturer.title)
    .bind(&lecturer.employment_type)
    .bind(&lecturer.personal_email)
    .bind(&lecturer.mdh_email)
    .bind(&lecturer.phone)
    .bind(&lecturer.location)
    .bind(&lecturer.teaching_load)
    .fetch_one(conn)
    .await
    .map_err(db_error!("save_lecturer", lecturer_id = %lecturer.id))
}
