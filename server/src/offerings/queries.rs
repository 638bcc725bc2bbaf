//! Offered module queries shared with the calendar.

use sqlx::PgExecutor;
use uuid::Uuid;

use super::types::OfferedModuleView;
use crate::db::db_error;

const VIEW_SELECT: &str = r"
    SELECT o.id, o.module_code,
           COALESCE(m.name, 'Unknown Module') AS module_name,
           o.lecturer_id,
           CASE WHEN l.id IS NULL THEN 'Unassigned'
                ELSE concat_ws(' ', l.first_name, l.last_name) END AS lecturer_name,
           o.semester, o.status
    FROM offered_modules o
    LEFT JOIN modules m ON m.module_code = o.module_code
    LEFT JOIN lecturers l ON l.id = o.lecturer_id
";

/// Offerings, optionally restricted to one semester.
pub async fn list_offering_views<'e, E>(
    executor: E,
    semester: Option<&str>,
) -> sqlx::Result<Vec<OfferedModuleView>>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, OfferedModuleView>(&format!(
        "{VIEW_SELECT} WHERE ($1::text IS NULL OR o.semester = $1) ORDER BY o.semester, o.module_code"
    ))
    .bind(semester)
    .fetch_all(executor)
    .await
    .map_err(db_error!("list_offering_views"))
}

pub async fn find_offering_view<'e, E>(executor: E, id: Uuid) -> sqlx::Result<Option<OfferedModuleView>>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, OfferedModuleView>(&format!("{VIEW_SELECT} WHERE o.id = $1"))
        .bind(id)
        .fetch_optional(executor)
        .await
        .map_err(db_error!("find_offering_view", offering_id = %id))
}

/// Program of the module behind an offering.
///
/// Outer `None` when the offering does not exist; inner `None` when its module
/// is not attached to a program.
pub async fn offering_program<'e, E>(executor: E, id: Uuid) -> sqlx::Result<Option<Option<Uuid>>>
where
    E: PgExecutor<'e>,
{
    let row: Option<(Option<Uuid>,)> = sqlx::query_as(
        r"
        SELECT m.program_id
        FROM offered_modules o
        LEFT JOIN modules m ON m.module_code = o.module_code
        WHERE o.id = $1
        ",
    )
    .bind(id)
    .fetch_optional(executor)
    .await
    .map_err(db_error!("offering_program", offering_id = %id))?;

    Ok(row.map(|(program_id,)| program_id))
}
