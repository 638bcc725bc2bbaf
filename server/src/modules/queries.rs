//! Module Queries

use std::collections::HashMap;

use sqlx::{PgConnection, PgExecutor};

use super::types::{LinkedSpecialization, ModuleRow, MODULE_COLUMNS};
use crate::specializations::Specialization;

pub async fn find_module<'e>(
    executor: impl PgExecutor<'e>,
    module_code: &str,
) -> sqlx::Result<Option<ModuleRow>> {
    sqlx::query_as::<_, ModuleRow>(&format!(
        "SELECT {MODULE_COLUMNS} FROM modules WHERE module_code = $1"
    ))
    .bind(module_code)
    .fetch_optional(executor)
    .await
}

pub async fn lock_module(
    conn: &mut PgConnection,
    module_code: &str,
) -> sqlx::Result<Option<ModuleRow>> {
    sqlx::query_as::<_, ModuleRow>(&format!(
        "SELECT {MODULE_COLUMNS} FROM modules WHERE module_code = $1 FOR UPDATE"
    ))
    .bind(module_code)
    .fetch_optional(conn)
    .await
}

/// Specializations linked to each of the given modules, ordered by name.
pub async fn specializations_by_module<'e>(
    executor: impl PgExecutor<'e>,
    module_codes: &[String],
) -> sqlx::Result<HashMap<String, Vec<Specialization>>> {
    let rows = sqlx::query_as::<_, LinkedSpecialization>(
        r"
        SELECT ms.module_code, s.id, s.name, s.acronym, s.start_date, s.program_id, s.status,
               s.study_program
        FROM module_specializations ms
        JOIN specializations s ON s.id = ms.specialization_id
        WHERE ms.module_code = ANY($1)
        ORDER BY s.name
        ",
    )
    .bind(module_codes)
    .fetch_all(executor)
    .await?;

    let mut grouped: HashMap<String, Vec<Specialization>> = HashMap::new();
    for row in rows {
        grouped
            .entry(row.module_code)
            .or_default()
            .push(row.specialization);
    }
    Ok(grouped)
}

/// Replace the specialization links of a module.
///
/// Ids that do not name an existing specialization are skipped.
pub async fn replace_specializations(
    conn: &mut PgConnection,
    module_code: &str,
    specialization_ids: &[uuid::Uuid],
) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM module_specializations WHERE module_code = $1")
        .bind(module_code)
        .execute(&mut *conn)
        .await?;

    if specialization_ids.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r"
        INSERT INTO module_specializations (module_code, specialization_id)
        SELECT $1, id FROM specializations WHERE id = ANY($2)
        ON CONFLICT DO NOTHING
        ",
    )
    .bind(module_code)
    .bind(specialization_ids)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

pub async fn save_module(conn: &mut PgConnection, row: &ModuleRow) -> sqlx::Result<ModuleRow> {
    sqlx::query_as::<_, ModuleRow>(&format!(
        r"
        UPDATE modules
        SET name = $2, ects = $3, room_type = $4, assessment_type = $5, semester = $6,
            category = $7, program_id = $8
        WHERE module_code = $1
        RETURNING {MODULE_COLUMNS}
        "
    ))
    .bind(&row.module_code)
    .bind(&row.name)
    .bind(row.ects)
    .bind(&row.room_type)
    .bind(&row.assessment_type)
    .bind(row.semester)
    .bind(&row.category)
    .bind(row.program_id)
    .fetch_one(conn)
    .await
}
