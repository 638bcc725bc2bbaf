//! Database queries for permission scoping.

use sqlx::PgExecutor;
use uuid::Uuid;

use super::models::Role;
use super::resolver::{DomainProgram, Principal, ProgramDomain};
use crate::db::db_error;

/// Load the programs headed by a lecturer.
pub async fn programs_headed_by<'e, E>(
    executor: E,
    lecturer_id: Uuid,
) -> sqlx::Result<ProgramDomain>
where
    E: PgExecutor<'e>,
{
    let rows: Vec<(Uuid, String, String)> = sqlx::query_as(
        r"
        SELECT id, name, acronym
        FROM study_programs
        WHERE head_of_program_id = $1
        ORDER BY name
        ",
    )
    .bind(lecturer_id)
    .fetch_all(executor)
    .await
    .map_err(db_error!("programs_headed_by", lecturer_id = %lecturer_id))?;

    Ok(ProgramDomain::new(
        rows.into_iter()
            .map(|(id, name, acronym)| DomainProgram { id, name, acronym })
            .collect(),
    ))
}

/// Load the program domain for a principal.
///
/// Only `HoSP` principals with a lecturer link have a non-empty domain.
pub async fn load_program_domain<'e, E>(
    executor: E,
    principal: &Principal,
) -> sqlx::Result<ProgramDomain>
where
    E: PgExecutor<'e>,
{
    match (principal.role, principal.lecturer_id) {
        (Role::Hosp, Some(lecturer_id)) => programs_headed_by(executor, lecturer_id).await,
        _ => Ok(ProgramDomain::empty()),
    }
}
