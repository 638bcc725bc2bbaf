//! Study Program Handlers

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;
use validator::Validate;

use super::types::{
    CreateProgramRequest, StudyProgram, StudyProgramResponse, UpdateProgramRequest,
    PROGRAM_COLUMNS,
};
use crate::api::AppState;
use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::lecturers::queries::{find_lecturer, find_lecturers_by_ids};
use crate::permissions::{
    authorize, authorize_update, load_program_domain, Action, ProgramDomain, Resource,
};

/// List all study programs with their head lecturer.
#[utoipa::path(
    get,
    path = "/api/study-programs",
    tag = "study-programs",
    responses((status = 200, body = Vec<StudyProgramResponse>)),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn list_programs(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<StudyProgramResponse>>> {
    authorize(
        &auth.principal(),
        Action::Read,
        &Resource::Program {
            head_of_program_id: None,
        },
        &ProgramDomain::empty(),
    )?;

    let programs = sqlx::query_as::<_, StudyProgram>(&format!(
        "SELECT {PROGRAM_COLUMNS} FROM study_programs ORDER BY name"
    ))
    .fetch_all(&state.db)
    .await?;

    let mut head_ids: Vec<Uuid> = programs
        .iter()
        .filter_map(|p| p.head_of_program_id)
        .collect();
    head_ids.sort_unstable();
    head_ids.dedup();

    let heads: HashMap<Uuid, _> = find_lecturers_by_ids(&state.db, &head_ids)
        .await?
        .into_iter()
        .map(|l| (l.id, l))
        .collect();

    let response = programs
        .into_iter()
        .map(|program| {
            let head_lecturer = program
                .head_of_program_id
                .and_then(|id| heads.get(&id).cloned());
            StudyProgramResponse {
                program,
                head_lecturer,
            }
        })
        .collect();

    Ok(Json(response))
}

/// Create a study program (admin/PM).
#[utoipa::path(
    post,
    path = "/api/study-programs",
    tag = "study-programs",
    request_body = CreateProgramRequest,
    responses((status = 200, body = StudyProgramResponse)),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn create_program(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateProgramRequest>,
) -> ApiResult<Json<StudyProgramResponse>> {
    let principal = auth.principal();
    let domain = load_program_domain(&state.db, &principal).await?;
    authorize(
        &principal,
        Action::Create,
        &Resource::Program {
            head_of_program_id: body.head_of_program_id,
        },
        &domain,
    )?;
    body.validate()?;

    let program = sqlx::query_as::<_, StudyProgram>(&format!(
        r"
        INSERT INTO study_programs (id, name, acronym, status, start_date, total_ects,
                                    location, level, degree_type, head_of_program_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING {PROGRAM_COLUMNS}
        "
    ))
    .bind(Uuid::now_v7())
    .bind(body.name.trim())
    .bind(body.acronym.trim())
    .bind(body.status)
    .bind(&body.start_date)
    .bind(body.total_ects)
    .bind(&body.location)
    .bind(&body.level)
    .bind(&body.degree_type)
    .bind(body.head_of_program_id)
    .fetch_one(&state.db)
    .await?;

    tracing::info!(program_id = %program.id, "Study program created");
    with_head(&state, program).await.map(Json)
}

/// Update a study program.
///
/// A `HoSP` may edit programs they head but cannot hand the program to a
/// different head.
#[utoipa::path(
    put,
    path = "/api/study-programs/{id}",
    tag = "study-programs",
    params(("id" = Uuid, Path, description = "Program ID")),
    request_body = UpdateProgramRequest,
    responses(
        (status = 200, body = StudyProgramResponse),
        (status = 403, description = "Not the head of this program"),
        (status = 404, description = "Program not found"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn update_program(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateProgramRequest>,
) -> ApiResult<Json<StudyProgramResponse>> {
    let principal = auth.principal();
    let mut tx = state.db.begin().await?;

    let mut program = sqlx::query_as::<_, StudyProgram>(&format!(
        "SELECT {PROGRAM_COLUMNS} FROM study_programs WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(ApiError::NotFound("Program"))?;

    let domain = load_program_domain(&mut *tx, &principal).await?;
    let before = program.resource();
    authorize(&principal, Action::Update, &before, &domain)?;
    body.validate()?;

    body.apply_to(&mut program);
    authorize_update(&principal, &before, &program.resource(), &domain)?;

    let saved = sqlx::query_as::<_, StudyProgram>(&format!(
        r"
        UPDATE study_programs
        SET name = $2, acronym = $3, status = $4, start_date = $5, total_ects = $6,
            location = $7, level = $8, degree_type = $9, head_of_program_id = $10,
            updated_at = NOW()
        WHERE id = $1
        RETURNING {PROGRAM_COLUMNS}
        "
    ))
    .bind(program.id)
    .bind(&program.name)
    .bind(&program.acronym)
    .bind(program.status)
    .bind(&program.start_date)
    .bind(program.total_ects)
    .bind(&program.location)
    .bind(&program.level)
    .bind(&program.degree_type)
    .bind(program.head_of_program_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    with_head(&state, saved).await.map(Json)
}

/// Delete a study program (admin/PM). Deleting a missing program succeeds.
#[utoipa::path(
    delete,
    path = "/api/study-programs/{id}",
    tag = "study-programs",
    params(("id" = Uuid, Path, description = "Program ID")),
    responses((status = 204, description = "Program deleted")),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn delete_program(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let principal = auth.principal();
    let head: Option<(Option<Uuid>,)> =
        sqlx::query_as("SELECT head_of_program_id FROM study_programs WHERE id = $1")
            .bind(id)
            .fetch_optional(&state.db)
            .await?;

    let head_of_program_id = head.and_then(|(h,)| h);
    authorize(
        &principal,
        Action::Delete,
        &Resource::Program { head_of_program_id },
        &ProgramDomain::empty(),
    )?;

    sqlx::query("DELETE FROM study_programs WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn with_head(state: &AppState, program: StudyProgram) -> ApiResult<StudyProgramResponse> {
    let head_lecturer = match program.head_of_program_id {
        Some(id) => find_lecturer(&state.db, id).await?,
        None => None,
    };
    Ok(StudyProgramResponse {
        program,
        head_lecturer,
    })
}
