//! Specialization Handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;
use validator::Validate;

use super::types::{
    CreateSpecializationRequest, Specialization, UpdateSpecializationRequest,
    SPECIALIZATION_COLUMNS,
};
use crate::api::AppState;
use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::permissions::{
    authorize, authorize_update, load_program_domain, Action, ProgramDomain, Resource, Role,
};

#[utoipa::path(
    get,
    path = "/api/specializations",
    tag = "specializations",
    responses((status = 200, body = Vec<Specialization>)),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn list_specializations(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<Specialization>>> {
    authorize(
        &auth.principal(),
        Action::Read,
        &Resource::ProgramOwned { program_id: None },
        &ProgramDomain::empty(),
    )?;

    let rows = sqlx::query_as::<_, Specialization>(&format!(
        "SELECT {SPECIALIZATION_COLUMNS} FROM specializations ORDER BY name"
    ))
    .fetch_all(&state.db)
    .await?;

    Ok(Json(rows))
}

/// Create a specialization. A `HoSP` must attach it to one of their programs.
#[utoipa::path(
    post,
    path = "/api/specializations",
    tag = "specializations",
    request_body = CreateSpecializationRequest,
    responses(
        (status = 200, body = Specialization),
        (status = 400, description = "Missing program_id for a HoSP"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn create_specialization(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateSpecializationRequest>,
) -> ApiResult<Json<Specialization>> {
    let principal = auth.principal();
    if principal.role == Role::Hosp && body.program_id.is_none() {
        return Err(ApiError::Validation("program_id is required".to_string()));
    }

    let domain = load_program_domain(&state.db, &principal).await?;
    authorize(
        &principal,
        Action::Create,
        &Resource::ProgramOwned {
            program_id: body.program_id,
        },
        &domain,
    )?;
    body.validate()?;

    let spec = sqlx::query_as::<_, Specialization>(&format!(
        r"
        INSERT INTO specializations (id, name, acronym, start_date, program_id, status, study_program)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {SPECIALIZATION_COLUMNS}
        "
    ))
    .bind(Uuid::now_v7())
    .bind(body.name.trim())
    .bind(body.acronym.trim())
    .bind(&body.start_date)
    .bind(body.program_id)
    .bind(body.status)
    .bind(&body.study_program)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(spec))
}

#[utoipa::path(
    put,
    path = "/api/specializations/{id}",
    tag = "specializations",
    params(("id" = Uuid, Path, description = "Specialization ID")),
    request_body = UpdateSpecializationRequest,
    responses((status = 200, body = Specialization)),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn update_specialization(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateSpecializationRequest>,
) -> ApiResult<Json<Specialization>> {
    let principal = auth.principal();
    let mut tx = state.db.begin().await?;

    let mut spec = sqlx::query_as::<_, Specialization>(&format!(
        "SELECT {SPECIALIZATION_COLUMNS} FROM specializations WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(ApiError::NotFound("Specialization"))?;

    let domain = load_program_domain(&mut *tx, &principal).await?;
    let before = spec.resource();
    authorize(&principal, Action::Update, &before, &domain)?;
    body.validate()?;

    body.apply_to(&mut spec);
    authorize_update(&principal, &before, &spec.resource(), &domain)?;

    let saved = sqlx::query_as::<_, Specialization>(&format!(
        r"
        UPDATE specializations
        SET name = $2, acronym = $3, start_date = $4, program_id = $5, status = $6,
            study_program = $7
        WHERE id = $1
        RETURNING {SPECIALIZATION_COLUMNS}
        "
    ))
    .bind(spec.id)
    .bind(&spec.name)
    .bind(&spec.acronym)
    .bind(&spec.start_date)
    .bind(spec.program_id)
    .bind(spec.status)
    .bind(&spec.study_program)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(Json(saved))
}

/// Delete a specialization. Deleting a missing specialization succeeds.
#[utoipa::path(
    delete,
    path = "/api/specializations/{id}",
    tag = "specializations",
    params(("id" = Uuid, Path, description = "Specialization ID")),
    responses((status = 204, description = "Specialization deleted")),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn delete_specialization(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let principal = auth.principal();
    let mut tx = state.db.begin().await?;

    let owner: Option<(Option<Uuid>,)> =
        sqlx::query_as("SELECT program_id FROM specializations WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

    let Some((program_id,)) = owner else {
        return Ok(StatusCode::NO_CONTENT);
    };

    let domain = load_program_domain(&mut *tx, &principal).await?;
    authorize(
        &principal,
        Action::Delete,
        &Resource::ProgramOwned { program_id },
        &domain,
    )?;

    sqlx::query("DELETE FROM specializations WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}
