//! Lecturer Handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;
use validator::Validate;

use super::queries::{find_lecturer, lock_lecturer, save_lecturer};
use super::types::{CreateLecturerRequest, Lecturer, UpdateLecturerRequest, LECTURER_COLUMNS};
use crate::api::AppState;
use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::permissions::{
    authorize, filter_readable, Action, ProgramDomain, Resource, SELF_EDITABLE_LECTURER_FIELDS,
};

/// List lecturers visible to the caller.
///
/// Admin, PM and `HoSP` see everyone; a lecturer sees only their own record.
#[utoipa::path(
    get,
    path = "/api/lecturers",
    tag = "lecturers",
    responses((status = 200, body = Vec<Lecturer>)),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn list_lecturers(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<Lecturer>>> {
    let rows = sqlx::query_as::<_, Lecturer>(&format!(
        "SELECT {LECTURER_COLUMNS} FROM lecturers ORDER BY last_name NULLS LAST, first_name"
    ))
    .fetch_all(&state.db)
    .await?;

    let visible = filter_readable(&auth.principal(), rows, &ProgramDomain::empty(), |l| {
        Resource::LecturerProfile { lecturer_id: l.id }
    })?;

    Ok(Json(visible))
}

/// Get the caller's own lecturer profile.
#[utoipa::path(
    get,
    path = "/api/lecturers/me",
    tag = "lecturers",
    responses(
        (status = 200, body = Lecturer),
        (status = 403, description = "Not linked to a lecturer profile"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn get_my_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Lecturer>> {
    let principal = auth.principal();
    let lecturer_id = principal.require_lecturer_link()?;
    authorize(
        &principal,
        Action::Read,
        &Resource::LecturerProfile { lecturer_id },
        &ProgramDomain::empty(),
    )?;

    let lecturer = find_lecturer(&state.db, lecturer_id)
        .await?
        .ok_or(ApiError::NotFound("Lecturer profile"))?;

    Ok(Json(lecturer))
}

/// Update the caller's own contact details.
///
/// Only `personal_email` and `phone` are applied; other fields in the body
/// are ignored.
#[utoipa::path(
    patch,
    path = "/api/lecturers/me",
    tag = "lecturers",
    request_body = UpdateLecturerRequest,
    responses((status = 200, body = Lecturer)),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn update_my_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(mut body): Json<UpdateLecturerRequest>,
) -> ApiResult<Json<Lecturer>> {
    let principal = auth.principal();
    let lecturer_id = principal.require_lecturer_link()?;
    authorize(
        &principal,
        Action::Update,
        &Resource::LecturerProfile { lecturer_id },
        &ProgramDomain::empty(),
    )?;

    let dropped = body.retain_fields(SELF_EDITABLE_LECTURER_FIELDS);
    if !dropped.is_empty() {
        tracing::debug!(?dropped, %lecturer_id, "Ignoring fields outside the self-edit allow-list");
    }
    body.validate()?;

    let mut tx = state.db.begin().await?;
    let mut lecturer = lock_lecturer(&mut tx, lecturer_id)
        .await?
        .ok_or(ApiError::NotFound("Lecturer profile"))?;
    body.apply_to(&mut lecturer);
    let saved = save_lecturer(&mut tx, &lecturer).await?;
    tx.commit().await?;

    Ok(Json(saved))
}

/// Create a lecturer (admin/PM).
#[utoipa::path(
    post,
    path = "/api/lecturers",
    tag = "lecturers",
    request_body = CreateLecturerRequest,
    responses((status = 200, body = Lecturer)),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn create_lecturer(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateLecturerRequest>,
) -> ApiResult<Json<Lecturer>> {
    authorize(
        &auth.principal(),
        Action::Create,
        &Resource::Catalog,
        &ProgramDomain::empty(),
    )?;
    body.validate()?;

    let lecturer = sqlx::query_as::<_, Lecturer>(&format!(
        r"
        INSERT INTO lecturers (id, first_name, last_name, title, employment_type,
                               personal_email, mdh_email, phone, location, teaching_load)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING {LECTURER_COLUMNS}
        "
    ))
    .bind(Uuid::now_v7())
    .bind(&body.first_name)
    .bind(&body.last_name)
    .bind(&body.title)
    .bind(&body.employment_type)
    .bind(&body.personal_email)
    .bind(&body.mdh_email)
    .bind(&body.phone)
    .bind(&body.location)
    .bind(&body.teaching_load)
    .fetch_one(&state.db)
    .await?;

    tracing::info!(lecturer_id = %lecturer.id, "Lecturer created");
    Ok(Json(lecturer))
}

/// Update any lecturer (admin/PM).
#[utoipa::path(
    put,
    path = "/api/lecturers/{id}",
    tag = "lecturers",
    params(("id" = Uuid, Path, description = "Lecturer ID")),
    request_body = UpdateLecturerRequest,
    responses((status = 200, body = Lecturer)),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn update_lecturer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateLecturerRequest>,
) -> ApiResult<Json<Lecturer>> {
    authorize(
        &auth.principal(),
        Action::Update,
        &Resource::Catalog,
        &ProgramDomain::empty(),
    )?;
    body.validate()?;

    let mut tx = state.db.begin().await?;
    let mut lecturer = lock_lecturer(&mut tx, id)
        .await?
        .ok_or(ApiError::NotFound("Lecturer"))?;
    body.apply_to(&mut lecturer);
    let saved = save_lecturer(&mut tx, &lecturer).await?;
    tx.commit().await?;

    Ok(Json(saved))
}

/// Delete a lecturer (admin/PM). Deleting a missing lecturer succeeds.
#[utoipa::path(
    delete,
    path = "/api/lecturers/{id}",
    tag = "lecturers",
    params(("id" = Uuid, Path, description = "Lecturer ID")),
    responses((status = 204, description = "Lecturer deleted")),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn delete_lecturer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    authorize(
        &auth.principal(),
        Action::Delete,
        &Resource::Catalog,
        &ProgramDomain::empty(),
    )?;

    sqlx::query("DELETE FROM lecturers WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
