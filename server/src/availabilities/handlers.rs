//! Availability Handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use super::types::{LecturerAvailability, UpsertAvailabilityRequest, AVAILABILITY_COLUMNS};
use crate::api::AppState;
use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::permissions::{
    authorize, filter_readable, Action, PermissionError, ProgramDomain, Resource, Role,
};

/// List availabilities. Administrators see all, lecturers see their own.
#[utoipa::path(
    get,
    path = "/api/availabilities",
    tag = "availabilities",
    responses(
        (status = 200, body = Vec<LecturerAvailability>),
        (status = 403, description = "Role may not read availabilities"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn list_availabilities(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<LecturerAvailability>>> {
    let principal = auth.principal();
    let domain = ProgramDomain::empty();

    let rows = if principal.role.is_administrative() {
        sqlx::query_as::<_, LecturerAvailability>(&format!(
            "SELECT {AVAILABILITY_COLUMNS} FROM lecturer_availabilities ORDER BY updated_at DESC"
        ))
        .fetch_all(&state.db)
        .await?
    } else if principal.role == Role::Lecturer {
        let own = principal.require_lecturer_link()?;
        sqlx::query_as::<_, LecturerAvailability>(&format!(
            "SELECT {AVAILABILITY_COLUMNS} FROM lecturer_availabilities WHERE lecturer_id = $1"
        ))
        .bind(own)
        .fetch_all(&state.db)
        .await?
    } else {
        return Err(PermissionError::Forbidden.into());
    };

    let visible = filter_readable(&principal, rows, &domain, LecturerAvailability::resource)?;
    Ok(Json(visible))
}

/// Create or replace a lecturer's availability.
#[utoipa::path(
    post,
    path = "/api/availabilities/update",
    tag = "availabilities",
    request_body = UpsertAvailabilityRequest,
    responses(
        (status = 200, body = LecturerAvailability),
        (status = 403, description = "Not allowed to edit this lecturer"),
        (status = 409, description = "Concurrent insert for the same lecturer"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, body), fields(lecturer_id = %body.lecturer_id))]
pub async fn upsert_availability(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<UpsertAvailabilityRequest>,
) -> ApiResult<Json<LecturerAvailability>> {
    authorize(
        &auth.principal(),
        Action::Update,
        &Resource::Availability {
            lecturer_id: body.lecturer_id,
        },
        &ProgramDomain::empty(),
    )?;

    let mut tx = state.db.begin().await?;

    let existing: Option<(Uuid,)> = sqlx::query_as(
        "SELECT id FROM lecturer_availabilities WHERE lecturer_id = $1 FOR UPDATE",
    )
    .bind(body.lecturer_id)
    .fetch_optional(&mut *tx)
    .await?;

    let saved = if let Some((id,)) = existing {
        sqlx::query_as::<_, LecturerAvailability>(&format!(
            r"
            UPDATE lecturer_availabilities
            SET schedule_data = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {AVAILABILITY_COLUMNS}
            "
        ))
        .bind(id)
        .bind(&body.schedule_data)
        .fetch_one(&mut *tx)
        .await?
    } else {
        // A concurrent insert for the same lecturer fails on the unique key (409).
        sqlx::query_as::<_, LecturerAvailability>(&format!(
            r"
            INSERT INTO lecturer_availabilities (id, lecturer_id, schedule_data)
            VALUES ($1, $2, $3)
            RETURNING {AVAILABILITY_COLUMNS}
            "
        ))
        .bind(Uuid::now_v7())
        .bind(body.lecturer_id)
        .bind(&body.schedule_data)
        .fetch_one(&mut *tx)
        .await?
    };

    tx.commit().await?;
    tracing::debug!(availability_id = %saved.id, "Availability saved");
    Ok(Json(saved))
}

/// Delete a lecturer's availability. Deleting a missing one succeeds.
#[utoipa::path(
    delete,
    path = "/api/availabilities/lecturer/{lecturer_id}",
    tag = "availabilities",
    params(("lecturer_id" = Uuid, Path, description = "Lecturer ID")),
    responses((status = 204, description = "Availability deleted")),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn delete_availability(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(lecturer_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    authorize(
        &auth.principal(),
        Action::Delete,
        &Resource::Availability { lecturer_id },
        &ProgramDomain::empty(),
    )?;

    sqlx::query("DELETE FROM lecturer_availabilities WHERE lecturer_id = $1")
        .bind(lecturer_id)
        .execute(&state.db)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
