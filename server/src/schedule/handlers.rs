//! Calendar Handlers

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;
use validator::Validate;

use super::types::{CreateScheduleEntryRequest, ScheduleEntryView, ScheduleParams};
use crate::api::AppState;
use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::offerings::queries::offering_program;
use crate::permissions::{authorize, load_program_domain, Action, ProgramDomain, Resource};

const VIEW_SELECT: &str = r"
    SELECT e.id, e.offered_module_id,
           COALESCE(m.name, 'Unknown') AS module_name,
           CASE WHEN l.id IS NULL THEN 'Unassigned'
                ELSE concat_ws(' ', l.first_name, l.last_name) END AS lecturer_name,
           e.room_id,
           COALESCE(r.name, 'No Room') AS room_name,
           e.day_of_week, e.start_time, e.end_time, e.semester
    FROM schedule_entries e
    LEFT JOIN offered_modules o ON o.id = e.offered_module_id
    LEFT JOIN modules m ON m.module_code = o.module_code
    LEFT JOIN lecturers l ON l.id = o.lecturer_id
    LEFT JOIN rooms r ON r.id = e.room_id
";

#[utoipa::path(
    get,
    path = "/api/schedule",
    tag = "schedule",
    params(ScheduleParams),
    responses((status = 200, body = Vec<ScheduleEntryView>)),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn list_schedule(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ScheduleParams>,
) -> ApiResult<Json<Vec<ScheduleEntryView>>> {
    authorize(
        &auth.principal(),
        Action::Read,
        &Resource::ProgramOwned { program_id: None },
        &ProgramDomain::empty(),
    )?;

    let entries = sqlx::query_as::<_, ScheduleEntryView>(&format!(
        r"{VIEW_SELECT}
        WHERE e.semester = $1
        ORDER BY array_position(
            ARRAY['Monday', 'Tuesday', 'Wednesday', 'Thursday', 'Friday', 'Saturday', 'Sunday'],
            e.day_of_week
        ), e.start_time"
    ))
    .bind(params.semester.trim())
    .fetch_all(&state.db)
    .await?;

    Ok(Json(entries))
}

/// Put an offered module on the calendar.
#[utoipa::path(
    post,
    path = "/api/schedule",
    tag = "schedule",
    request_body = CreateScheduleEntryRequest,
    responses(
        (status = 200, body = ScheduleEntryView),
        (status = 400, description = "Invalid weekday or time slot"),
        (status = 404, description = "Offered module not found"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn create_schedule_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateScheduleEntryRequest>,
) -> ApiResult<Json<ScheduleEntryView>> {
    body.validate()?;
    let weekday = body.check_slot().map_err(ApiError::Validation)?;

    let principal = auth.principal();
    let mut tx = state.db.begin().await?;

    let program_id = offering_program(&mut *tx, body.offered_module_id)
        .await?
        .ok_or(ApiError::NotFound("Offered module"))?;
    let domain = load_program_domain(&mut *tx, &principal).await?;
    authorize(
        &principal,
        Action::Create,
        &Resource::ProgramOwned { program_id },
        &domain,
    )?;

    let id = Uuid::now_v7();
    sqlx::query(
        r"
        INSERT INTO schedule_entries
            (id, offered_module_id, room_id, day_of_week, start_time, end_time, semester)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ",
    )
    .bind(id)
    .bind(body.offered_module_id)
    .bind(body.room_id)
    .bind(weekday)
    .bind(body.start_time.trim())
    .bind(body.end_time.trim())
    .bind(body.semester.trim())
    .execute(&mut *tx)
    .await?;

    let entry = sqlx::query_as::<_, ScheduleEntryView>(&format!("{VIEW_SELECT} WHERE e.id = $1"))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
    tx.commit().await?;

    Ok(Json(entry))
}

#[utoipa::path(
    delete,
    path = "/api/schedule/{id}",
    tag = "schedule",
    params(("id" = Uuid, Path, description = "Calendar entry ID")),
    responses(
        (status = 204, description = "Entry deleted"),
        (status = 404, description = "Entry not found"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn delete_schedule_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let principal = auth.principal();
    let mut tx = state.db.begin().await?;

    let owner: Option<(Option<Uuid>,)> = sqlx::query_as(
        r"
        SELECT m.program_id
        FROM schedule_entries e
        LEFT JOIN offered_modules o ON o.id = e.offered_module_id
        LEFT JOIN modules m ON m.module_code = o.module_code
        WHERE e.id = $1
        ",
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?;

    let (program_id,) = owner.ok_or(ApiError::NotFound("Calendar entry"))?;
    let domain = load_program_domain(&mut *tx, &principal).await?;
    authorize(
        &principal,
        Action::Delete,
        &Resource::ProgramOwned { program_id },
        &domain,
    )?;

    sqlx::query("DELETE FROM schedule_entries WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}
