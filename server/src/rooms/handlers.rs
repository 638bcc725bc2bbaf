//! Room Handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;
use validator::Validate;

use super::types::{CreateRoomRequest, Room, UpdateRoomRequest, ROOM_COLUMNS};
use crate::api::AppState;
use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::permissions::{authorize, Action, ProgramDomain, Resource};

fn authorize_catalog(auth: &AuthUser, action: Action) -> ApiResult<()> {
    authorize(
        &auth.principal(),
        action,
        &Resource::Catalog,
        &ProgramDomain::empty(),
    )?;
    Ok(())
}

#[utoipa::path(
    get,
    path = "/api/rooms",
    tag = "rooms",
    responses((status = 200, body = Vec<Room>)),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn list_rooms(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<Vec<Room>>> {
    authorize_catalog(&auth, Action::Read)?;

    let rooms = sqlx::query_as::<_, Room>(&format!("SELECT {ROOM_COLUMNS} FROM rooms ORDER BY name"))
        .fetch_all(&state.db)
        .await?;

    Ok(Json(rooms))
}

#[utoipa::path(
    post,
    path = "/api/rooms",
    tag = "rooms",
    request_body = CreateRoomRequest,
    responses((status = 200, body = Room)),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn create_room(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateRoomRequest>,
) -> ApiResult<Json<Room>> {
    authorize_catalog(&auth, Action::Create)?;
    body.validate()?;

    let room = sqlx::query_as::<_, Room>(&format!(
        r"
        INSERT INTO rooms (id, name, capacity, type, status, equipment, location)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {ROOM_COLUMNS}
        "
    ))
    .bind(Uuid::now_v7())
    .bind(body.name.trim())
    .bind(body.capacity)
    .bind(&body.room_type)
    .bind(body.status)
    .bind(&body.equipment)
    .bind(&body.location)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(room))
}

#[utoipa::path(
    put,
    path = "/api/rooms/{id}",
    tag = "rooms",
    params(("id" = Uuid, Path, description = "Room ID")),
    request_body = UpdateRoomRequest,
    responses(
        (status = 200, body = Room),
        (status = 404, description = "Room not found"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn update_room(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateRoomRequest>,
) -> ApiResult<Json<Room>> {
    authorize_catalog(&auth, Action::Update)?;
    body.validate()?;

    let mut tx = state.db.begin().await?;
    let mut room = sqlx::query_as::<_, Room>(&format!(
        "SELECT {ROOM_COLUMNS} FROM rooms WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(ApiError::NotFound("Room"))?;

    body.apply_to(&mut room);

    let saved = sqlx::query_as::<_, Room>(&format!(
        r"
        UPDATE rooms
        SET name = $2, capacity = $3, type = $4, status = $5, equipment = $6, location = $7
        WHERE id = $1
        RETURNING {ROOM_COLUMNS}
        "
    ))
    .bind(room.id)
    .bind(&room.name)
    .bind(room.capacity)
    .bind(&room.room_type)
    .bind(room.status)
    .bind(&room.equipment)
    .bind(&room.location)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(Json(saved))
}

/// Delete a room. Calendar entries keep their slot without a room.
#[utoipa::path(
    delete,
    path = "/api/rooms/{id}",
    tag = "rooms",
    params(("id" = Uuid, Path, description = "Room ID")),
    responses((status = 204, description = "Room deleted")),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn delete_room(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    authorize_catalog(&auth, Action::Delete)?;

    sqlx::query("DELETE FROM rooms WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
