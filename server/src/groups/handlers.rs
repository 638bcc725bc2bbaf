//! Group Handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;
use validator::Validate;

use super::types::{CreateGroupRequest, Group, UpdateGroupRequest, GROUP_COLUMNS};
use crate::api::AppState;
use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::permissions::{
    authorize, authorize_update, load_program_domain, Action, ProgramDomain, Resource,
};

#[utoipa::path(
    get,
    path = "/api/groups",
    tag = "groups",
    responses((status = 200, body = Vec<Group>)),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn list_groups(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<Group>>> {
    authorize(
        &auth.principal(),
        Action::Read,
        &Resource::Group { program: None },
        &ProgramDomain::empty(),
    )?;

    let groups = sqlx::query_as::<_, Group>(&format!(
        "SELECT {GROUP_COLUMNS} FROM groups ORDER BY name"
    ))
    .fetch_all(&state.db)
    .await?;

    Ok(Json(groups))
}

/// Create a group. A `HoSP` may only label it with one of their programs.
#[utoipa::path(
    post,
    path = "/api/groups",
    tag = "groups",
    request_body = CreateGroupRequest,
    responses((status = 200, body = Group)),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn create_group(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateGroupRequest>,
) -> ApiResult<Json<Group>> {
    let principal = auth.principal();
    let domain = load_program_domain(&state.db, &principal).await?;
    authorize(
        &principal,
        Action::Create,
        &Resource::Group {
            program: body.program.clone(),
        },
        &domain,
    )?;
    body.validate()?;

    let group = sqlx::query_as::<_, Group>(&format!(
        r"
        INSERT INTO groups (id, name, size, description, email, program, parent_group)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {GROUP_COLUMNS}
        "
    ))
    .bind(Uuid::now_v7())
    .bind(body.name.trim())
    .bind(body.size)
    .bind(&body.description)
    .bind(&body.email)
    .bind(&body.program)
    .bind(&body.parent_group)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(group))
}

#[utoipa::path(
    put,
    path = "/api/groups/{id}",
    tag = "groups",
    params(("id" = Uuid, Path, description = "Group ID")),
    request_body = UpdateGroupRequest,
    responses(
        (status = 200, body = Group),
        (status = 404, description = "Group not found"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn update_group(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateGroupRequest>,
) -> ApiResult<Json<Group>> {
    let principal = auth.principal();
    let mut tx = state.db.begin().await?;

    let mut group = sqlx::query_as::<_, Group>(&format!(
        "SELECT {GROUP_COLUMNS} FROM groups WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(ApiError::NotFound("Group"))?;

    let domain = load_program_domain(&mut *tx, &principal).await?;
    let before = group.resource();
    authorize(&principal, Action::Update, &before, &domain)?;
    body.validate()?;

    body.apply_to(&mut group);
    authorize_update(&principal, &before, &group.resource(), &domain)?;

    let saved = sqlx::query_as::<_, Group>(&format!(
        r"
        UPDATE groups
        SET name = $2, size = $3, description = $4, email = $5, program = $6,
            parent_group = $7
        WHERE id = $1
        RETURNING {GROUP_COLUMNS}
        "
    ))
    .bind(group.id)
    .bind(&group.name)
    .bind(group.size)
    .bind(&group.description)
    .bind(&group.email)
    .bind(&group.program)
    .bind(&group.parent_group)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(Json(saved))
}

/// Delete a group. Deleting a missing group succeeds.
#[utoipa::path(
    delete,
    path = "/api/groups/{id}",
    tag = "groups",
    params(("id" = Uuid, Path, description = "Group ID")),
    responses((status = 204, description = "Group deleted")),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn delete_group(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let principal = auth.principal();
    let mut tx = state.db.begin().await?;

    let label: Option<(Option<String>,)> =
        sqlx::query_as("SELECT program FROM groups WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

    let Some((program,)) = label else {
        return Ok(StatusCode::NO_CONTENT);
    };

    let domain = load_program_domain(&mut *tx, &principal).await?;
    authorize(&principal, Action::Delete, &Resource::Group { program }, &domain)?;

    sqlx::query("DELETE FROM groups WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}
