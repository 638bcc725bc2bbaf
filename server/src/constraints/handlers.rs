//! Constraint Handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;
use validator::Validate;

use super::types::{
    ConstraintType, CreateConstraintRequest, SchedulerConstraint, UpdateConstraintRequest,
    CONSTRAINT_COLUMNS,
};
use crate::api::AppState;
use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::permissions::{
    authorize, authorize_update, filter_readable, load_program_domain, Action, ProgramDomain,
    Resource,
};

#[utoipa::path(
    get,
    path = "/api/constraint-types",
    tag = "constraints",
    responses((status = 200, body = Vec<ConstraintType>)),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn list_constraint_types(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<ConstraintType>>> {
    authorize(
        &auth.principal(),
        Action::Read,
        &Resource::Catalog,
        &ProgramDomain::empty(),
    )?;

    let types = sqlx::query_as::<_, ConstraintType>(
        "SELECT id, name FROM constraint_types ORDER BY name",
    )
    .fetch_all(&state.db)
    .await?;

    Ok(Json(types))
}

#[utoipa::path(
    get,
    path = "/api/scheduler-constraints",
    tag = "constraints",
    responses((status = 200, body = Vec<SchedulerConstraint>)),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn list_constraints(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<SchedulerConstraint>>> {
    let principal = auth.principal();
    let rows = sqlx::query_as::<_, SchedulerConstraint>(&format!(
        "SELECT {CONSTRAINT_COLUMNS} FROM scheduler_constraints ORDER BY scope, id"
    ))
    .fetch_all(&state.db)
    .await?;

    let visible = filter_readable(
        &principal,
        rows,
        &ProgramDomain::empty(),
        SchedulerConstraint::resource,
    )?;
    Ok(Json(visible))
}

/// Create a constraint. A `HoSP` may only target one of their programs.
#[utoipa::path(
    post,
    path = "/api/scheduler-constraints",
    tag = "constraints",
    request_body = CreateConstraintRequest,
    responses(
        (status = 200, body = SchedulerConstraint),
        (status = 400, description = "Unknown constraint type"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn create_constraint(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateConstraintRequest>,
) -> ApiResult<Json<SchedulerConstraint>> {
    let principal = auth.principal();
    let domain = load_program_domain(&state.db, &principal).await?;
    authorize(&principal, Action::Create, &body.resource(), &domain)?;
    body.validate()?;

    let constraint = sqlx::query_as::<_, SchedulerConstraint>(&format!(
        r"
        INSERT INTO scheduler_constraints
            (id, constraint_type_id, hardness, weight, scope, target_id, config, is_enabled, notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING {CONSTRAINT_COLUMNS}
        "
    ))
    .bind(Uuid::now_v7())
    .bind(body.constraint_type_id)
    .bind(body.hardness)
    .bind(body.weight)
    .bind(body.scope)
    .bind(body.target_id)
    .bind(&body.config)
    .bind(body.is_enabled)
    .bind(&body.notes)
    .fetch_one(&state.db)
    .await?;

    tracing::info!(
        constraint_id = %constraint.id,
        scope = constraint.scope.as_str(),
        "Scheduler constraint created"
    );
    Ok(Json(constraint))
}

#[utoipa::path(
    put,
    path = "/api/scheduler-constraints/{id}",
    tag = "constraints",
    params(("id" = Uuid, Path, description = "Constraint ID")),
    request_body = UpdateConstraintRequest,
    responses(
        (status = 200, body = SchedulerConstraint),
        (status = 404, description = "Constraint not found"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn update_constraint(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateConstraintRequest>,
) -> ApiResult<Json<SchedulerConstraint>> {
    let principal = auth.principal();
    let mut tx = state.db.begin().await?;

    let mut constraint = sqlx::query_as::<_, SchedulerConstraint>(&format!(
        "SELECT {CONSTRAINT_COLUMNS} FROM scheduler_constraints WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(ApiError::NotFound("Constraint"))?;

    let domain = load_program_domain(&mut *tx, &principal).await?;
    let before = constraint.resource();
    authorize(&principal, Action::Update, &before, &domain)?;
    body.validate()?;

    body.apply_to(&mut constraint);
    authorize_update(&principal, &before, &constraint.resource(), &domain)?;

    let saved = sqlx::query_as::<_, SchedulerConstraint>(&format!(
        r"
        UPDATE scheduler_constraints
        SET constraint_type_id = $2, hardness = $3, weight = $4, scope = $5, target_id = $6,
            config = $7, is_enabled = $8, notes = $9
        WHERE id = $1
        RETURNING {CONSTRAINT_COLUMNS}
        "
    ))
    .bind(constraint.id)
    .bind(constraint.constraint_type_id)
    .bind(constraint.hardness)
    .bind(constraint.weight)
    .bind(constraint.scope)
    .bind(constraint.target_id)
    .bind(&constraint.config)
    .bind(constraint.is_enabled)
    .bind(&constraint.notes)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(Json(saved))
}

/// Delete a constraint. Deleting a missing constraint succeeds.
#[utoipa::path(
    delete,
    path = "/api/scheduler-constraints/{id}",
    tag = "constraints",
    params(("id" = Uuid, Path, description = "Constraint ID")),
    responses((status = 204, description = "Constraint deleted")),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn delete_constraint(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let principal = auth.principal();
    let mut tx = state.db.begin().await?;

    let Some(constraint) = sqlx::query_as::<_, SchedulerConstraint>(&format!(
        "SELECT {CONSTRAINT_COLUMNS} FROM scheduler_constraints WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    else {
        return Ok(StatusCode::NO_CONTENT);
    };

    let domain = load_program_domain(&mut *tx, &principal).await?;
    authorize(&principal, Action::Delete, &constraint.resource(), &domain)?;

    sqlx::query("DELETE FROM scheduler_constraints WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}
