//! Module Handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;

use super::queries::{
    find_module, lock_module, replace_specializations, save_module, specializations_by_module,
};
use super::types::{
    CreateModuleRequest, ModuleResponse, ModuleRow, UpdateModuleRequest, MODULE_COLUMNS,
};
use crate::api::AppState;
use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::permissions::{
    authorize, authorize_update, load_program_domain, Action, ProgramDomain, Resource, Role,
};

/// List modules with their linked specializations.
#[utoipa::path(
    get,
    path = "/api/modules",
    tag = "modules",
    responses((status = 200, body = Vec<ModuleResponse>)),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn list_modules(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<ModuleResponse>>> {
    authorize(
        &auth.principal(),
        Action::Read,
        &Resource::ProgramOwned { program_id: None },
        &ProgramDomain::empty(),
    )?;

    let rows = sqlx::query_as::<_, ModuleRow>(&format!(
        "SELECT {MODULE_COLUMNS} FROM modules ORDER BY semester, module_code"
    ))
    .fetch_all(&state.db)
    .await?;

    let codes: Vec<String> = rows.iter().map(|m| m.module_code.clone()).collect();
    let mut linked = specializations_by_module(&state.db, &codes).await?;

    let response = rows
        .into_iter()
        .map(|row| {
            let specs = linked.remove(&row.module_code).unwrap_or_default();
            ModuleResponse::new(row, specs)
        })
        .collect();

    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/modules/{module_code}",
    tag = "modules",
    params(("module_code" = String, Path, description = "Module code")),
    responses(
        (status = 200, body = ModuleResponse),
        (status = 404, description = "Module not found"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn get_module(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(module_code): Path<String>,
) -> ApiResult<Json<ModuleResponse>> {
    let row = find_module(&state.db, &module_code)
        .await?
        .ok_or(ApiError::NotFound("Module"))?;
    authorize(
        &auth.principal(),
        Action::Read,
        &row.resource(),
        &ProgramDomain::empty(),
    )?;

    let mut linked = specializations_by_module(&state.db, &[row.module_code.clone()]).await?;
    let specs = linked.remove(&row.module_code).unwrap_or_default();
    Ok(Json(ModuleResponse::new(row, specs)))
}

/// Create a module. A `HoSP` must attach it to one of their programs.
#[utoipa::path(
    post,
    path = "/api/modules",
    tag = "modules",
    request_body = CreateModuleRequest,
    responses(
        (status = 200, body = ModuleResponse),
        (status = 400, description = "Invalid input or assessment breakdown"),
        (status = 409, description = "Module code already exists"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn create_module(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateModuleRequest>,
) -> ApiResult<Json<ModuleResponse>> {
    let principal = auth.principal();
    if principal.role == Role::Hosp && body.program_id.is_none() {
        return Err(ApiError::Validation("program_id is required".to_string()));
    }

    let mut tx = state.db.begin().await?;
    let domain = load_program_domain(&mut *tx, &principal).await?;
    authorize(
        &principal,
        Action::Create,
        &Resource::ProgramOwned {
            program_id: body.program_id,
        },
        &domain,
    )?;
    body.validate()?;
    let row = body.to_row()?;

    let created = sqlx::query_as::<_, ModuleRow>(&format!(
        r"
        INSERT INTO modules (module_code, name, ects, room_type, assessment_type, semester,
                             category, program_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
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
    .fetch_one(&mut *tx)
    .await
    .map_err(|err| match ApiError::from(err) {
        ApiError::Conflict(_) => {
            ApiError::Conflict(format!("Module {} already exists", row.module_code))
        }
        other => other,
    })?;

    replace_specializations(&mut tx, &created.module_code, &body.specialization_ids).await?;
    let mut linked = specializations_by_module(&mut *tx, &[created.module_code.clone()]).await?;
    tx.commit().await?;

    tracing::info!(module_code = %created.module_code, "Module created");
    let specs = linked.remove(&created.module_code).unwrap_or_default();
    Ok(Json(ModuleResponse::new(created, specs)))
}

#[utoipa::path(
    put,
    path = "/api/modules/{module_code}",
    tag = "modules",
    params(("module_code" = String, Path, description = "Module code")),
    request_body = UpdateModuleRequest,
    responses(
        (status = 200, body = ModuleResponse),
        (status = 404, description = "Module not found"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn update_module(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(module_code): Path<String>,
    Json(mut body): Json<UpdateModuleRequest>,
) -> ApiResult<Json<ModuleResponse>> {
    let principal = auth.principal();
    let mut tx = state.db.begin().await?;

    let mut row = lock_module(&mut tx, &module_code)
        .await?
        .ok_or(ApiError::NotFound("Module"))?;

    let domain = load_program_domain(&mut *tx, &principal).await?;
    let before = row.resource();
    authorize(&principal, Action::Update, &before, &domain)?;
    body.validate()?;

    let specialization_ids = body.specialization_ids.take();
    body.apply_to(&mut row)?;
    authorize_update(&principal, &before, &row.resource(), &domain)?;

    let saved = save_module(&mut tx, &row).await?;
    if let Some(ids) = specialization_ids {
        replace_specializations(&mut tx, &saved.module_code, &ids).await?;
    }
    let mut linked = specializations_by_module(&mut *tx, &[saved.module_code.clone()]).await?;
    tx.commit().await?;

    let specs = linked.remove(&saved.module_code).unwrap_or_default();
    Ok(Json(ModuleResponse::new(saved, specs)))
}

/// Delete a module and its offerings. Deleting a missing module succeeds.
#[utoipa::path(
    delete,
    path = "/api/modules/{module_code}",
    tag = "modules",
    params(("module_code" = String, Path, description = "Module code")),
    responses((status = 204, description = "Module deleted")),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn delete_module(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(module_code): Path<String>,
) -> ApiResult<StatusCode> {
    let principal = auth.principal();
    let mut tx = state.db.begin().await?;

    let Some(row) = lock_module(&mut tx, &module_code).await? else {
        return Ok(StatusCode::NO_CONTENT);
    };

    let domain = load_program_domain(&mut *tx, &principal).await?;
    authorize(&principal, Action::Delete, &row.resource(), &domain)?;

    sqlx::query("DELETE FROM modules WHERE module_code = $1")
        .bind(&row.module_code)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    tracing::info!(module_code = %row.module_code, "Module deleted");
    Ok(StatusCode::NO_CONTENT)
}
