//! Offered Module Handlers

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;
use validator::Validate;

use super::queries::{find_offering_view, list_offering_views, offering_program};
use super::types::{CreateOfferingRequest, OfferedModuleView, OfferingParams};
use crate::api::AppState;
use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::modules::queries::find_module;
use crate::permissions::{authorize, load_program_domain, Action, ProgramDomain, Resource};

#[utoipa::path(
    get,
    path = "/api/offered-modules",
    tag = "offered-modules",
    params(OfferingParams),
    responses((status = 200, body = Vec<OfferedModuleView>)),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn list_offerings(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<OfferingParams>,
) -> ApiResult<Json<Vec<OfferedModuleView>>> {
    authorize(
        &auth.principal(),
        Action::Read,
        &Resource::ProgramOwned { program_id: None },
        &ProgramDomain::empty(),
    )?;

    let semester = params.semester.as_deref().filter(|s| !s.is_empty());
    Ok(Json(list_offering_views(&state.db, semester).await?))
}

/// Offer a module in a semester. A module is offered at most once per semester.
#[utoipa::path(
    post,
    path = "/api/offered-modules",
    tag = "offered-modules",
    request_body = CreateOfferingRequest,
    responses(
        (status = 200, body = OfferedModuleView),
        (status = 404, description = "Module not found"),
        (status = 409, description = "Module already offered in this semester"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn create_offering(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateOfferingRequest>,
) -> ApiResult<Json<OfferedModuleView>> {
    body.validate()?;
    let principal = auth.principal();
    let mut tx = state.db.begin().await?;

    let module = find_module(&mut *tx, body.module_code.trim())
        .await?
        .ok_or(ApiError::NotFound("Module"))?;
    let domain = load_program_domain(&mut *tx, &principal).await?;
    authorize(&principal, Action::Create, &module.resource(), &domain)?;

    let id = Uuid::now_v7();
    sqlx::query(
        r"
        INSERT INTO offered_modules (id, module_code, lecturer_id, semester, status)
        VALUES ($1, $2, $3, $4, $5)
        ",
    )
    .bind(id)
    .bind(&module.module_code)
    .bind(body.lecturer_id)
    .bind(body.semester.trim())
    .bind(&body.status)
    .execute(&mut *tx)
    .await
    .map_err(|err| match ApiError::from(err) {
        ApiError::Conflict(_) => ApiError::Conflict(format!(
            "Module {} is already offered in {}",
            module.module_code,
            body.semester.trim()
        )),
        other => other,
    })?;

    let view = find_offering_view(&mut *tx, id)
        .await?
        .ok_or_else(|| ApiError::Internal("Offering vanished after insert".to_string()))?;
    tx.commit().await?;

    tracing::info!(offering_id = %id, module_code = %view.module_code, "Module offered");
    Ok(Json(view))
}

/// Withdraw an offering together with its calendar entries.
#[utoipa::path(
    delete,
    path = "/api/offered-modules/{id}",
    tag = "offered-modules",
    params(("id" = Uuid, Path, description = "Offered module ID")),
    responses(
        (status = 204, description = "Offering deleted"),
        (status = 404, description = "Offering not found"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn delete_offering(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let principal = auth.principal();
    let mut tx = state.db.begin().await?;

    let program_id = offering_program(&mut *tx, id)
        .await?
        .ok_or(ApiError::NotFound("Offered module"))?;
    let domain = load_program_domain(&mut *tx, &principal).await?;
    authorize(
        &principal,
        Action::Delete,
        &Resource::ProgramOwned { program_id },
        &domain,
    )?;

    sqlx::query("DELETE FROM offered_modules WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}
