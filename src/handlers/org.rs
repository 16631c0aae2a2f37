// src/handlers/org.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, text::normalize_key},
    config::AppState,
    middleware::{
        auth::CurrentUser,
        rbac::{PermOrgWrite, RequirePermission},
    },
    models::org::{Region, Unit, UnitWithRegion},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRegionPayload {
    #[validate(length(min = 2, max = 120, message = "Nome da regional deve ter entre 2 e 120 caracteres"))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUnitPayload {
    pub region_id: Uuid,
    #[validate(length(min = 2, max = 200, message = "Nome da unidade deve ter entre 2 e 200 caracteres"))]
    pub name: String,
}

// GET /api/regions
#[utoipa::path(
    get,
    path = "/api/regions",
    tag = "Org",
    responses((status = 200, description = "Regionais cadastradas", body = Vec<Region>)),
    security(("api_jwt" = []))
)]
pub async fn list_regions(
    State(app_state): State<AppState>,
    _user: CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let regions = app_state.org_repo.list_regions().await?;
    Ok((StatusCode::OK, Json(regions)))
}

// POST /api/regions
#[utoipa::path(
    post,
    path = "/api/regions",
    tag = "Org",
    request_body = CreateRegionPayload,
    responses(
        (status = 201, description = "Regional criada", body = Region),
        (status = 409, description = "Nome já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_region(
    State(app_state): State<AppState>,
    user: CurrentUser,
    _guard: RequirePermission<PermOrgWrite>,
    Json(payload): Json<CreateRegionPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let mut tx = app_state.db_pool.begin().await?;
    let region = app_state
        .org_repo
        .create_region(&mut *tx, payload.name.trim())
        .await?;
    app_state
        .audit_repo
        .record(
            &mut *tx,
            &user.0,
            "region.create",
            "region",
            &region.id.to_string(),
            serde_json::json!({ "name": region.name }),
        )
        .await?;
    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(region)))
}

// GET /api/units
#[utoipa::path(
    get,
    path = "/api/units",
    tag = "Org",
    responses((status = 200, description = "Unidades com a regional", body = Vec<UnitWithRegion>)),
    security(("api_jwt" = []))
)]
pub async fn list_units(
    State(app_state): State<AppState>,
    _user: CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let units = app_state.org_repo.list_units().await?;
    Ok((StatusCode::OK, Json(units)))
}

// POST /api/units
//
// A chave normalizada (name_key) é derivada aqui, nunca informada pelo
// cliente: é ela que o resolvedor de regionais consulta.
#[utoipa::path(
    post,
    path = "/api/units",
    tag = "Org",
    request_body = CreateUnitPayload,
    responses(
        (status = 201, description = "Unidade criada", body = Unit),
        (status = 404, description = "Regional não encontrada"),
        (status = 409, description = "Unidade já cadastrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_unit(
    State(app_state): State<AppState>,
    user: CurrentUser,
    _guard: RequirePermission<PermOrgWrite>,
    Json(payload): Json<CreateUnitPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let name = payload.name.trim();
    let name_key = normalize_key(name);

    let mut tx = app_state.db_pool.begin().await?;
    let unit = app_state
        .org_repo
        .create_unit(&mut *tx, payload.region_id, name, &name_key)
        .await?;
    app_state
        .audit_repo
        .record(
            &mut *tx,
            &user.0,
            "unit.create",
            "unit",
            &unit.id.to_string(),
            serde_json::json!({ "name": unit.name, "regionId": unit.region_id }),
        )
        .await?;
    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(unit)))
}
