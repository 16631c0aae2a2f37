// src/handlers/inventory.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::CurrentUser,
        rbac::{PermInventoryWrite, RequirePermission},
    },
    models::inventory::{BalanceRow, InventoryBalance, InventoryMovement, MovementKind},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovementPayload {
    pub unit_id: Uuid,
    pub item_id: Uuid,
    pub kind: MovementKind,
    #[validate(range(min = 1, message = "Quantidade deve ser pelo menos 1"))]
    pub quantity: i32,
    #[validate(length(max = 500, message = "Observação deve ter no máximo 500 caracteres"))]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetThresholdsPayload {
    #[validate(range(min = 0, message = "Mínimo não pode ser negativo"))]
    pub min_quantity: i32,
    #[validate(range(min = 0, message = "Máximo não pode ser negativo"))]
    pub max_quantity: Option<i32>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListBalancesParams {
    pub unit_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListMovementsParams {
    pub unit_id: Option<Uuid>,
    pub item_id: Option<Uuid>,
    pub kind: Option<MovementKind>,
}

// POST /api/inventory/movements
//
// Entrada soma, saída subtrai; saída maior que o saldo é recusada com 409.
#[utoipa::path(
    post,
    path = "/api/inventory/movements",
    tag = "Inventory",
    request_body = CreateMovementPayload,
    responses(
        (status = 201, description = "Movimento aplicado; retorna o saldo atualizado", body = InventoryBalance),
        (status = 409, description = "Saldo insuficiente para a saída")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_movement(
    State(app_state): State<AppState>,
    user: CurrentUser,
    _guard: RequirePermission<PermInventoryWrite>,
    Json(payload): Json<CreateMovementPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let balance = app_state
        .inventory_service
        .apply_movement(
            &app_state.db_pool,
            &user.0,
            payload.unit_id,
            payload.item_id,
            payload.kind,
            payload.quantity,
            payload.note.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(balance)))
}

// GET /api/inventory/movements
#[utoipa::path(
    get,
    path = "/api/inventory/movements",
    tag = "Inventory",
    params(ListMovementsParams),
    responses((status = 200, description = "Movimentos filtrados", body = Vec<InventoryMovement>)),
    security(("api_jwt" = []))
)]
pub async fn list_movements(
    State(app_state): State<AppState>,
    _user: CurrentUser,
    Query(params): Query<ListMovementsParams>,
) -> Result<impl IntoResponse, AppError> {
    let movements = app_state
        .inventory_repo
        .list_movements(params.unit_id, params.item_id, params.kind)
        .await?;
    Ok((StatusCode::OK, Json(movements)))
}

// GET /api/inventory/balances
#[utoipa::path(
    get,
    path = "/api/inventory/balances",
    tag = "Inventory",
    params(ListBalancesParams),
    responses((status = 200, description = "Saldos por unidade e item", body = Vec<BalanceRow>)),
    security(("api_jwt" = []))
)]
pub async fn list_balances(
    State(app_state): State<AppState>,
    _user: CurrentUser,
    Query(params): Query<ListBalancesParams>,
) -> Result<impl IntoResponse, AppError> {
    let balances = app_state.inventory_repo.list_balances(params.unit_id).await?;
    Ok((StatusCode::OK, Json(balances)))
}

// GET /api/inventory/low-stock
#[utoipa::path(
    get,
    path = "/api/inventory/low-stock",
    tag = "Inventory",
    responses((status = 200, description = "Saldos abaixo do mínimo configurado", body = Vec<BalanceRow>)),
    security(("api_jwt" = []))
)]
pub async fn low_stock(
    State(app_state): State<AppState>,
    _user: CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let balances = app_state.inventory_repo.low_stock().await?;
    Ok((StatusCode::OK, Json(balances)))
}

// PUT /api/inventory/balances/{unit_id}/{item_id}/thresholds
#[utoipa::path(
    put,
    path = "/api/inventory/balances/{unit_id}/{item_id}/thresholds",
    tag = "Inventory",
    params(
        ("unit_id" = Uuid, Path, description = "ID da unidade"),
        ("item_id" = Uuid, Path, description = "ID do item")
    ),
    request_body = SetThresholdsPayload,
    responses((status = 200, description = "Limites atualizados", body = InventoryBalance)),
    security(("api_jwt" = []))
)]
pub async fn set_thresholds(
    State(app_state): State<AppState>,
    user: CurrentUser,
    _guard: RequirePermission<PermInventoryWrite>,
    Path((unit_id, item_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<SetThresholdsPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let balance = app_state
        .inventory_service
        .set_thresholds(
            &app_state.db_pool,
            &user.0,
            unit_id,
            item_id,
            payload.min_quantity,
            payload.max_quantity,
        )
        .await?;

    Ok((StatusCode::OK, Json(balance)))
}
