// src/handlers/deliveries.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::CurrentUser,
        rbac::{PermDeliveryWrite, RequirePermission},
    },
    models::delivery::{Delivery, DeliveryDetail, Pendency, PendencyStatus},
    services::delivery_service::DeliveryLine,
};

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryLinePayload {
    pub item_id: Uuid,
    #[validate(range(min = 1, message = "Quantidade pedida deve ser pelo menos 1"))]
    pub requested: i32,
    #[validate(range(min = 0, message = "Quantidade entregue não pode ser negativa"))]
    pub delivered: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeliveryPayload {
    pub employee_id: Uuid,
    pub unit_id: Option<Uuid>,
    /// Data da entrega (YYYY-MM-DD).
    pub delivered_at: NaiveDate,
    pub observation: Option<String>,
    #[validate(length(min = 1, message = "A entrega precisa de pelo menos um item"), nested)]
    pub items: Vec<DeliveryLinePayload>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClosePendencyPayload {
    #[validate(length(max = 500, message = "Resolução deve ter no máximo 500 caracteres"))]
    pub resolution: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListDeliveriesParams {
    pub employee_id: Option<Uuid>,
    pub unit_id: Option<Uuid>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListPendenciesParams {
    pub status: Option<PendencyStatus>,
    pub unit_id: Option<Uuid>,
}

// POST /api/deliveries
//
// Registra a entrega; toda linha com falta (pedido > entregue) abre uma
// pendência na mesma transação.
#[utoipa::path(
    post,
    path = "/api/deliveries",
    tag = "Deliveries",
    request_body = CreateDeliveryPayload,
    responses(
        (status = 201, description = "Entrega registrada", body = DeliveryDetail),
        (status = 400, description = "Entregue maior que o pedido"),
        (status = 404, description = "Colaborador ou item não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create(
    State(app_state): State<AppState>,
    user: CurrentUser,
    _guard: RequirePermission<PermDeliveryWrite>,
    Json(payload): Json<CreateDeliveryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let lines: Vec<DeliveryLine> = payload
        .items
        .iter()
        .map(|item| DeliveryLine {
            item_id: item.item_id,
            requested: item.requested,
            delivered: item.delivered,
        })
        .collect();

    let detail = app_state
        .delivery_service
        .create_delivery(
            &app_state.db_pool,
            &user.0,
            payload.employee_id,
            payload.unit_id,
            payload.delivered_at,
            payload.observation.as_deref(),
            &lines,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(detail)))
}

// GET /api/deliveries
#[utoipa::path(
    get,
    path = "/api/deliveries",
    tag = "Deliveries",
    params(ListDeliveriesParams),
    responses((status = 200, description = "Entregas filtradas", body = Vec<Delivery>)),
    security(("api_jwt" = []))
)]
pub async fn list(
    State(app_state): State<AppState>,
    _user: CurrentUser,
    Query(params): Query<ListDeliveriesParams>,
) -> Result<impl IntoResponse, AppError> {
    let deliveries = app_state
        .delivery_repo
        .list(params.employee_id, params.unit_id, params.from, params.to)
        .await?;
    Ok((StatusCode::OK, Json(deliveries)))
}

// GET /api/deliveries/{id}
#[utoipa::path(
    get,
    path = "/api/deliveries/{id}",
    tag = "Deliveries",
    params(("id" = Uuid, Path, description = "ID da entrega")),
    responses(
        (status = 200, description = "Entrega com itens e pendências", body = DeliveryDetail),
        (status = 404, description = "Entrega não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_by_id(
    State(app_state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let delivery = app_state
        .delivery_repo
        .find(id)
        .await?
        .ok_or(AppError::NotFound("Entrega"))?;
    let items = app_state.delivery_repo.items_for(id).await?;
    let pendencies = app_state.delivery_repo.pendencies_for(id).await?;

    Ok((
        StatusCode::OK,
        Json(DeliveryDetail {
            delivery,
            items,
            pendencies,
        }),
    ))
}

// GET /api/pendencies
#[utoipa::path(
    get,
    path = "/api/pendencies",
    tag = "Deliveries",
    params(ListPendenciesParams),
    responses((status = 200, description = "Pendências filtradas", body = Vec<Pendency>)),
    security(("api_jwt" = []))
)]
pub async fn list_pendencies(
    State(app_state): State<AppState>,
    _user: CurrentUser,
    Query(params): Query<ListPendenciesParams>,
) -> Result<impl IntoResponse, AppError> {
    let pendencies = app_state
        .delivery_repo
        .list_pendencies(params.status, params.unit_id)
        .await?;
    Ok((StatusCode::OK, Json(pendencies)))
}

// POST /api/pendencies/{id}/close
#[utoipa::path(
    post,
    path = "/api/pendencies/{id}/close",
    tag = "Deliveries",
    params(("id" = Uuid, Path, description = "ID da pendência")),
    request_body = ClosePendencyPayload,
    responses(
        (status = 200, description = "Pendência encerrada", body = Pendency),
        (status = 404, description = "Pendência não encontrada"),
        (status = 409, description = "Pendência já encerrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn close_pendency(
    State(app_state): State<AppState>,
    user: CurrentUser,
    _guard: RequirePermission<PermDeliveryWrite>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ClosePendencyPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let pendency = app_state
        .delivery_service
        .close_pendency(&app_state.db_pool, &user.0, id, payload.resolution.as_deref())
        .await?;

    Ok((StatusCode::OK, Json(pendency)))
}
