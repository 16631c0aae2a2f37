// src/handlers/dashboard.rs
//
// Agregados do painel. As respostas levam Cache-Control curto: os números
// podem atrasar um minuto sem prejuízo para a gestão.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::CurrentUser,
    models::dashboard::{DashboardSummary, DeliveriesByRegion, PendenciesByUnit},
};

const CACHE_CONTROL_VALUE: &str = "private, max-age=60";

// GET /api/dashboard/summary
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    tag = "Dashboard",
    responses((status = 200, description = "Contadores do painel", body = DashboardSummary)),
    security(("api_jwt" = []))
)]
pub async fn summary(
    State(app_state): State<AppState>,
    _user: CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let summary = app_state.dashboard_service.summary().await?;
    Ok((
        StatusCode::OK,
        [(header::CACHE_CONTROL, CACHE_CONTROL_VALUE)],
        Json(summary),
    ))
}

// GET /api/dashboard/deliveries-by-region
#[utoipa::path(
    get,
    path = "/api/dashboard/deliveries-by-region",
    tag = "Dashboard",
    responses((status = 200, description = "Entregas agrupadas por regional", body = Vec<DeliveriesByRegion>)),
    security(("api_jwt" = []))
)]
pub async fn deliveries_by_region(
    State(app_state): State<AppState>,
    _user: CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let rows = app_state.dashboard_service.deliveries_by_region().await?;
    Ok((
        StatusCode::OK,
        [(header::CACHE_CONTROL, CACHE_CONTROL_VALUE)],
        Json(rows),
    ))
}

// GET /api/dashboard/pendencies-by-unit
#[utoipa::path(
    get,
    path = "/api/dashboard/pendencies-by-unit",
    tag = "Dashboard",
    responses((status = 200, description = "Pendências abertas por unidade", body = Vec<PendenciesByUnit>)),
    security(("api_jwt" = []))
)]
pub async fn pendencies_by_unit(
    State(app_state): State<AppState>,
    _user: CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let rows = app_state.dashboard_service.pendencies_by_unit().await?;
    Ok((
        StatusCode::OK,
        [(header::CACHE_CONTROL, CACHE_CONTROL_VALUE)],
        Json(rows),
    ))
}
