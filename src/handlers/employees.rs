// src/handlers/employees.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    common::{error::AppError, text::normalize_key},
    config::AppState,
    middleware::auth::CurrentUser,
    models::{employee::EmployeeWithRegion, kit::KitMappingRow},
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListEmployeesParams {
    /// Filtra pela regional resolvida.
    pub region_id: Option<Uuid>,
    /// Nome da unidade (aceita grafia livre; é normalizado antes do filtro).
    pub unit: Option<String>,
    pub job_function: Option<String>,
    /// true = sem data de demissão.
    pub active: Option<bool>,
}

// GET /api/employees
#[utoipa::path(
    get,
    path = "/api/employees",
    tag = "Employees",
    params(ListEmployeesParams),
    responses(
        (status = 200, description = "Colaboradores anotados com a regional", body = Vec<EmployeeWithRegion>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list(
    State(app_state): State<AppState>,
    _user: CurrentUser,
    Query(params): Query<ListEmployeesParams>,
) -> Result<impl IntoResponse, AppError> {
    let unit_key = params.unit.as_deref().map(normalize_key);
    let job_function = params.job_function.map(|f| format!("%{f}%"));

    let employees = app_state
        .employee_repo
        .list(params.region_id, unit_key, job_function, params.active)
        .await?;

    Ok((StatusCode::OK, Json(employees)))
}

// GET /api/employees/{id}
#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    tag = "Employees",
    params(("id" = Uuid, Path, description = "ID do colaborador")),
    responses(
        (status = 200, description = "Colaborador", body = EmployeeWithRegion),
        (status = 404, description = "Colaborador não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_by_id(
    State(app_state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let employee = app_state
        .employee_repo
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Colaborador"))?;
    Ok((StatusCode::OK, Json(employee)))
}

// GET /api/employees/{id}/kit
//
// O kit devido ao colaborador = mapeamento da função dele.
#[utoipa::path(
    get,
    path = "/api/employees/{id}/kit",
    tag = "Employees",
    params(("id" = Uuid, Path, description = "ID do colaborador")),
    responses(
        (status = 200, description = "Itens de EPI devidos à função do colaborador", body = Vec<KitMappingRow>),
        (status = 404, description = "Colaborador não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_kit(
    State(app_state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let employee = app_state
        .employee_repo
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Colaborador"))?;

    let kit = app_state
        .kit_repo
        .mappings_for_function(&employee.job_function)
        .await?;

    Ok((StatusCode::OK, Json(kit)))
}
