// src/handlers/audit.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::CurrentUser,
        rbac::{PermAuditRead, RequirePermission},
    },
    models::audit::AuditEntry,
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListAuditParams {
    /// Quantidade de registros (padrão 100, teto 500).
    pub limit: Option<i64>,
}

// GET /api/audit
#[utoipa::path(
    get,
    path = "/api/audit",
    tag = "Audit",
    params(ListAuditParams),
    responses(
        (status = 200, description = "Trilha de auditoria, mais recente primeiro", body = Vec<AuditEntry>),
        (status = 403, description = "Sem permissão de auditoria")
    ),
    security(("api_jwt" = []))
)]
pub async fn list(
    State(app_state): State<AppState>,
    _user: CurrentUser,
    _guard: RequirePermission<PermAuditRead>,
    Query(params): Query<ListAuditParams>,
) -> Result<impl IntoResponse, AppError> {
    let limit = params.limit.unwrap_or(100).clamp(1, 500);
    let entries = app_state.audit_repo.list(limit).await?;
    Ok((StatusCode::OK, Json(entries)))
}
