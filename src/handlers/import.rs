// src/handlers/import.rs

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::CurrentUser,
        rbac::{PermImportWrite, RequirePermission},
    },
    models::import::{ImportBatch, ImportSummary},
};

// POST /api/import/upload
//
// Recebe o extrato do Alterdata (CSV ou XLSX) via multipart e roda o
// pipeline completo: staging -> lote -> upsert normalizado.
#[utoipa::path(
    post,
    path = "/api/import/upload",
    tag = "Import",
    responses(
        (status = 201, description = "Lote importado com sucesso", body = ImportSummary),
        (status = 401, description = "Não autenticado"),
        (status = 403, description = "Sem permissão de importação"),
        (status = 422, description = "Planilha vazia ou ilegível")
    ),
    security(("api_jwt" = []))
)]
pub async fn upload(
    State(app_state): State<AppState>,
    user: CurrentUser,
    _guard: RequirePermission<PermImportWrite>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut file_bytes: Option<Vec<u8>> = None;
    let mut file_name = "extrato.csv".to_string();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| anyhow::anyhow!("upload multipart inválido: {e}"))?
    {
        if field.name() == Some("file") {
            if let Some(name) = field.file_name() {
                file_name = name.to_string();
            }
            let bytes = field
                .bytes()
                .await
                .map_err(|e| anyhow::anyhow!("falha ao ler o arquivo enviado: {e}"))?;
            file_bytes = Some(bytes.to_vec());
        }
    }

    let bytes = file_bytes
        .ok_or_else(|| AppError::InvalidSpreadsheet("nenhum arquivo no campo 'file'".to_string()))?;

    let summary = app_state
        .import_service
        .ingest(&app_state.db_pool, &user.0, &file_name, &bytes)
        .await?;

    Ok((StatusCode::CREATED, Json(summary)))
}

// GET /api/import/batches
#[utoipa::path(
    get,
    path = "/api/import/batches",
    tag = "Import",
    responses(
        (status = 200, description = "Histórico de lotes importados", body = Vec<ImportBatch>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_batches(
    State(app_state): State<AppState>,
    _user: CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let batches = app_state.import_repo.list_batches().await?;
    Ok((StatusCode::OK, Json(batches)))
}
