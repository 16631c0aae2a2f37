// src/handlers/kits.rs

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::CurrentUser,
        rbac::{PermKitWrite, RequirePermission},
    },
    models::kit::{KitMapping, KitMappingRow, PpeItem},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemPayload {
    #[validate(length(min = 2, max = 200, message = "Nome do item deve ter entre 2 e 200 caracteres"))]
    pub name: String,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertMappingPayload {
    #[validate(length(min = 1, max = 200, message = "Função é obrigatória"))]
    pub job_function: String,
    pub item_id: Uuid,
    #[validate(range(min = 1, message = "Quantidade deve ser pelo menos 1"))]
    pub quantity: i32,
}

// GET /api/items
#[utoipa::path(
    get,
    path = "/api/items",
    tag = "Kits",
    responses((status = 200, description = "Catálogo de EPIs", body = Vec<PpeItem>)),
    security(("api_jwt" = []))
)]
pub async fn list_items(
    State(app_state): State<AppState>,
    _user: CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let items = app_state.kit_repo.list_items().await?;
    Ok((StatusCode::OK, Json(items)))
}

// POST /api/items
#[utoipa::path(
    post,
    path = "/api/items",
    tag = "Kits",
    request_body = CreateItemPayload,
    responses(
        (status = 201, description = "Item criado", body = PpeItem),
        (status = 409, description = "Nome já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_item(
    State(app_state): State<AppState>,
    user: CurrentUser,
    _guard: RequirePermission<PermKitWrite>,
    Json(payload): Json<CreateItemPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let mut tx = app_state.db_pool.begin().await?;
    let item = app_state
        .kit_repo
        .create_item(&mut *tx, payload.name.trim(), payload.category.as_deref())
        .await?;
    app_state
        .audit_repo
        .record(
            &mut *tx,
            &user.0,
            "item.create",
            "ppe_item",
            &item.id.to_string(),
            serde_json::json!({ "name": item.name }),
        )
        .await?;
    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(item)))
}

// GET /api/kits
#[utoipa::path(
    get,
    path = "/api/kits",
    tag = "Kits",
    responses((status = 200, description = "Mapeamento função -> itens", body = Vec<KitMappingRow>)),
    security(("api_jwt" = []))
)]
pub async fn list_mappings(
    State(app_state): State<AppState>,
    _user: CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let mappings = app_state.kit_repo.list_mappings().await?;
    Ok((StatusCode::OK, Json(mappings)))
}

// POST /api/kits
#[utoipa::path(
    post,
    path = "/api/kits",
    tag = "Kits",
    request_body = UpsertMappingPayload,
    responses(
        (status = 201, description = "Mapeamento criado ou atualizado", body = KitMapping),
        (status = 404, description = "Item não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn upsert_mapping(
    State(app_state): State<AppState>,
    user: CurrentUser,
    _guard: RequirePermission<PermKitWrite>,
    Json(payload): Json<UpsertMappingPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let mut tx = app_state.db_pool.begin().await?;
    let mapping = app_state
        .kit_repo
        .upsert_mapping(
            &mut *tx,
            payload.job_function.trim(),
            payload.item_id,
            payload.quantity,
        )
        .await?;
    app_state
        .audit_repo
        .record(
            &mut *tx,
            &user.0,
            "kits.upsert",
            "kit_mapping",
            &mapping.id.to_string(),
            serde_json::json!({
                "jobFunction": mapping.job_function,
                "itemId": mapping.item_id,
                "quantity": mapping.quantity,
            }),
        )
        .await?;
    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(mapping)))
}

// DELETE /api/kits/{id}
#[utoipa::path(
    delete,
    path = "/api/kits/{id}",
    tag = "Kits",
    params(("id" = Uuid, Path, description = "ID do mapeamento")),
    responses(
        (status = 204, description = "Mapeamento removido"),
        (status = 404, description = "Mapeamento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_mapping(
    State(app_state): State<AppState>,
    user: CurrentUser,
    _guard: RequirePermission<PermKitWrite>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let mut tx = app_state.db_pool.begin().await?;
    app_state.kit_repo.delete_mapping(&mut *tx, id).await?;
    app_state
        .audit_repo
        .record(
            &mut *tx,
            &user.0,
            "kits.delete",
            "kit_mapping",
            &id.to_string(),
            serde_json::json!({}),
        )
        .await?;
    tx.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/kits/export
//
// Download do mapeamento completo em CSV (funcao,item,quantidade).
#[utoipa::path(
    get,
    path = "/api/kits/export",
    tag = "Kits",
    responses(
        (status = 200, description = "CSV do mapeamento de kits", content_type = "text/csv")
    ),
    security(("api_jwt" = []))
)]
pub async fn export_csv(
    State(app_state): State<AppState>,
    _user: CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let csv = app_state.kit_service.export_csv().await?;
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"kits.csv\"",
            ),
        ],
        csv,
    ))
}

// POST /api/kits/import
#[utoipa::path(
    post,
    path = "/api/kits/import",
    tag = "Kits",
    responses(
        (status = 200, description = "Mapeamento reimportado"),
        (status = 422, description = "CSV vazio ou com linhas inválidas")
    ),
    security(("api_jwt" = []))
)]
pub async fn import_csv(
    State(app_state): State<AppState>,
    user: CurrentUser,
    _guard: RequirePermission<PermKitWrite>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut file_bytes: Option<Vec<u8>> = None;
    let mut file_name = "kits.csv".to_string();

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

    let rows = app_state
        .kit_service
        .import_csv(&app_state.db_pool, &user.0, &file_name, &bytes)
        .await?;

    Ok((StatusCode::OK, Json(serde_json::json!({ "rows": rows }))))
}
