// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Cada variante vira um código de erro legível por máquina no corpo JSON.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Token inválido")]
    InvalidToken,

    #[error("Permissão '{0}' necessária")]
    MissingPermission(&'static str),

    #[error("{0} não encontrado")]
    NotFound(&'static str),

    #[error("Nome já cadastrado: {0}")]
    DuplicateName(String),

    #[error("Planilha vazia")]
    EmptySpreadsheet,

    #[error("Planilha inválida: {0}")]
    InvalidSpreadsheet(String),

    #[error("Quantidade entregue maior que a solicitada")]
    DeliveredExceedsRequested,

    #[error("Pendência já encerrada")]
    PendencyAlreadyClosed,

    #[error("Estoque insuficiente (saldo atual: {available})")]
    InsufficientStock { available: i32 },

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado.
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // Validação devolve todos os detalhes por campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "VALIDATION",
                    "message": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            AppError::InsufficientStock { available } => {
                let body = Json(json!({
                    "error": "INSUFFICIENT_STOCK",
                    "message": "Estoque insuficiente para a saída solicitada.",
                    "details": { "available": available },
                }));
                return (StatusCode::CONFLICT, body).into_response();
            }

            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                "Token de autenticação inválido ou ausente.".to_string(),
            ),
            AppError::JwtError(_) => (
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                "Token de autenticação inválido ou ausente.".to_string(),
            ),
            AppError::MissingPermission(slug) => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                format!("Você precisa da permissão '{}' para realizar esta ação.", slug),
            ),
            AppError::NotFound(entity) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{} não encontrado(a).", entity),
            ),
            AppError::DuplicateName(name) => (
                StatusCode::CONFLICT,
                "DUPLICATE_NAME",
                format!("Já existe um registro com o nome '{}'.", name),
            ),
            AppError::EmptySpreadsheet => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "EMPTY_SPREADSHEET",
                "A planilha enviada está vazia.".to_string(),
            ),
            AppError::InvalidSpreadsheet(reason) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INVALID_SPREADSHEET",
                format!("Não foi possível ler a planilha: {}.", reason),
            ),
            AppError::DeliveredExceedsRequested => (
                StatusCode::BAD_REQUEST,
                "DELIVERED_EXCEEDS_REQUESTED",
                "A quantidade entregue não pode exceder a solicitada.".to_string(),
            ),
            AppError::PendencyAlreadyClosed => (
                StatusCode::CONFLICT,
                "PENDENCY_ALREADY_CLOSED",
                "Esta pendência já foi encerrada.".to_string(),
            ),

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            e => {
                tracing::error!("Erro interno do servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": code, "message": message }));
        (status, body).into_response()
    }
}
