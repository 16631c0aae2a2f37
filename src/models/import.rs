// src/models/import.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Metadados de um lote importado. Lotes são imutáveis depois de gravados.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportBatch {
    pub id: Uuid,
    pub source_file: String,
    pub row_count: i32,
    pub created_at: DateTime<Utc>,
}

/// Campos fixos extraídos de uma linha bruta do extrato, pelos apelidos
/// conhecidos de cabeçalho. Só o CPF é obrigatório para o upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedEmployee {
    pub cpf: String,
    pub employee_number: String,
    pub name: String,
    pub job_function: String,
    pub unit_name: String,
    pub admission_date: Option<NaiveDate>,
    pub termination_date: Option<NaiveDate>,
}

// Resumo devolvido ao operador após o upload.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub batch_id: Uuid,
    pub source_file: String,
    /// Linhas brutas gravadas na camada opaca (staging).
    pub raw_rows: usize,
    /// Colaboradores efetivamente atualizados/inseridos.
    pub upserted: usize,
    /// Linhas sem CPF aproveitável, mantidas só no staging.
    pub skipped_missing_cpf: usize,
    /// Nomes de unidade do extrato que não casaram com nenhuma unidade
    /// cadastrada (ficam sem regional até alguém cadastrá-las).
    pub unmatched_units: Vec<String>,
}
