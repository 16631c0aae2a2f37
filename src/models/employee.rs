// src/models/employee.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Estado atual de um colaborador, reescrito a cada lote importado
// (último lote vence, campo a campo).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    pub cpf: String,
    pub employee_number: String,
    pub name: String,
    pub job_function: String,
    pub unit_name: String,
    pub unit_key: String,
    pub admission_date: Option<NaiveDate>,
    pub termination_date: Option<NaiveDate>,
    pub batch_id: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

// Colaborador anotado com a regional resolvida (null quando a unidade
// do extrato não casa com nenhuma unidade cadastrada).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeWithRegion {
    pub id: Uuid,
    pub cpf: String,
    pub employee_number: String,
    pub name: String,
    pub job_function: String,
    pub unit_name: String,
    pub admission_date: Option<NaiveDate>,
    pub termination_date: Option<NaiveDate>,
    pub region_name: Option<String>,
    pub updated_at: DateTime<Utc>,
}
