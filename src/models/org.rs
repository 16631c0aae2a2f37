// src/models/org.rs
//
// Hierarquia organizacional: uma regional agrupa várias unidades (hospitais,
// UPAs). A chave normalizada da unidade é o elo com o extrato do RH.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: Uuid,
    pub region_id: Uuid,
    pub name: String,
    // Chave de comparação (minúsculas, sem acento, sem pontuação),
    // calculada na criação e usada pelo resolvedor.
    pub name_key: String,
    pub created_at: DateTime<Utc>,
}

// Unidade anotada com o nome da regional (leitura).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnitWithRegion {
    pub id: Uuid,
    pub region_id: Uuid,
    pub name: String,
    pub name_key: String,
    pub region_name: String,
    pub created_at: DateTime<Utc>,
}
