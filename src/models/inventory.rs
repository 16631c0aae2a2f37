// src/models/inventory.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Tipo do movimento no livro-razão de estoque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "movement_kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementKind {
    Entrada, // Vira "ENTRADA"
    Saida,   // Vira "SAIDA"
}

// Saldo corrente de um item em uma unidade. Nunca fica negativo:
// a saída é validada contra o saldo antes de ser aplicada.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryBalance {
    pub id: Uuid,
    pub unit_id: Uuid,
    pub item_id: Uuid,
    pub quantity: i32,
    pub min_quantity: i32,
    pub max_quantity: Option<i32>,
    pub updated_at: DateTime<Utc>,
}

// Saldo anotado com nomes (listagens).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BalanceRow {
    pub unit_id: Uuid,
    pub unit_name: String,
    pub item_id: Uuid,
    pub item_name: String,
    pub quantity: i32,
    pub min_quantity: i32,
    pub max_quantity: Option<i32>,
    pub updated_at: DateTime<Utc>,
}

// Registro append-only do livro-razão.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryMovement {
    pub id: Uuid,
    pub unit_id: Uuid,
    pub item_id: Uuid,
    pub kind: MovementKind,
    pub quantity: i32,
    pub note: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}
