// src/models/delivery.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Delivery {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub unit_id: Option<Uuid>,
    pub delivered_at: NaiveDate,
    pub observation: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryItem {
    pub id: Uuid,
    pub delivery_id: Uuid,
    pub item_id: Uuid,
    pub requested: i32,
    pub delivered: i32,
}

// "ABERTA" enquanto houver EPI devido; "FECHADA" após regularização.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "pendency_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PendencyStatus {
    Open,   // Vira "OPEN"
    Closed, // Vira "CLOSED"
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pendency {
    pub id: Uuid,
    pub delivery_id: Uuid,
    pub item_id: Uuid,
    pub quantity: i32,
    pub status: PendencyStatus,
    pub resolution: Option<String>,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

// Entrega com seus itens e as pendências abertas na mesma transação.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryDetail {
    pub delivery: Delivery,
    pub items: Vec<DeliveryItem>,
    pub pendencies: Vec<Pendency>,
}
