// src/models/dashboard.rs

use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub active_employees: i64,
    pub terminated_employees: i64,
    pub deliveries_this_month: i64,
    pub open_pendencies: i64,
    pub low_stock_items: i64,
    /// Unidades distintas vistas nos extratos importados.
    pub distinct_units_seen: i64,
    /// Das vistas, quantas resolvem para uma regional cadastrada.
    pub resolved_units: i64,
    /// E quantas ainda ficam sem regional (vistas - resolvidas).
    pub unresolved_units: i64,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeliveriesByRegion {
    pub region_name: Option<String>,
    pub total: i64,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PendenciesByUnit {
    pub unit_name: String,
    pub total: i64,
}
