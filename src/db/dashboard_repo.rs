// src/db/dashboard_repo.rs

use sqlx::{Acquire, Executor, Postgres};

use crate::{
    common::error::AppError,
    models::dashboard::{DashboardSummary, DeliveriesByRegion, PendenciesByUnit},
};

/// Unidades ainda sem regional = vistas no extrato menos as resolvidas.
pub fn unresolved_count(seen: i64, resolved: i64) -> i64 {
    (seen - resolved).max(0)
}

#[derive(Clone, Default)]
pub struct DashboardRepository;

impl DashboardRepository {
    pub fn new() -> Self {
        Self
    }

    // Resumo geral. Transação para um snapshot consistente das contagens.
    pub async fn summary<'e, E>(&self, executor: E) -> Result<DashboardSummary, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let active_employees = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM employees WHERE termination_date IS NULL",
        )
        .fetch_one(&mut *tx)
        .await?;

        let terminated_employees = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM employees WHERE termination_date IS NOT NULL",
        )
        .fetch_one(&mut *tx)
        .await?;

        let deliveries_this_month = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM deliveries
            WHERE date_trunc('month', delivered_at) = date_trunc('month', CURRENT_DATE)
            "#,
        )
        .fetch_one(&mut *tx)
        .await?;

        let open_pendencies = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM pendencies WHERE status = 'OPEN'",
        )
        .fetch_one(&mut *tx)
        .await?;

        let low_stock_items = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM inventory_balances WHERE quantity < min_quantity",
        )
        .fetch_one(&mut *tx)
        .await?;

        // Qualidade de dados: unidades distintas vistas nos extratos vs.
        // quantas delas resolvem para uma regional cadastrada.
        let distinct_units_seen = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(DISTINCT unit_key) FROM employees WHERE unit_key <> ''",
        )
        .fetch_one(&mut *tx)
        .await?;

        let resolved_units = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(DISTINCT e.unit_key)
            FROM employees e
            JOIN units u ON u.name_key = e.unit_key
            WHERE e.unit_key <> ''
            "#,
        )
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(DashboardSummary {
            active_employees,
            terminated_employees,
            deliveries_this_month,
            open_pendencies,
            low_stock_items,
            distinct_units_seen,
            resolved_units,
            unresolved_units: unresolved_count(distinct_units_seen, resolved_units),
        })
    }

    pub async fn deliveries_by_region<'e, E>(
        &self,
        executor: E,
    ) -> Result<Vec<DeliveriesByRegion>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let data = sqlx::query_as::<_, DeliveriesByRegion>(
            r#"
            SELECT r.name AS region_name, COUNT(*) AS total
            FROM deliveries d
            JOIN employees e ON e.id = d.employee_id
            LEFT JOIN units u ON u.name_key = e.unit_key
            LEFT JOIN regions r ON r.id = u.region_id
            GROUP BY r.name
            ORDER BY total DESC
            "#,
        )
        .fetch_all(executor)
        .await?;
        Ok(data)
    }

    pub async fn pendencies_by_unit<'e, E>(
        &self,
        executor: E,
    ) -> Result<Vec<PendenciesByUnit>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let data = sqlx::query_as::<_, PendenciesByUnit>(
            r#"
            SELECT e.unit_name AS unit_name, COUNT(*) AS total
            FROM pendencies p
            JOIN deliveries d ON d.id = p.delivery_id
            JOIN employees e ON e.id = d.employee_id
            WHERE p.status = 'OPEN'
            GROUP BY e.unit_name
            ORDER BY total DESC
            LIMIT 10
            "#,
        )
        .fetch_all(executor)
        .await?;
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sem_regional_e_a_diferenca_entre_vistas_e_resolvidas() {
        assert_eq!(unresolved_count(5, 3), 2);
        assert_eq!(unresolved_count(4, 4), 0);
        assert_eq!(unresolved_count(0, 0), 0);
    }

    // O resumo expõe os três contadores de unidades lado a lado, para a
    // comparação vistas vs. resolvidas.
    #[test]
    fn resumo_expoe_vistas_resolvidas_e_sem_regional() {
        let summary = DashboardSummary {
            active_employees: 10,
            terminated_employees: 2,
            deliveries_this_month: 7,
            open_pendencies: 3,
            low_stock_items: 1,
            distinct_units_seen: 6,
            resolved_units: 4,
            unresolved_units: unresolved_count(6, 4),
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["distinctUnitsSeen"], 6);
        assert_eq!(json["resolvedUnits"], 4);
        assert_eq!(json["unresolvedUnits"], 2);
    }
}
