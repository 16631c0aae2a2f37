// src/db/inventory_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::inventory::{BalanceRow, InventoryBalance, InventoryMovement, MovementKind},
};

// Livro-razão de estoque por (unidade, item): movimentos append-only
// mais o saldo corrente desnormalizado.
#[derive(Clone)]
pub struct InventoryRepository {
    pool: PgPool,
}

impl InventoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Escritas (dentro da transação do movimento)
    // ---

    /// Lê o saldo com FOR UPDATE: dois movimentos concorrentes no mesmo
    /// (unidade, item) serializam aqui em vez de calcular saldo defasado.
    pub async fn get_balance_for_update<'e, E>(
        &self,
        executor: E,
        unit_id: Uuid,
        item_id: Uuid,
    ) -> Result<Option<InventoryBalance>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let balance = sqlx::query_as::<_, InventoryBalance>(
            r#"
            SELECT * FROM inventory_balances
            WHERE unit_id = $1 AND item_id = $2
            FOR UPDATE
            "#,
        )
        .bind(unit_id)
        .bind(item_id)
        .fetch_optional(executor)
        .await?;
        Ok(balance)
    }

    pub async fn upsert_balance<'e, E>(
        &self,
        executor: E,
        unit_id: Uuid,
        item_id: Uuid,
        delta: i32,
    ) -> Result<InventoryBalance, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let balance = sqlx::query_as::<_, InventoryBalance>(
            r#"
            INSERT INTO inventory_balances (unit_id, item_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (unit_id, item_id)
            DO UPDATE SET
                quantity = inventory_balances.quantity + $3,
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(unit_id)
        .bind(item_id)
        .bind(delta)
        .fetch_one(executor)
        .await?;
        Ok(balance)
    }

    pub async fn set_thresholds<'e, E>(
        &self,
        executor: E,
        unit_id: Uuid,
        item_id: Uuid,
        min_quantity: i32,
        max_quantity: Option<i32>,
    ) -> Result<InventoryBalance, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let balance = sqlx::query_as::<_, InventoryBalance>(
            r#"
            INSERT INTO inventory_balances (unit_id, item_id, quantity, min_quantity, max_quantity)
            VALUES ($1, $2, 0, $3, $4)
            ON CONFLICT (unit_id, item_id)
            DO UPDATE SET
                min_quantity = EXCLUDED.min_quantity,
                max_quantity = EXCLUDED.max_quantity,
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(unit_id)
        .bind(item_id)
        .bind(min_quantity)
        .bind(max_quantity)
        .fetch_one(executor)
        .await?;
        Ok(balance)
    }

    pub async fn record_movement<'e, E>(
        &self,
        executor: E,
        unit_id: Uuid,
        item_id: Uuid,
        kind: MovementKind,
        quantity: i32,
        note: Option<&str>,
        created_by: Uuid,
    ) -> Result<InventoryMovement, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let movement = sqlx::query_as::<_, InventoryMovement>(
            r#"
            INSERT INTO inventory_movements (unit_id, item_id, kind, quantity, note, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(unit_id)
        .bind(item_id)
        .bind(kind)
        .bind(quantity)
        .bind(note)
        .bind(created_by)
        .fetch_one(executor)
        .await?;
        Ok(movement)
    }

    // ---
    // Leituras
    // ---

    pub async fn list_balances(&self, unit_id: Option<Uuid>) -> Result<Vec<BalanceRow>, AppError> {
        let balances = sqlx::query_as::<_, BalanceRow>(
            r#"
            SELECT b.unit_id, u.name AS unit_name, b.item_id, i.name AS item_name,
                   b.quantity, b.min_quantity, b.max_quantity, b.updated_at
            FROM inventory_balances b
            JOIN units u ON u.id = b.unit_id
            JOIN ppe_items i ON i.id = b.item_id
            WHERE ($1::uuid IS NULL OR b.unit_id = $1)
            ORDER BY u.name ASC, i.name ASC
            "#,
        )
        .bind(unit_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(balances)
    }

    /// Itens abaixo do mínimo configurado (alerta de reposição).
    pub async fn low_stock(&self) -> Result<Vec<BalanceRow>, AppError> {
        let balances = sqlx::query_as::<_, BalanceRow>(
            r#"
            SELECT b.unit_id, u.name AS unit_name, b.item_id, i.name AS item_name,
                   b.quantity, b.min_quantity, b.max_quantity, b.updated_at
            FROM inventory_balances b
            JOIN units u ON u.id = b.unit_id
            JOIN ppe_items i ON i.id = b.item_id
            WHERE b.quantity < b.min_quantity
            ORDER BY u.name ASC, i.name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(balances)
    }

    pub async fn list_movements(
        &self,
        unit_id: Option<Uuid>,
        item_id: Option<Uuid>,
        kind: Option<MovementKind>,
    ) -> Result<Vec<InventoryMovement>, AppError> {
        let movements = sqlx::query_as::<_, InventoryMovement>(
            r#"
            SELECT * FROM inventory_movements
            WHERE ($1::uuid IS NULL OR unit_id = $1)
              AND ($2::uuid IS NULL OR item_id = $2)
              AND ($3::movement_kind IS NULL OR kind = $3)
            ORDER BY created_at DESC
            "#,
        )
        .bind(unit_id)
        .bind(item_id)
        .bind(kind)
        .fetch_all(&self.pool)
        .await?;
        Ok(movements)
    }
}
