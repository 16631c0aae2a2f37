// src/db/delivery_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::delivery::{Delivery, DeliveryItem, Pendency, PendencyStatus},
};

#[derive(Clone)]
pub struct DeliveryRepository {
    pool: PgPool,
}

impl DeliveryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Escritas transacionais (entrega + itens + pendências num só commit)
    // ---

    pub async fn insert_delivery<'e, E>(
        &self,
        executor: E,
        employee_id: Uuid,
        unit_id: Option<Uuid>,
        delivered_at: NaiveDate,
        observation: Option<&str>,
        created_by: Uuid,
    ) -> Result<Delivery, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let delivery = sqlx::query_as::<_, Delivery>(
            r#"
            INSERT INTO deliveries (employee_id, unit_id, delivered_at, observation, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(employee_id)
        .bind(unit_id)
        .bind(delivered_at)
        .bind(observation)
        .bind(created_by)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_foreign_key_violation() {
                    return AppError::NotFound("Colaborador");
                }
            }
            e.into()
        })?;
        Ok(delivery)
    }

    pub async fn insert_item<'e, E>(
        &self,
        executor: E,
        delivery_id: Uuid,
        item_id: Uuid,
        requested: i32,
        delivered: i32,
    ) -> Result<DeliveryItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, DeliveryItem>(
            r#"
            INSERT INTO delivery_items (delivery_id, item_id, requested, delivered)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(delivery_id)
        .bind(item_id)
        .bind(requested)
        .bind(delivered)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_foreign_key_violation() {
                    return AppError::NotFound("Item de EPI");
                }
            }
            e.into()
        })?;
        Ok(item)
    }

    pub async fn insert_pendency<'e, E>(
        &self,
        executor: E,
        delivery_id: Uuid,
        item_id: Uuid,
        quantity: i32,
    ) -> Result<Pendency, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let pendency = sqlx::query_as::<_, Pendency>(
            r#"
            INSERT INTO pendencies (delivery_id, item_id, quantity, status)
            VALUES ($1, $2, $3, 'OPEN')
            RETURNING *
            "#,
        )
        .bind(delivery_id)
        .bind(item_id)
        .bind(quantity)
        .fetch_one(executor)
        .await?;
        Ok(pendency)
    }

    /// Trava a pendência dentro da transação de encerramento.
    pub async fn get_pendency_for_update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Pendency>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let pendency =
            sqlx::query_as::<_, Pendency>("SELECT * FROM pendencies WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(executor)
                .await?;
        Ok(pendency)
    }

    pub async fn close_pendency<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        resolution: Option<&str>,
    ) -> Result<Pendency, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let pendency = sqlx::query_as::<_, Pendency>(
            r#"
            UPDATE pendencies
            SET status = 'CLOSED', resolution = $2, closed_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(resolution)
        .fetch_one(executor)
        .await?;
        Ok(pendency)
    }

    // ---
    // Leituras
    // ---

    pub async fn list(
        &self,
        employee_id: Option<Uuid>,
        unit_id: Option<Uuid>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<Delivery>, AppError> {
        let deliveries = sqlx::query_as::<_, Delivery>(
            r#"
            SELECT * FROM deliveries
            WHERE ($1::uuid IS NULL OR employee_id = $1)
              AND ($2::uuid IS NULL OR unit_id = $2)
              AND ($3::date IS NULL OR delivered_at >= $3)
              AND ($4::date IS NULL OR delivered_at <= $4)
            ORDER BY delivered_at DESC, created_at DESC
            "#,
        )
        .bind(employee_id)
        .bind(unit_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(deliveries)
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<Delivery>, AppError> {
        let delivery = sqlx::query_as::<_, Delivery>("SELECT * FROM deliveries WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(delivery)
    }

    pub async fn items_for(&self, delivery_id: Uuid) -> Result<Vec<DeliveryItem>, AppError> {
        let items = sqlx::query_as::<_, DeliveryItem>(
            "SELECT * FROM delivery_items WHERE delivery_id = $1",
        )
        .bind(delivery_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    pub async fn pendencies_for(&self, delivery_id: Uuid) -> Result<Vec<Pendency>, AppError> {
        let pendencies =
            sqlx::query_as::<_, Pendency>("SELECT * FROM pendencies WHERE delivery_id = $1")
                .bind(delivery_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(pendencies)
    }

    pub async fn list_pendencies(
        &self,
        status: Option<PendencyStatus>,
        unit_id: Option<Uuid>,
    ) -> Result<Vec<Pendency>, AppError> {
        let pendencies = sqlx::query_as::<_, Pendency>(
            r#"
            SELECT p.* FROM pendencies p
            JOIN deliveries d ON d.id = p.delivery_id
            WHERE ($1::pendency_status IS NULL OR p.status = $1)
              AND ($2::uuid IS NULL OR d.unit_id = $2)
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(status)
        .bind(unit_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(pendencies)
    }
}
