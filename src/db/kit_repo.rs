// src/db/kit_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::kit::{KitMapping, KitMappingRow, PpeItem},
};

// Catálogo de EPIs e o mapeamento função -> (item, quantidade).
#[derive(Clone)]
pub struct KitRepository {
    pool: PgPool,
}

impl KitRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Itens de EPI
    // ---

    pub async fn create_item<'e, E>(
        &self,
        executor: E,
        name: &str,
        category: Option<&str>,
    ) -> Result<PpeItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, PpeItem>(
            "INSERT INTO ppe_items (name, category) VALUES ($1, $2) RETURNING *",
        )
        .bind(name)
        .bind(category)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::DuplicateName(name.to_string());
                }
            }
            e.into()
        })
    }

    pub async fn list_items(&self) -> Result<Vec<PpeItem>, AppError> {
        let items = sqlx::query_as::<_, PpeItem>("SELECT * FROM ppe_items ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    pub async fn find_item_by_name<'e, E>(
        &self,
        executor: E,
        name: &str,
    ) -> Result<Option<PpeItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, PpeItem>("SELECT * FROM ppe_items WHERE name = $1")
            .bind(name)
            .fetch_optional(executor)
            .await?;
        Ok(item)
    }

    // ---
    // Mapeamento de kits
    // ---

    /// Upsert por (função, item): re-importar o mesmo par só atualiza a quantidade.
    pub async fn upsert_mapping<'e, E>(
        &self,
        executor: E,
        job_function: &str,
        item_id: Uuid,
        quantity: i32,
    ) -> Result<KitMapping, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mapping = sqlx::query_as::<_, KitMapping>(
            r#"
            INSERT INTO kit_mappings (job_function, item_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (job_function, item_id)
            DO UPDATE SET quantity = EXCLUDED.quantity
            RETURNING *
            "#,
        )
        .bind(job_function)
        .bind(item_id)
        .bind(quantity)
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
        Ok(mapping)
    }

    pub async fn list_mappings(&self) -> Result<Vec<KitMappingRow>, AppError> {
        let rows = sqlx::query_as::<_, KitMappingRow>(
            r#"
            SELECT k.job_function, i.name AS item_name, k.quantity
            FROM kit_mappings k
            JOIN ppe_items i ON i.id = k.item_id
            ORDER BY k.job_function ASC, i.name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Kit devido a uma função específica (o que o colaborador tem direito).
    pub async fn mappings_for_function(
        &self,
        job_function: &str,
    ) -> Result<Vec<KitMappingRow>, AppError> {
        let rows = sqlx::query_as::<_, KitMappingRow>(
            r#"
            SELECT k.job_function, i.name AS item_name, k.quantity
            FROM kit_mappings k
            JOIN ppe_items i ON i.id = k.item_id
            WHERE k.job_function = $1
            ORDER BY i.name ASC
            "#,
        )
        .bind(job_function)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn delete_mapping<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM kit_mappings WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Mapeamento de kit"));
        }
        Ok(())
    }
}
