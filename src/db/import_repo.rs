// src/db/import_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::import::ImportBatch};

// Camada opaca do pipeline: lotes + linhas brutas em JSONB.
// Lotes são imutáveis: só INSERT, nunca UPDATE.
#[derive(Clone)]
pub struct ImportRepository {
    pool: PgPool,
}

impl ImportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_batch<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        source_file: &str,
        row_count: i32,
    ) -> Result<ImportBatch, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let batch = sqlx::query_as::<_, ImportBatch>(
            r#"
            INSERT INTO import_batches (id, source_file, row_count)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(source_file)
        .bind(row_count)
        .fetch_one(executor)
        .await?;
        Ok(batch)
    }

    pub async fn insert_row<'e, E>(
        &self,
        executor: E,
        batch_id: Uuid,
        row_number: i32,
        payload: &serde_json::Value,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO import_rows (batch_id, row_number, payload)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(batch_id)
        .bind(row_number)
        .bind(payload)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn list_batches(&self) -> Result<Vec<ImportBatch>, AppError> {
        let batches = sqlx::query_as::<_, ImportBatch>(
            "SELECT * FROM import_batches ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(batches)
    }
}
