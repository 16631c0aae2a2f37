// src/db/org_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::org::{Region, Unit, UnitWithRegion},
};

// Regionais e unidades. A tabela de unidades também é a tabela de "lookup"
// do resolvedor: a coluna name_key guarda o nome normalizado.
#[derive(Clone)]
pub struct OrgRepository {
    pool: PgPool,
}

impl OrgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leituras (usam a pool principal)
    // ---

    pub async fn list_regions(&self) -> Result<Vec<Region>, AppError> {
        let regions = sqlx::query_as::<_, Region>("SELECT * FROM regions ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(regions)
    }

    pub async fn list_units(&self) -> Result<Vec<UnitWithRegion>, AppError> {
        let units = sqlx::query_as::<_, UnitWithRegion>(
            r#"
            SELECT u.id, u.region_id, u.name, u.name_key, r.name AS region_name, u.created_at
            FROM units u
            JOIN regions r ON r.id = u.region_id
            ORDER BY r.name ASC, u.name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(units)
    }

    // ---
    // Escritas (aceitam executor para rodar dentro de transações)
    // ---

    pub async fn create_region<'e, E>(&self, executor: E, name: &str) -> Result<Region, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Region>(
            "INSERT INTO regions (name) VALUES ($1) RETURNING *",
        )
        .bind(name)
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

    pub async fn create_unit<'e, E>(
        &self,
        executor: E,
        region_id: Uuid,
        name: &str,
        name_key: &str,
    ) -> Result<Unit, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Unit>(
            r#"
            INSERT INTO units (region_id, name, name_key)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(region_id)
        .bind(name)
        .bind(name_key)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::DuplicateName(name.to_string());
                }
                if db_err.is_foreign_key_violation() {
                    return AppError::NotFound("Regional");
                }
            }
            e.into()
        })
    }

    /// Resolução unidade -> regional: igualdade exata na chave normalizada,
    /// primeira correspondência vence. Sem correspondência, None.
    pub async fn find_region_name_by_unit_key<'e, E>(
        &self,
        executor: E,
        name_key: &str,
    ) -> Result<Option<String>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let region = sqlx::query_scalar::<_, String>(
            r#"
            SELECT r.name
            FROM units u
            JOIN regions r ON r.id = u.region_id
            WHERE u.name_key = $1
            ORDER BY u.created_at ASC
            LIMIT 1
            "#,
        )
        .bind(name_key)
        .fetch_optional(executor)
        .await?;
        Ok(region)
    }
}
