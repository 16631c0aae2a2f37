// src/db/audit_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::{audit::AuditEntry, auth::Principal},
};

// Trilha de auditoria. Gravada na mesma transação da mutação quando houver.
#[derive(Clone)]
pub struct AuditRepository {
    pool: PgPool,
}

impl AuditRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn record<'e, E>(
        &self,
        executor: E,
        actor: &Principal,
        action: &str,
        entity: &str,
        entity_id: &str,
        diff: serde_json::Value,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO audit_log (actor_id, actor_email, action, entity, entity_id, diff)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(actor.id)
        .bind(&actor.email)
        .bind(action)
        .bind(entity)
        .bind(entity_id)
        .bind(diff)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn list(&self, limit: i64) -> Result<Vec<AuditEntry>, AppError> {
        let entries = sqlx::query_as::<_, AuditEntry>(
            "SELECT * FROM audit_log ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }
}
