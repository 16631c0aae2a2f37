// src/db/employee_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        employee::{Employee, EmployeeWithRegion},
        import::ExtractedEmployee,
    },
};

#[derive(Clone)]
pub struct EmployeeRepository {
    pool: PgPool,
}

impl EmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Upsert do "estado atual" chaveado por (cpf, matrícula).
    /// Sobrescreve incondicionalmente: o último lote vence, sem merge.
    pub async fn upsert_from_import<'e, E>(
        &self,
        executor: E,
        extracted: &ExtractedEmployee,
        unit_key: &str,
        batch_id: Uuid,
    ) -> Result<Employee, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            INSERT INTO employees
                (cpf, employee_number, name, job_function, unit_name, unit_key,
                 admission_date, termination_date, batch_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (cpf, employee_number)
            DO UPDATE SET
                name = EXCLUDED.name,
                job_function = EXCLUDED.job_function,
                unit_name = EXCLUDED.unit_name,
                unit_key = EXCLUDED.unit_key,
                admission_date = EXCLUDED.admission_date,
                termination_date = EXCLUDED.termination_date,
                batch_id = EXCLUDED.batch_id,
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(&extracted.cpf)
        .bind(&extracted.employee_number)
        .bind(&extracted.name)
        .bind(&extracted.job_function)
        .bind(&extracted.unit_name)
        .bind(unit_key)
        .bind(extracted.admission_date)
        .bind(extracted.termination_date)
        .bind(batch_id)
        .fetch_one(executor)
        .await?;
        Ok(employee)
    }

    /// Listagem anotada com a regional resolvida via chave normalizada.
    pub async fn list(
        &self,
        region_id: Option<Uuid>,
        unit_key: Option<String>,
        job_function: Option<String>,
        active: Option<bool>,
    ) -> Result<Vec<EmployeeWithRegion>, AppError> {
        let employees = sqlx::query_as::<_, EmployeeWithRegion>(
            r#"
            SELECT e.id, e.cpf, e.employee_number, e.name, e.job_function,
                   e.unit_name, e.admission_date, e.termination_date,
                   r.name AS region_name, e.updated_at
            FROM employees e
            LEFT JOIN units u ON u.name_key = e.unit_key
            LEFT JOIN regions r ON r.id = u.region_id
            WHERE ($1::uuid IS NULL OR u.region_id = $1)
              AND ($2::text IS NULL OR e.unit_key = $2)
              AND ($3::text IS NULL OR e.job_function ILIKE $3)
              AND ($4::boolean IS NULL OR (e.termination_date IS NULL) = $4)
            ORDER BY e.name ASC
            "#,
        )
        .bind(region_id)
        .bind(unit_key)
        .bind(job_function)
        .bind(active)
        .fetch_all(&self.pool)
        .await?;
        Ok(employees)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<EmployeeWithRegion>, AppError> {
        let employee = sqlx::query_as::<_, EmployeeWithRegion>(
            r#"
            SELECT e.id, e.cpf, e.employee_number, e.name, e.job_function,
                   e.unit_name, e.admission_date, e.termination_date,
                   r.name AS region_name, e.updated_at
            FROM employees e
            LEFT JOIN units u ON u.name_key = e.unit_key
            LEFT JOIN regions r ON r.id = u.region_id
            WHERE e.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(employee)
    }
}
