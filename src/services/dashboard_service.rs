// src/services/dashboard_service.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::DashboardRepository,
    models::dashboard::{DashboardSummary, DeliveriesByRegion, PendenciesByUnit},
};

#[derive(Clone)]
pub struct DashboardService {
    dashboard_repo: DashboardRepository,
    pool: PgPool,
}

impl DashboardService {
    pub fn new(dashboard_repo: DashboardRepository, pool: PgPool) -> Self {
        Self {
            dashboard_repo,
            pool,
        }
    }

    pub async fn summary(&self) -> Result<DashboardSummary, AppError> {
        self.dashboard_repo.summary(&self.pool).await
    }

    pub async fn deliveries_by_region(&self) -> Result<Vec<DeliveriesByRegion>, AppError> {
        self.dashboard_repo.deliveries_by_region(&self.pool).await
    }

    pub async fn pendencies_by_unit(&self) -> Result<Vec<PendenciesByUnit>, AppError> {
        self.dashboard_repo.pendencies_by_unit(&self.pool).await
    }
}
