// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{
        AuditRepository, DashboardRepository, DeliveryRepository, EmployeeRepository,
        ImportRepository, InventoryRepository, KitRepository, OrgRepository,
    },
    services::{
        auth::AuthService, dashboard_service::DashboardService, delivery_service::DeliveryService,
        import_service::ImportService, inventory_service::InventoryService,
        kit_service::KitService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub port: u16,

    // Serviços (orquestram transações)
    pub auth_service: AuthService,
    pub import_service: ImportService,
    pub delivery_service: DeliveryService,
    pub inventory_service: InventoryService,
    pub kit_service: KitService,
    pub dashboard_service: DashboardService,

    // Repositórios expostos para as leituras simples dos handlers
    pub org_repo: OrgRepository,
    pub employee_repo: EmployeeRepository,
    pub import_repo: ImportRepository,
    pub kit_repo: KitRepository,
    pub delivery_repo: DeliveryRepository,
    pub inventory_repo: InventoryRepository,
    pub audit_repo: AuditRepository,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");
        let jwt_issuer = env::var("JWT_ISSUER").unwrap_or_else(|_| "epi-idp".to_string());
        let jwt_audience = env::var("JWT_AUDIENCE").unwrap_or_else(|_| "epi-backend".to_string());
        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT deve ser um número de porta válido"))?;

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let org_repo = OrgRepository::new(db_pool.clone());
        let employee_repo = EmployeeRepository::new(db_pool.clone());
        let import_repo = ImportRepository::new(db_pool.clone());
        let kit_repo = KitRepository::new(db_pool.clone());
        let delivery_repo = DeliveryRepository::new(db_pool.clone());
        let inventory_repo = InventoryRepository::new(db_pool.clone());
        let audit_repo = AuditRepository::new(db_pool.clone());
        let dashboard_repo = DashboardRepository::new();

        let auth_service = AuthService::new(jwt_secret, jwt_issuer, jwt_audience);
        let import_service = ImportService::new(
            import_repo.clone(),
            employee_repo.clone(),
            org_repo.clone(),
            audit_repo.clone(),
        );
        let delivery_service = DeliveryService::new(delivery_repo.clone(), audit_repo.clone());
        let inventory_service = InventoryService::new(inventory_repo.clone(), audit_repo.clone());
        let kit_service = KitService::new(kit_repo.clone(), audit_repo.clone());
        let dashboard_service = DashboardService::new(dashboard_repo, db_pool.clone());

        Ok(Self {
            db_pool,
            port,
            auth_service,
            import_service,
            delivery_service,
            inventory_service,
            kit_service,
            dashboard_service,
            org_repo,
            employee_repo,
            import_repo,
            kit_repo,
            delivery_repo,
            inventory_repo,
            audit_repo,
        })
    }
}
