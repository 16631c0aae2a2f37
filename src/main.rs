// src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é aceitável aqui: se a configuração falhar, a aplicação
    // não deve iniciar.
    // O esquema do banco é administrado fora do serviço; o DDL de
    // referência fica em sql/schema.sql.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    let import_routes = Router::new()
        .route("/upload", post(handlers::import::upload))
        .route("/batches", get(handlers::import::list_batches));

    let employee_routes = Router::new()
        .route("/", get(handlers::employees::list))
        .route("/{id}", get(handlers::employees::get_by_id))
        .route("/{id}/kit", get(handlers::employees::get_kit));

    let org_routes = Router::new()
        .route(
            "/regions",
            get(handlers::org::list_regions).post(handlers::org::create_region),
        )
        .route(
            "/units",
            get(handlers::org::list_units).post(handlers::org::create_unit),
        );

    let item_routes = Router::new().route(
        "/",
        get(handlers::kits::list_items).post(handlers::kits::create_item),
    );

    let kit_routes = Router::new()
        .route(
            "/",
            get(handlers::kits::list_mappings).post(handlers::kits::upsert_mapping),
        )
        .route("/{id}", axum::routing::delete(handlers::kits::delete_mapping))
        .route("/export", get(handlers::kits::export_csv))
        .route("/import", post(handlers::kits::import_csv));

    let delivery_routes = Router::new()
        .route(
            "/",
            get(handlers::deliveries::list).post(handlers::deliveries::create),
        )
        .route("/{id}", get(handlers::deliveries::get_by_id));

    let pendency_routes = Router::new()
        .route("/", get(handlers::deliveries::list_pendencies))
        .route("/{id}/close", post(handlers::deliveries::close_pendency));

    let inventory_routes = Router::new()
        .route(
            "/movements",
            get(handlers::inventory::list_movements).post(handlers::inventory::create_movement),
        )
        .route("/balances", get(handlers::inventory::list_balances))
        .route(
            "/balances/{unit_id}/{item_id}/thresholds",
            put(handlers::inventory::set_thresholds),
        )
        .route("/low-stock", get(handlers::inventory::low_stock));

    let dashboard_routes = Router::new()
        .route("/summary", get(handlers::dashboard::summary))
        .route(
            "/deliveries-by-region",
            get(handlers::dashboard::deliveries_by_region),
        )
        .route(
            "/pendencies-by-unit",
            get(handlers::dashboard::pendencies_by_unit),
        );

    let audit_routes = Router::new().route("/", get(handlers::audit::list));

    // Tudo atrás do guard de autenticação, exceto o health check.
    let protected = Router::new()
        .nest("/api/import", import_routes)
        .nest("/api/employees", employee_routes)
        .nest("/api", org_routes)
        .nest("/api/items", item_routes)
        .nest("/api/kits", kit_routes)
        .nest("/api/deliveries", delivery_routes)
        .nest("/api/pendencies", pendency_routes)
        .nest("/api/inventory", inventory_routes)
        .nest("/api/dashboard", dashboard_routes)
        .nest("/api/audit", audit_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let port = app_state.port;
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .merge(protected)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", addr);
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
