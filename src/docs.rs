// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Import ---
        handlers::import::upload,
        handlers::import::list_batches,

        // --- Employees ---
        handlers::employees::list,
        handlers::employees::get_by_id,
        handlers::employees::get_kit,

        // --- Org ---
        handlers::org::list_regions,
        handlers::org::create_region,
        handlers::org::list_units,
        handlers::org::create_unit,

        // --- Kits ---
        handlers::kits::list_items,
        handlers::kits::create_item,
        handlers::kits::list_mappings,
        handlers::kits::upsert_mapping,
        handlers::kits::delete_mapping,
        handlers::kits::export_csv,
        handlers::kits::import_csv,

        // --- Deliveries ---
        handlers::deliveries::create,
        handlers::deliveries::list,
        handlers::deliveries::get_by_id,
        handlers::deliveries::list_pendencies,
        handlers::deliveries::close_pendency,

        // --- Inventory ---
        handlers::inventory::create_movement,
        handlers::inventory::list_movements,
        handlers::inventory::list_balances,
        handlers::inventory::low_stock,
        handlers::inventory::set_thresholds,

        // --- Dashboard ---
        handlers::dashboard::summary,
        handlers::dashboard::deliveries_by_region,
        handlers::dashboard::pendencies_by_unit,

        // --- Audit ---
        handlers::audit::list,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::Principal,

            // --- Org ---
            models::org::Region,
            models::org::Unit,
            models::org::UnitWithRegion,
            handlers::org::CreateRegionPayload,
            handlers::org::CreateUnitPayload,

            // --- Import ---
            models::import::ImportBatch,
            models::import::ImportSummary,

            // --- Employees ---
            models::employee::Employee,
            models::employee::EmployeeWithRegion,

            // --- Kits ---
            models::kit::PpeItem,
            models::kit::KitMapping,
            models::kit::KitMappingRow,
            handlers::kits::CreateItemPayload,
            handlers::kits::UpsertMappingPayload,

            // --- Deliveries ---
            models::delivery::Delivery,
            models::delivery::DeliveryItem,
            models::delivery::PendencyStatus,
            models::delivery::Pendency,
            models::delivery::DeliveryDetail,
            handlers::deliveries::DeliveryLinePayload,
            handlers::deliveries::CreateDeliveryPayload,
            handlers::deliveries::ClosePendencyPayload,

            // --- Inventory ---
            models::inventory::MovementKind,
            models::inventory::InventoryBalance,
            models::inventory::BalanceRow,
            models::inventory::InventoryMovement,
            handlers::inventory::CreateMovementPayload,
            handlers::inventory::SetThresholdsPayload,

            // --- Dashboard ---
            models::dashboard::DashboardSummary,
            models::dashboard::DeliveriesByRegion,
            models::dashboard::PendenciesByUnit,

            // --- Audit ---
            models::audit::AuditEntry,
        )
    ),
    tags(
        (name = "Import", description = "Importação do extrato de RH (Alterdata)"),
        (name = "Employees", description = "Colaboradores e o kit devido à função"),
        (name = "Org", description = "Regionais e unidades hospitalares"),
        (name = "Kits", description = "Catálogo de EPIs e mapeamento por função"),
        (name = "Deliveries", description = "Entregas de EPI e pendências"),
        (name = "Inventory", description = "Estoque por unidade (movimentos e saldos)"),
        (name = "Dashboard", description = "Indicadores gerenciais"),
        (name = "Audit", description = "Trilha de auditoria")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
