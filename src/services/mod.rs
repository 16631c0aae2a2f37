pub mod auth;
pub mod dashboard_service;
pub mod delivery_service;
pub mod import_service;
pub mod inventory_service;
pub mod kit_service;
