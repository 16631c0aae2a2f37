pub mod audit;
pub mod dashboard;
pub mod deliveries;
pub mod employees;
pub mod import;
pub mod inventory;
pub mod kits;
pub mod org;
