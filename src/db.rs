pub mod audit_repo;
pub use audit_repo::AuditRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;
pub mod delivery_repo;
pub use delivery_repo::DeliveryRepository;
pub mod employee_repo;
pub use employee_repo::EmployeeRepository;
pub mod import_repo;
pub use import_repo::ImportRepository;
pub mod inventory_repo;
pub use inventory_repo::InventoryRepository;
pub mod kit_repo;
pub use kit_repo::KitRepository;
pub mod org_repo;
pub use org_repo::OrgRepository;
