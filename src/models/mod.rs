pub mod audit;
pub mod auth;
pub mod delivery;
pub mod employee;
pub mod import;
pub mod inventory;
pub mod kit;
pub mod org;
pub mod dashboard;
