//! Business logic services for the Tool Crib Management Platform

pub mod auth;
pub mod catalog;
pub mod location;
pub mod lookup;
pub mod movement;
pub mod stock;
pub mod storage;

pub use auth::AuthService;
pub use catalog::CatalogService;
pub use location::LocationService;
pub use lookup::LookupService;
pub use movement::MovementService;
pub use stock::StockService;
pub use storage::StorageItemService;
