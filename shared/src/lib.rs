//! Shared types and models for the Tool Crib Management Platform
//!
//! This crate contains the domain model and the pure stock calculators
//! shared between the backend and any other components of the system.

pub mod models;
pub mod stock;
pub mod types;
pub mod validation;

pub use models::*;
pub use stock::*;
pub use types::*;
pub use validation::*;
