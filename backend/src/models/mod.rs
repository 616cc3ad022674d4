//! Database models for the Tool Crib Management Platform
//!
//! Re-exports models from the shared crate

pub use shared::models::*;
