//! HTTP handlers for the Tool Crib Management Platform

mod auth;
mod catalog;
mod health;
mod location;
mod lookup;
mod movement;
mod stock;
mod storage;

pub use auth::*;
pub use catalog::*;
pub use health::*;
pub use location::*;
pub use lookup::*;
pub use movement::*;
pub use stock::*;
pub use storage::*;
