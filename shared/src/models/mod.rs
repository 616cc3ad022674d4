//! Domain models for the Tool Crib Management Platform

mod catalog;
mod location;
mod movement;
mod storage;
mod user;

pub use catalog::*;
pub use location::*;
pub use movement::*;
pub use storage::*;
pub use user::*;
