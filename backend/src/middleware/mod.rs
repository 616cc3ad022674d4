//! Request middleware for the Tool Crib Management Platform

mod auth;

pub use auth::{auth_middleware, AuthUser, CurrentUser};
